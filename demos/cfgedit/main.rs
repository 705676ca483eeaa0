//! # cfgedit
//!
//! A small command-line editor built on `config_file`, used to try the
//! library by hand against real files.
//!
//! ```sh
//! cargo run --example cfgedit -- app.ini
//! cargo run --example cfgedit -- app.ini get calendar.sunday_index --parse-types
//! cargo run --example cfgedit -- app.toml set server.port 8080
//! cargo run --example cfgedit -- app.json has --wild mail
//! cargo run --example cfgedit -- app.yaml restore
//! RUST_LOG=config_file=trace cargo run --example cfgedit -- app.toml show
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use config_file::{ConfigArgs, ConfigFile};

/// Read and edit INI, JSON, YAML and TOML files by dotted key.
#[derive(Parser, Debug)]
#[command(name = "cfgedit")]
struct Cli {
    /// Leave a leading `~` in FILE unexpanded.
    #[arg(long, global = true)]
    no_expand: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let path = cli.config.file.clone();
    let action = cli.config.into_action();

    let mut config = ConfigFile::builder()
        .path(&path)
        .expand_home(!cli.no_expand)
        .open()
        .unwrap_or_else(|e| {
            eprintln!("Failed to open config:\n{e}");
            std::process::exit(1);
        });

    match config.handle(&action) {
        Ok(result) => println!("{result}"),
        Err(e) => {
            eprintln!("Config error:\n{e}");
            std::process::exit(1);
        }
    }
}
