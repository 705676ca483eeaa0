//! Clap adapter.
//!
//! Compiled only with the `clap` Cargo feature (on by default). Provides
//! [`ConfigArgs`] and [`ConfigSubcommand`], derive types that can be embedded
//! in an application's own clap parser to get
//! `get|set|delete|has|list|show|restore` subcommands against a config file.
//!
//! The only bridge to the core is [`ConfigArgs::into_action()`], which
//! converts parsed arguments into a [`ConfigAction`]. Everything after that
//! goes through [`ConfigFile::handle()`](crate::ConfigFile::handle), so
//! callers using another parser can build [`ConfigAction`] values directly.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::types::ConfigAction;

/// Clap-derived args: the file to operate on plus an optional subcommand.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     config: ConfigArgs,
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config file to operate on. The extension picks the format.
    pub file: PathBuf,

    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Print the value at a dotted key.
    Get {
        /// Dotted key path (e.g. "database.url").
        key: String,
        /// Convert string values to numbers, booleans, lists and maps.
        #[arg(short, long)]
        parse_types: bool,
    },
    /// Store a value and save the file. The value's type is inferred.
    Set {
        /// Dotted key path (e.g. "database.url").
        key: String,
        /// Value to set.
        value: String,
    },
    /// Remove a key or a whole section and save the file.
    Delete {
        /// Dotted key path (e.g. "database.url").
        key: String,
    },
    /// Report whether a key exists.
    Has {
        /// Dotted key path, or a name fragment with `--wild`.
        key: String,
        /// Match any key at any depth whose name contains KEY, ignoring case.
        #[arg(short, long)]
        wild: bool,
    },
    /// Show every leaf value as a dotted key-value pair.
    List,
    /// Print the document as the file would be written.
    Show,
    /// Replace the file with its backup copy.
    Restore {
        /// Backup to restore from. Defaults to `<name>.original.<ext>`.
        #[arg(long)]
        from: Option<PathBuf>,
    },
}

impl ConfigArgs {
    /// Convert clap-parsed args into a framework-agnostic `ConfigAction`.
    ///
    /// No subcommand and an explicit `list` both map to `ConfigAction::List`.
    pub fn into_action(self) -> ConfigAction {
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List,
            Some(ConfigSubcommand::Get { key, parse_types }) => {
                ConfigAction::Get { key, parse_types }
            }
            Some(ConfigSubcommand::Set { key, value }) => ConfigAction::Set { key, value },
            Some(ConfigSubcommand::Delete { key }) => ConfigAction::Delete { key },
            Some(ConfigSubcommand::Has { key, wild }) => ConfigAction::Has { key, wild },
            Some(ConfigSubcommand::Show) => ConfigAction::Show,
            Some(ConfigSubcommand::Restore { from }) => ConfigAction::Restore { from },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    fn parse(args: &[&str]) -> ConfigArgs {
        TestCli::try_parse_from(args).unwrap().config
    }

    #[test]
    fn parse_file_only_is_list() {
        let args = parse(&["test", "app.ini"]);
        assert_eq!(args.file, PathBuf::from("app.ini"));
        assert_eq!(args.into_action(), ConfigAction::List);
    }

    #[test]
    fn parse_explicit_list() {
        let args = parse(&["test", "app.ini", "list"]);
        assert_eq!(args.into_action(), ConfigAction::List);
    }

    #[test]
    fn file_is_required() {
        assert!(TestCli::try_parse_from(["test"]).is_err());
    }

    #[test]
    fn parse_get() {
        let args = parse(&["test", "app.json", "get", "database.url"]);
        assert_eq!(
            args.into_action(),
            ConfigAction::Get {
                key: "database.url".into(),
                parse_types: false,
            }
        );
    }

    #[test]
    fn parse_get_with_types() {
        let args = parse(&["test", "app.ini", "get", "calendar.sunday_index", "-p"]);
        assert_eq!(
            args.into_action(),
            ConfigAction::Get {
                key: "calendar.sunday_index".into(),
                parse_types: true,
            }
        );
    }

    #[test]
    fn parse_set() {
        let args = parse(&["test", "app.toml", "set", "server.host", "0.0.0.0"]);
        assert_eq!(
            args.into_action(),
            ConfigAction::Set {
                key: "server.host".into(),
                value: "0.0.0.0".into(),
            }
        );
    }

    #[test]
    fn parse_delete() {
        let args = parse(&["test", "app.yaml", "delete", "server"]);
        assert_eq!(
            args.into_action(),
            ConfigAction::Delete {
                key: "server".into()
            }
        );
    }

    #[test]
    fn parse_has_wild() {
        let args = parse(&["test", "app.json", "has", "--wild", "mail"]);
        assert_eq!(
            args.into_action(),
            ConfigAction::Has {
                key: "mail".into(),
                wild: true,
            }
        );
    }

    #[test]
    fn parse_show() {
        let args = parse(&["test", "app.json", "show"]);
        assert_eq!(args.into_action(), ConfigAction::Show);
    }

    #[test]
    fn parse_restore_default_and_explicit() {
        let args = parse(&["test", "app.json", "restore"]);
        assert_eq!(args.into_action(), ConfigAction::Restore { from: None });

        let args = parse(&["test", "app.json", "restore", "--from", "backup.json"]);
        assert_eq!(
            args.into_action(),
            ConfigAction::Restore {
                from: Some(PathBuf::from("backup.json"))
            }
        );
    }

    #[test]
    fn invalid_subcommand_errors() {
        assert!(TestCli::try_parse_from(["test", "app.json", "nope"]).is_err());
    }
}
