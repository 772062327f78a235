//! Command-line definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "excel-assistant")]
#[command(about = "Assistente de Excel para Construção Civil", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file (defaults to ./assistant.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and ask questions interactively. The password prompt echoes
    /// what is typed.
    Chat,

    /// Administrative panel
    Admin(AdminArgs),
}

#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Administrator e-mail (defaults to `admin.email` from the configuration)
    #[arg(long)]
    pub email: Option<String>,

    /// Administrator password (defaults to `admin.password` from the
    /// configuration or ASSISTANT_ADMIN_PASSWORD; flags end up in shell history)
    #[arg(long)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Register a new student
    Register { email: String, password: String },

    /// List registered students
    Users,

    /// Remove a student
    Remove { email: String },

    /// Show the activity log, newest first
    Logs,

    /// Usage statistics
    Stats,

    /// Describe the user record layout
    Schema,

    /// Export the student list as CSV
    ExportUsers {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export logins per day (last 7 days) as CSV
    ExportLogins {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_admin_export() {
        let cli = Cli::try_parse_from([
            "excel-assistant",
            "admin",
            "--email",
            "admin@coeso.com.br",
            "--password",
            "x",
            "export-logins",
            "--out",
            "logins.csv",
        ])
        .unwrap();

        match cli.command {
            Commands::Admin(args) => {
                assert_eq!(args.email.as_deref(), Some("admin@coeso.com.br"));
                assert_eq!(args.password.as_deref(), Some("x"));
                assert!(matches!(
                    args.command,
                    AdminCommand::ExportLogins { out: Some(ref p) } if p == &PathBuf::from("logins.csv")
                ));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn admin_credentials_flags_are_optional() {
        let cli = Cli::try_parse_from(["excel-assistant", "admin", "users"]).unwrap();
        match cli.command {
            Commands::Admin(args) => {
                assert!(args.email.is_none());
                assert!(args.password.is_none());
                assert!(matches!(args.command, AdminCommand::Users));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["excel-assistant", "chat", "--config", "a.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        assert!(matches!(cli.command, Commands::Chat));
    }
}
