use chaos_client::DEFAULT_ADMIN_ORIGIN;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chaosctl",
    about = "Control client for the chaos proxy engine",
    version = env!("CARGO_PKG_VERSION"),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short = 'u', long, env = "CHAOS_ADMIN_URL", default_value = DEFAULT_ADMIN_ORIGIN)]
    pub admin_url: String,

    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Show the engine's current configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Show the connection status")]
    Status,

    #[command(about = "Set a configuration field and push it")]
    Set {
        #[arg(help = "Field key (e.g. 'lagToReq', 'failureMode', 'stripCORS', 'chaosRoutes')")]
        key: String,

        #[arg(help = "New value")]
        value: String,
    },

    #[command(subcommand, about = "List or apply network presets")]
    Preset(PresetCommands),

    #[command(subcommand, about = "Header tampering")]
    Headers(HeaderCommands),

    #[command(subcommand, about = "Manage status-injection rules")]
    StatusRule(StatusRuleCommands),

    #[command(subcommand, about = "Manage mock-response rules")]
    Mock(MockCommands),

    #[command(about = "Overlay a JSON configuration document and push it")]
    Apply {
        #[arg(help = "Path to a JSON file; absent fields keep their current value")]
        file: PathBuf,
    },

    #[command(about = "Preview what the current configuration does to a request path")]
    Explain {
        #[arg(help = "Request path, e.g. /api/users/1")]
        path: String,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Also roll the status rules once, as the engine would")]
        roll: bool,
    },

    #[command(about = "Follow the traffic feed")]
    Watch {
        #[arg(long, help = "Poll interval in milliseconds, 50 to 60000 (default: CHAOS_POLL_INTERVAL_MS or 1000)")]
        interval_ms: Option<u64>,

        #[arg(long, help = "Show at most this many entries")]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PresetCommands {
    #[command(about = "List network presets")]
    List,

    #[command(about = "Apply a network preset")]
    Apply {
        #[arg(help = "Preset id (unlimited, fast4g, slow4g, 3g, edge)")]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum HeaderCommands {
    #[command(about = "Turn every header tampering flag off")]
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum StatusRuleCommands {
    #[command(about = "Append a status-injection rule")]
    Add {
        #[arg(long, help = "Path prefix (empty matches everything)")]
        path: Option<String>,

        #[arg(long, help = "Status code to inject (default 500)")]
        code: Option<u16>,

        #[arg(long, help = "Trigger probability in percent (default 100)")]
        rate: Option<u64>,
    },

    #[command(about = "Change one field of a status-injection rule")]
    Update {
        id: String,

        #[arg(help = "pathPattern, statusCode or errorRate")]
        field: String,

        value: String,
    },

    #[command(about = "Remove a status-injection rule")]
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum MockCommands {
    #[command(about = "Append a mock-response rule")]
    Add {
        #[arg(long, help = "Path prefix (empty matches everything)")]
        path: Option<String>,

        #[arg(long, help = "Response body returned verbatim")]
        body: Option<String>,

        #[arg(long, help = "Create the rule switched off")]
        inactive: bool,
    },

    #[command(about = "Change one field of a mock-response rule")]
    Update {
        id: String,

        #[arg(help = "pathPattern, body or active")]
        field: String,

        value: String,
    },

    #[command(about = "Remove a mock-response rule")]
    Remove { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("chaosctl").chain(args.iter().copied()))
            .unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_set_command() {
        let cli = parse(&["-u", "http://engine:9000", "set", "lagToReq", "150"]);
        assert_eq!(cli.admin_url, "http://engine:9000");
        assert!(matches!(
            cli.command,
            Commands::Set { ref key, ref value } if key == "lagToReq" && value == "150"
        ));
    }

    #[test]
    fn test_status_rule_subcommand_is_kebab_case() {
        let cli = parse(&["status-rule", "add", "--path", "/api/orders", "--code", "503"]);
        match cli.command {
            Commands::StatusRule(StatusRuleCommands::Add { path, code, rate }) => {
                assert_eq!(path.as_deref(), Some("/api/orders"));
                assert_eq!(code, Some(503));
                assert_eq!(rate, None);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_mock_add_inactive() {
        let cli = parse(&["mock", "add", "--body", "[]", "--inactive"]);
        assert!(matches!(
            cli.command,
            Commands::Mock(MockCommands::Add { inactive: true, .. })
        ));
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["chaosctl"]).is_err());
    }
}
