use clap::{Arg, ArgAction, ArgMatches, Command, ValueEnum};
use std::env;
use std::fmt;
use std::path::PathBuf;

use securelend::mcp::Transport;

pub const API_KEY_ENV: &str = "SECURELEND_API_KEY";
pub const MCP_URL_ENV: &str = "SECURELEND_MCP_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    None,
}

impl LogLevel {
    /// Default tracing filter directive, `None` when logging is off.
    pub fn directive(self) -> Option<&'static str> {
        match self {
            LogLevel::Debug => Some("securelend=debug"),
            LogLevel::Info => Some("securelend=info"),
            LogLevel::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliTransport {
    Sse,
    #[value(alias = "streamableHttp")]
    StreamableHttp,
}

impl From<CliTransport> for Transport {
    fn from(value: CliTransport) -> Self {
        match value {
            CliTransport::Sse => Transport::Sse,
            CliTransport::StreamableHttp => Transport::StreamableHttp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    LoansCompare,
    LoansCalculate,
    BankingCompare,
    CardsCompare,
    ToolsList,
    ToolsCall { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSource {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub api_key: String,
    pub mcp_url: Option<String>,
    pub transport: Transport,
    pub log_level: LogLevel,
    pub debug: bool,
    pub operation: Operation,
    pub request: Option<RequestSource>,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingApiKey,
    MissingRequest(&'static str),
    InvalidArg(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(
                f,
                "An API key is required: pass --api-key or set {API_KEY_ENV}"
            ),
            ConfigError::MissingRequest(command) => write!(
                f,
                "{command} needs a REQUEST argument (a JSON file path, or - for stdin)"
            ),
            ConfigError::InvalidArg(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn parse_cli_config() -> Result<CliConfig, ConfigError> {
    let raw_args: Vec<String> = env::args().collect();
    parse_cli_config_from(raw_args, &|key| env::var(key).ok())
}

fn parse_cli_config_from(
    raw_args: Vec<String>,
    env_lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<CliConfig, ConfigError> {
    let matches = match build_cli().try_get_matches_from(raw_args) {
        Ok(matches) => matches,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            err.exit()
        }
        Err(err) => return Err(ConfigError::InvalidArg(err.to_string())),
    };

    let api_key = matches
        .get_one::<String>("apiKey")
        .cloned()
        .or_else(|| env_lookup(API_KEY_ENV))
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::MissingApiKey)?;
    let mcp_url = matches
        .get_one::<String>("mcpUrl")
        .cloned()
        .or_else(|| env_lookup(MCP_URL_ENV))
        .filter(|url| !url.trim().is_empty());
    let transport = matches
        .get_one::<CliTransport>("transport")
        .copied()
        .unwrap_or(CliTransport::Sse)
        .into();
    let log_level = matches
        .get_one::<LogLevel>("logLevel")
        .copied()
        .unwrap_or(LogLevel::Info);
    let debug = matches.get_flag("debug");

    let (operation, request) = parse_operation(&matches)?;

    Ok(CliConfig {
        api_key,
        mcp_url,
        transport,
        log_level,
        debug,
        operation,
        request,
    })
}

fn parse_operation(
    matches: &ArgMatches,
) -> Result<(Operation, Option<RequestSource>), ConfigError> {
    let (group, group_matches) = matches
        .subcommand()
        .ok_or_else(|| ConfigError::InvalidArg("A command is required".to_string()))?;
    let (action, sub) = group_matches.subcommand().ok_or_else(|| {
        ConfigError::InvalidArg(format!("{group} requires a subcommand"))
    })?;

    let operation = match (group, action) {
        ("loans", "compare") => Operation::LoansCompare,
        ("loans", "calculate") => Operation::LoansCalculate,
        ("banking", "compare") => Operation::BankingCompare,
        ("cards", "compare") => Operation::CardsCompare,
        ("tools", "list") => return Ok((Operation::ToolsList, None)),
        ("tools", "call") => {
            let name = sub.get_one::<String>("name").cloned().ok_or_else(|| {
                ConfigError::InvalidArg("tools call requires a tool NAME".to_string())
            })?;
            return Ok((Operation::ToolsCall { name }, request_source(sub)));
        }
        _ => {
            return Err(ConfigError::InvalidArg(format!(
                "Unknown command: {group} {action}"
            )))
        }
    };

    let request = request_source(sub).ok_or(ConfigError::MissingRequest(operation.label()))?;
    Ok((operation, Some(request)))
}

fn request_source(matches: &ArgMatches) -> Option<RequestSource> {
    matches
        .get_one::<String>("request")
        .map(|raw| match raw.as_str() {
            "-" => RequestSource::Stdin,
            path => RequestSource::File(PathBuf::from(path)),
        })
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::LoansCompare => "loans compare",
            Operation::LoansCalculate => "loans calculate",
            Operation::BankingCompare => "banking compare",
            Operation::CardsCompare => "cards compare",
            Operation::ToolsList => "tools list",
            Operation::ToolsCall { .. } => "tools call",
        }
    }
}

fn build_cli() -> Command {
    Command::new("securelend")
        .about("Compare business loans, bank accounts and credit cards through SecureLend")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg(
            Arg::new("apiKey")
                .long("api-key")
                .value_name("KEY")
                .help("SecureLend API key (sk_test_... or sk_live_...)"),
        )
        .arg(Arg::new("mcpUrl").long("mcp-url").value_name("URL"))
        .arg(
            Arg::new("transport")
                .long("transport")
                .value_parser(clap::builder::EnumValueParser::<CliTransport>::new())
                .default_value("sse"),
        )
        .arg(
            Arg::new("logLevel")
                .long("log-level")
                .value_parser(clap::builder::EnumValueParser::<LogLevel>::new())
                .default_value("info"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Log connection and tool activity at info level"),
        )
        .subcommand(
            Command::new("loans")
                .about("Business loans")
                .subcommand_required(true)
                .subcommand(with_request(
                    Command::new("compare").about("Find matching loan offers"),
                ))
                .subcommand(with_request(
                    Command::new("calculate").about("Calculate loan payments"),
                )),
        )
        .subcommand(
            Command::new("banking")
                .about("Business bank accounts")
                .subcommand_required(true)
                .subcommand(with_request(
                    Command::new("compare").about("Find matching bank accounts"),
                )),
        )
        .subcommand(
            Command::new("cards")
                .about("Business credit cards")
                .subcommand_required(true)
                .subcommand(with_request(
                    Command::new("compare").about("Find matching credit cards"),
                )),
        )
        .subcommand(
            Command::new("tools")
                .about("Raw tool access")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List tools offered by the server"))
                .subcommand(with_request(
                    Command::new("call")
                        .about("Invoke a tool by name")
                        .arg(Arg::new("name").required(true).value_name("NAME")),
                )),
        )
}

fn with_request(command: Command) -> Command {
    command.arg(
        Arg::new("request")
            .value_name("REQUEST")
            .help("JSON request file, or - to read from stdin. Unknown fields are rejected"),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const KEY: &str = "sk_test_abcdef123456789012345678901234567890";

    fn parse_cli(args: &[&str]) -> Result<CliConfig, ConfigError> {
        parse_with_env(args, &[])
    }

    fn parse_with_env(args: &[&str], vars: &[(&str, &str)]) -> Result<CliConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        parse_cli_config_from(
            args.iter().map(|arg| arg.to_string()).collect(),
            &move |key| vars.get(key).cloned(),
        )
    }

    #[test]
    fn parse_selects_operation_and_request_file() {
        let cfg = parse_cli(&["securelend", "--api-key", KEY, "loans", "compare", "req.json"])
            .expect("loans compare should parse");
        assert_eq!(cfg.operation, Operation::LoansCompare);
        assert_eq!(cfg.request, Some(RequestSource::File(PathBuf::from("req.json"))));
        assert_eq!(cfg.api_key, KEY);
        assert_eq!(cfg.transport, Transport::Sse);
        assert_eq!(cfg.log_level, LogLevel::Info);
        assert!(!cfg.debug);
        assert_eq!(cfg.mcp_url, None);
    }

    #[test]
    fn parse_reads_request_from_stdin_marker() {
        let cfg = parse_cli(&["securelend", "--api-key", KEY, "cards", "compare", "-"])
            .expect("cards compare should parse");
        assert_eq!(cfg.operation, Operation::CardsCompare);
        assert_eq!(cfg.request, Some(RequestSource::Stdin));
    }

    #[test]
    fn parse_requires_request_for_typed_operations() {
        let err = parse_cli(&["securelend", "--api-key", KEY, "banking", "compare"])
            .expect_err("expected missing request");
        assert!(matches!(err, ConfigError::MissingRequest("banking compare")));
    }

    #[test]
    fn parse_tools_commands() {
        let list = parse_cli(&["securelend", "--api-key", KEY, "tools", "list"])
            .expect("tools list should parse");
        assert_eq!(list.operation, Operation::ToolsList);
        assert_eq!(list.request, None);

        let call = parse_cli(&["securelend", "--api-key", KEY, "tools", "call", "find_credit_cards"])
            .expect("tools call should parse");
        assert_eq!(
            call.operation,
            Operation::ToolsCall {
                name: "find_credit_cards".to_string()
            }
        );
        assert_eq!(call.request, None);
    }

    #[test]
    fn parse_falls_back_to_environment() {
        let cfg = parse_with_env(
            &["securelend", "loans", "calculate", "calc.json"],
            &[(API_KEY_ENV, KEY), (MCP_URL_ENV, "http://127.0.0.1:9000/sse")],
        )
        .expect("env fallback should parse");
        assert_eq!(cfg.api_key, KEY);
        assert_eq!(cfg.mcp_url.as_deref(), Some("http://127.0.0.1:9000/sse"));
        assert_eq!(cfg.operation, Operation::LoansCalculate);
    }

    #[test]
    fn flags_take_precedence_over_environment() {
        let cfg = parse_with_env(
            &[
                "securelend",
                "--api-key",
                KEY,
                "--mcp-url",
                "http://flag.test/sse",
                "tools",
                "list",
            ],
            &[
                (API_KEY_ENV, "sk_live_other"),
                (MCP_URL_ENV, "http://env.test/sse"),
            ],
        )
        .expect("flags should parse");
        assert_eq!(cfg.api_key, KEY);
        assert_eq!(cfg.mcp_url.as_deref(), Some("http://flag.test/sse"));
    }

    #[test]
    fn parse_requires_api_key() {
        let err = parse_cli(&["securelend", "tools", "list"]).expect_err("expected missing key");
        assert!(matches!(err, ConfigError::MissingApiKey));

        let err = parse_with_env(&["securelend", "tools", "list"], &[(API_KEY_ENV, "  ")])
            .expect_err("blank env key is missing");
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn parse_accepts_transport_spellings_and_log_options() {
        for spelling in ["streamable-http", "streamableHttp"] {
            let cfg = parse_cli(&[
                "securelend",
                "--api-key",
                KEY,
                "--transport",
                spelling,
                "--log-level",
                "debug",
                "--debug",
                "tools",
                "list",
            ])
            .expect("transport should parse");
            assert_eq!(cfg.transport, Transport::StreamableHttp);
            assert_eq!(cfg.log_level, LogLevel::Debug);
            assert!(cfg.debug);
        }
    }

    #[test]
    fn parse_rejects_unknown_transport_and_command() {
        let err = parse_cli(&["securelend", "--api-key", KEY, "--transport", "ws", "tools", "list"])
            .expect_err("ws is not supported");
        assert!(matches!(err, ConfigError::InvalidArg(_)));

        let err = parse_cli(&["securelend", "--api-key", KEY, "mortgages", "compare"])
            .expect_err("unknown group");
        assert!(matches!(err, ConfigError::InvalidArg(_)));

        let err = parse_cli(&["securelend", "--api-key", KEY, "loans"])
            .expect_err("group without action");
        assert!(matches!(err, ConfigError::InvalidArg(_)));
    }

    #[test]
    fn log_level_directives() {
        assert_eq!(LogLevel::Debug.directive(), Some("securelend=debug"));
        assert_eq!(LogLevel::Info.directive(), Some("securelend=info"));
        assert_eq!(LogLevel::None.directive(), None);
    }
}
