use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("sesamo")
        .about("Authentication flow client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .help("Identity service base URL, example: https://id.tld:8443")
                .env("SESAMO_BASE_URL")
                .global(true),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .help("Registration validation profile: strict or lenient")
                .env("SESAMO_PROFILE")
                .default_value("strict")
                .global(true),
        )
        .arg(
            Arg::new("policy")
                .long("policy")
                .help("Response success classification: success-class or exact-ok")
                .env("SESAMO_POLICY")
                .default_value("success-class")
                .global(true),
        )
        .arg(
            Arg::new("prefs")
                .long("prefs")
                .help("Preferences file path")
                .env("SESAMO_PREFS")
                .default_value(".sesamo.json")
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("SESAMO_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(Command::new("register").about("Create an account and confirm it by email code"))
        .subcommand(
            Command::new("login")
                .about("Sign in and verify with a second factor")
                .arg(
                    Arg::new("remember-me")
                        .short('r')
                        .long("remember-me")
                        .help("Request a longer-lived session and persist the choice")
                        .env("SESAMO_REMEMBER_ME")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-remember-me")
                        .long("no-remember-me")
                        .help("Clear the persisted remember-me choice")
                        .conflicts_with("remember-me")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("recover").about("Recover access and set a new password"))
}
