//! Command-line parsing
//!
//! `-h` names the server host, so clap's automatic `-h` help flag is
//! disabled and help is available as `--help` only.

use crate::config::{
    OutputTargets, ProbeConfig, QueryConfig, ServerAddress, DEFAULT_RETRY_COUNT,
    DEFAULT_TIMEOUT_MS,
};
use crate::error::{ConfigError, ProbeError};
use crate::exit_code::ReturnSelector;
use crate::extract::TextField;
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

const RETURN_CODE_HELP: &str = "\
Return code sources for -c (the exit code is always 255 on error):
    0: Nothing (default)
    1: Game ID
    2: Players
    3: Max Players
    4: Bots
    5: Players - Bots";

#[derive(Parser, Debug)]
#[command(
    name = "a2s-probe",
    author,
    version,
    about = "Query a game server with A2S_INFO",
    long_about = None,
    disable_help_flag = true,
    after_help = RETURN_CODE_HELP
)]
pub struct Args {
    /// Server hostname (required)
    #[arg(short = 'h', value_name = "HOST")]
    pub host: Option<String>,

    /// Server port (required)
    #[arg(short = 'p', value_name = "PORT")]
    pub port: Option<u16>,

    /// Timeout in milliseconds, 0 for none
    #[arg(short = 't', value_name = "MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout: u64,

    /// Retry count
    #[arg(short = 'r', value_name = "COUNT", default_value_t = DEFAULT_RETRY_COUNT)]
    pub retries: u32,

    /// Return code source, see below
    #[arg(
        short = 'c',
        value_name = "SOURCE",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub return_code: i64,

    /// File to write server name to
    #[arg(long, value_name = "PATH")]
    pub name_file: Option<PathBuf>,

    /// File to write server map to
    #[arg(long, value_name = "PATH")]
    pub map_file: Option<PathBuf>,

    /// File to write server folder to
    #[arg(long, value_name = "PATH")]
    pub folder_file: Option<PathBuf>,

    /// File to write server game to
    #[arg(long, value_name = "PATH")]
    pub game_file: Option<PathBuf>,

    /// File to write server version to
    #[arg(long, value_name = "PATH")]
    pub version_file: Option<PathBuf>,

    /// File to write server keywords to
    #[arg(long, value_name = "PATH")]
    pub keywords_file: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Args {
    /// Validates the parsed flags into the immutable run configuration
    pub fn into_config(self) -> Result<ProbeConfig, ConfigError> {
        let address = ServerAddress::new(
            self.host.as_deref().unwrap_or_default(),
            self.port.unwrap_or_default(),
        )?;

        let mut outputs = OutputTargets::default();
        for (field, path) in [
            (TextField::Name, self.name_file),
            (TextField::Map, self.map_file),
            (TextField::Folder, self.folder_file),
            (TextField::Game, self.game_file),
            (TextField::Version, self.version_file),
            (TextField::Keywords, self.keywords_file),
        ] {
            outputs.set(field, path)?;
        }

        Ok(ProbeConfig {
            address,
            query: QueryConfig::new(self.timeout, self.retries),
            outputs,
            selector: ReturnSelector::from_code(self.return_code),
        })
    }
}

/// Full help text
pub fn usage() -> String {
    Args::command().render_help().to_string()
}

/// Parses `argv` (program name first) into a configuration.
///
/// `Ok(None)` means help or version text was printed and the process should
/// exit successfully.
pub fn parse<I, T>(argv: I) -> Result<Option<ProbeConfig>, ProbeError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    if argv.len() <= 1 {
        return Err(ProbeError::InvalidUsage(String::new()));
    }

    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{}", e);
            return Ok(None);
        }
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered.lines().next().unwrap_or_default().to_string();
            return Err(ProbeError::InvalidUsage(message));
        }
    };

    Ok(Some(args.into_config()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    fn parse_ok(argv: &[&str]) -> ProbeConfig {
        parse(argv.iter().copied()).unwrap().unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse_ok(&["a2s-probe", "-h", "game.example.com", "-p", "27015"]);
        assert_eq!(config.address.host(), "game.example.com");
        assert_eq!(config.address.port(), 27015);
        assert_eq!(config.query.timeout(), Duration::from_millis(1000));
        assert_eq!(config.query.retries(), 3);
        assert_eq!(config.selector, ReturnSelector::Nothing);
        assert_eq!(config.outputs, OutputTargets::default());
    }

    #[test]
    fn test_all_flags() {
        let config = parse_ok(&[
            "a2s-probe",
            "-h",
            "10.0.0.5",
            "-p",
            "27016",
            "-t",
            "250",
            "-r",
            "0",
            "-c",
            "5",
            "--name-file",
            "name.txt",
            "--map-file",
            "map.txt",
            "--folder-file",
            "folder.txt",
            "--game-file",
            "game.txt",
            "--version-file",
            "version.txt",
            "--keywords-file",
            "keywords.txt",
        ]);

        assert_eq!(config.query, QueryConfig::new(250, 0));
        assert_eq!(config.selector, ReturnSelector::PlayersMinusBots);
        assert_eq!(config.outputs.get(TextField::Name), Some(Path::new("name.txt")));
        assert_eq!(
            config.outputs.get(TextField::Keywords),
            Some(Path::new("keywords.txt"))
        );
    }

    #[test]
    fn test_no_arguments_is_invalid_usage() {
        let empty: [&str; 0] = [];
        assert!(matches!(parse(empty), Err(ProbeError::InvalidUsage(_))));
        assert!(matches!(
            parse(["a2s-probe"]),
            Err(ProbeError::InvalidUsage(_))
        ));
    }

    #[test]
    fn test_unknown_flag_is_invalid_usage() {
        let err = parse(["a2s-probe", "-h", "host", "-p", "1", "--bogus"]).unwrap_err();
        match err {
            ProbeError::InvalidUsage(message) => assert!(message.contains("--bogus")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_malformed_port_is_invalid_usage() {
        assert!(matches!(
            parse(["a2s-probe", "-h", "host", "-p", "70000"]),
            Err(ProbeError::InvalidUsage(_))
        ));
    }

    #[test]
    fn test_missing_host_is_validation_error() {
        assert!(matches!(
            parse(["a2s-probe", "-p", "27015"]),
            Err(ProbeError::Validation(ConfigError::MissingHost))
        ));
        assert!(matches!(
            parse(["a2s-probe", "-h", "", "-p", "27015"]),
            Err(ProbeError::Validation(ConfigError::MissingHost))
        ));
    }

    #[test]
    fn test_zero_port_is_validation_error() {
        assert!(matches!(
            parse(["a2s-probe", "-h", "host", "-p", "0"]),
            Err(ProbeError::Validation(ConfigError::MissingPort))
        ));
    }

    #[test]
    fn test_negative_selector_accepted_as_nothing() {
        let config = parse_ok(&["a2s-probe", "-h", "host", "-p", "1", "-c", "-3"]);
        assert_eq!(config.selector, ReturnSelector::Nothing);
    }

    #[test]
    fn test_help_is_long_only() {
        assert!(matches!(parse(["a2s-probe", "--help"]), Ok(None)));
        assert!(usage().contains("--keywords-file"));
        assert!(usage().contains("5: Players - Bots"));
    }

    #[test]
    fn test_clap_definition_is_consistent() {
        Args::command().debug_assert();
    }
}
