use env_logger::{Env, Target};
use log::{error, Level};
use probe::connection::A2sConnector;
use probe::error::ProbeError;
use probe::exit_code::process_status;
use std::io::Write;
use std::process::ExitCode;

/// Every message goes to stdout. Info lines are printed bare, other levels
/// get a `LEVEL:` prefix.
fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level, record.args()),
        })
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();

    let config = match probe::cli::parse(std::env::args_os()) {
        Ok(Some(config)) => config,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            match &e {
                ProbeError::InvalidUsage(message) => {
                    if !message.is_empty() {
                        println!("{}", message);
                    }
                    print!("{}", probe::cli::usage());
                }
                other => error!("{}", other),
            }
            return ExitCode::from(e.status());
        }
    };

    match probe::run(&config, &A2sConnector).await {
        Ok(report) => ExitCode::from(process_status(report.return_code)),
        // Already reported by the retry loop
        Err(e) => ExitCode::from(e.status()),
    }
}
