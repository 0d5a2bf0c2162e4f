use clap::Parser;
use niaga::args::{Args, Command};
use niaga::session::Session;
use niaga::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().niaga_home().path();

    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::List(list_args) => {
            let mut session = load_session(home).await?;
            commands::list(&mut session, list_args)?.print()
        }

        Command::Stats => commands::stats(&load_session(home).await?).print(),

        Command::Shell => {
            let mut session = load_session(home).await?;
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            commands::shell(&mut session, stdin.lock(), stdout.lock())?.print()
        }
    };
    Ok(())
}

/// Loads the configuration from `home` and seeds a session from it.
async fn load_session(home: &std::path::Path) -> Result<Session> {
    let config = Config::load(home).await?;
    Session::new(config.dataset().await?, config.confirm_delete())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
