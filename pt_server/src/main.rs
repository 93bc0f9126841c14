//! Single-table poker server.
//!
//! Waits for a fixed number of players, then deals hands until one of
//! them holds every chip.

mod config;

use std::{net::IpAddr, process::ExitCode};

use anyhow::Error;
use ctrlc::set_handler;
use log::{error, info};
use pico_args::Arguments;
use poker_table::server;
use tokio::net::TcpListener;

use config::ServerConfig;

const HELP: &str = "\
Run a single-table poker server

USAGE:
  pt_server [OPTIONS] <PORT> <SEATS>

ARGS:
  <PORT>                   Port to listen on
  <SEATS>                  Number of seats; play starts when all are taken (2-10)

OPTIONS:
  --host       IP          Address to bind  [default: env SERVER_HOST or 127.0.0.1]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_HOST              Address to bind
  TABLE_STARTING_STACK     Chips each player starts with  [default: 1000]
  TABLE_SMALL_BLIND        Small blind  [default: 25]
  TABLE_BIG_BLIND          Big blind  [default: 50]
  TABLE_TURN_TIMER_SECS    Advisory turn countdown sent to clients  [default: 30]
  TABLE_SEED               Seed for reproducible shuffles
  RUST_LOG                 Log filter  [default: info]
";

/// Exit code for a malformed command line.
const USAGE_EXIT_CODE: u8 = 2;

struct Args {
    host: Option<IpAddr>,
    port: u16,
    seat_count: usize,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();
    let args = Args {
        host: pargs.opt_value_from_str("--host")?,
        port: pargs.free_from_str()?,
        seat_count: pargs.free_from_str()?,
    };
    let rest = pargs.finish();
    if !rest.is_empty() {
        return Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unexpected arguments: {rest:?}"),
        });
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    // Help has a higher priority and should be handled separately.
    if std::env::args().skip(1).any(|arg| arg == "-h" || arg == "--help") {
        print!("{HELP}");
        return Ok(ExitCode::SUCCESS);
    }

    let args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("error: {error}\n\n{HELP}");
            return Ok(ExitCode::from(USAGE_EXIT_CODE));
        }
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let config = match ServerConfig::from_env(args.port, args.seat_count, args.host) {
        Ok(config) => config,
        Err(error) => {
            error!("{error}");
            return Ok(ExitCode::from(USAGE_EXIT_CODE));
        }
    };

    let listener = TcpListener::bind((config.host, config.port)).await?;
    info!(
        "starting a {}-seat table at {} with blinds {}",
        config.table.seat_count,
        listener.local_addr()?,
        config.table.blinds()
    );

    let outcome = server::run(listener, config.table).await?;
    match outcome.winner {
        Some(winner) => info!(
            "{} won with {} chips after {} hands",
            winner.name, winner.stack, outcome.hands_played
        ),
        None => info!("no winner after {} hands", outcome.hands_played),
    }
    Ok(ExitCode::SUCCESS)
}
