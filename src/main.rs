use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use log::debug;

use wol_broadcast::{wake, Request, SystemNetwork};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// MAC address to wake, in xx:xx:xx:xx:xx:xx or xx-xx-xx-xx-xx-xx form.
    #[arg(short, long, env = "WOL_MAC")]
    mac: String,

    /// IPv4 broadcast address [default: 255.255.255.255]
    #[arg(short, long, env = "WOL_BROADCAST")]
    broadcast: Option<String>,

    /// UDP port [default: 9]
    #[arg(short, long, env = "WOL_PORT")]
    port: Option<String>,

    /// Increase log verbosity, may be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(Some(env_logger::fmt::TimestampPrecision::Millis))
        .init();
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    init_logging(args.verbose);
    debug!("{:?}", args);

    let request = Request {
        mac: args.mac,
        broadcast: args.broadcast,
        port: args.port,
    };

    match wake(&request, &SystemNetwork) {
        Ok(delivery) => {
            println!(
                "packet sent to {} with MAC {}",
                delivery.target, delivery.mac
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("unable to wake device: {}", err);
            if err.exit_code() == 1 {
                eprintln!("run with --help for usage");
            }
            ExitCode::from(err.exit_code())
        }
    }
}
