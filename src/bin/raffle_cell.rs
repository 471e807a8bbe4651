//! Raffle message body encoder CLI.
//!
//! Encodes one operation body and prints its cell tree and representation
//! hash.
//!
//! # Usage
//! ```text
//! raffle-cell <command> [ARGS]
//! ```
//!
//! # Commands
//! - `cancel`: cancel body
//! - `add-coins`: add-coins body
//! - `transfer <query_id> <prev_owner>`: ownership notification from an NFT
//! - `send <destination> <amount> [mode]`: manual-send body (`amount` in
//!   coins, e.g. `0.1`; `mode` defaults to 0)
//!
//! Addresses use the raw `<workchain>:<hex>` form. The log level is read from
//! `RAFFLE_LOG` (`debug`, `info`, `warn`, `error`).
//!
//! # Examples
//! ```text
//! raffle-cell cancel
//! raffle-cell transfer 1700000000 0:83dfd552e63729b472fcbcc8c45ebcc6691702558b68ec7527e1ba403a0f31a8
//! raffle-cell send 0:83dfd552e63729b472fcbcc8c45ebcc6691702558b68ec7527e1ba403a0f31a8 0.1 3
//! ```

use raffle_codec::raffle::messages::{self, ManualSend, MessageConfig};
use raffle_codec::types::address::Address;
use raffle_codec::types::coins::Coins;
use raffle_codec::utils::log::{self, Level};
use raffle_codec::{Cell, CodecError, debug, error, warn};
use std::env;
use std::process;
use std::str::FromStr;

fn main() {
    if let Ok(raw) = env::var("RAFFLE_LOG") {
        match raw.parse::<Level>() {
            Ok(level) => log::set_level(level),
            Err(e) => warn!("ignoring RAFFLE_LOG: {e}"),
        }
    }

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let rest = &args[2..];
    let cell = match args[1].as_str() {
        "cancel" => {
            expect_args(&args[0], rest, 0, 0);
            messages::cancel()
        }
        "add-coins" => {
            expect_args(&args[0], rest, 0, 0);
            messages::add_coins()
        }
        "transfer" => {
            expect_args(&args[0], rest, 2, 2);
            let query_id: u64 = parse_arg("query id", &rest[0]);
            let prev_owner: Address = parse_arg("previous owner", &rest[1]);
            messages::transfer_notification(query_id, &prev_owner, &MessageConfig::default())
        }
        "send" => {
            expect_args(&args[0], rest, 2, 3);
            let mut params = ManualSend::new(parse_arg("destination", &rest[0]));
            params.amount = parse_arg::<Coins>("amount", &rest[1]);
            if let Some(mode) = rest.get(2) {
                params.mode = parse_arg("mode", mode);
            }
            debug!(
                "relaying {} to {} with mode {}",
                params.amount, params.destination, params.mode
            );
            messages::manual_send(&params)
        }
        other => {
            error!("Unknown command: {}\n", other);
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    match cell {
        Ok(cell) => print_cell(&cell),
        Err(e) => fail(e),
    }
}

fn print_cell(cell: &Cell) {
    println!("{cell}");
    println!("hash: {}", cell.repr_hash());
}

fn fail(e: CodecError) -> ! {
    error!("Encoding failed: {}", e);
    process::exit(1);
}

fn expect_args(program: &str, rest: &[String], min: usize, max: usize) {
    if rest.len() < min || rest.len() > max {
        error!("Wrong number of arguments\n");
        print_usage(program);
        process::exit(1);
    }
}

fn parse_arg<T>(what: &str, raw: &str) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().unwrap_or_else(|e| {
        error!("Invalid {}: '{}' ({})", what, raw, e);
        process::exit(1);
    })
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [ARGS]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  cancel                               Cancel body");
    eprintln!("  add-coins                            Add-coins body");
    eprintln!("  transfer <query_id> <prev_owner>     Ownership notification");
    eprintln!("  send <destination> <amount> [mode]   Manual-send body");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RAFFLE_LOG    debug | info | warn | error (default info)");
}
