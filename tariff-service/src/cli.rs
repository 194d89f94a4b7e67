//! Command-line front end: argument parsing and quote output.

use crate::startup::Application;
use rust_decimal::Decimal;
use std::io::{self, Write};
use std::str::FromStr;
use tracing::error;

pub const USAGE: &str = "Usage: tariff-service [--metrics] <amount>...";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub amounts: Vec<Decimal>,
    /// Dump Prometheus metrics to stderr after quoting.
    pub print_metrics: bool,
}

impl CliArgs {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut amounts = Vec::new();
        let mut print_metrics = false;

        for arg in args {
            if arg == "--metrics" {
                print_metrics = true;
                continue;
            }

            let amount = Decimal::from_str(&arg).map_err(|e| {
                error!(amount = %arg, error = %e, "Invalid amount");
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid amount '{}': {}", arg, e),
                )
            })?;
            amounts.push(amount);
        }

        if amounts.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, USAGE));
        }

        Ok(Self {
            amounts,
            print_metrics,
        })
    }
}

/// Write one JSON line per amount and active tariff. Returns the number of
/// lines written.
pub fn write_quotes<W: Write>(
    app: &Application,
    amounts: &[Decimal],
    out: &mut W,
) -> io::Result<usize> {
    let mut lines = 0;

    for &amount in amounts {
        let quotes = app.fee_service().quote_all(amount).map_err(|e| {
            error!(amount = %amount, kind = e.kind(), error = %e, "Failed to quote fees");
            io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
        })?;

        for quote in quotes {
            serde_json::to_writer(&mut *out, &quote).map_err(io::Error::other)?;
            writeln!(out)?;
            lines += 1;
        }
    }

    out.flush()?;
    Ok(lines)
}
