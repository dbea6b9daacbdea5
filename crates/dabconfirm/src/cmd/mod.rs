use std::net::SocketAddr;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod confirm;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the confirmation server.
    Serve(ServeArgs),
    /// Send one confirmation and print the acknowledgment.
    Confirm(ConfirmArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args, format),
        Command::Confirm(args) => confirm::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(
        long,
        value_name = "ADDR",
        default_value = "127.0.0.1:9000",
        env = "DABCONFIRM_BIND"
    )]
    pub bind: SocketAddr,
    /// Correlate acknowledgments against this reference technology
    /// instead of the cross-technology default.
    #[arg(long, value_name = "TECH")]
    pub split_by_technology: Option<String>,
    /// Print the stored confirmations after every handled frame.
    #[arg(long)]
    pub table: bool,
    /// Close connections that stay silent for this long (e.g. 30s, 500ms).
    #[arg(long, value_name = "DURATION")]
    pub read_timeout: Option<String>,
    /// Give up on unresponsive receivers after this long.
    #[arg(long, value_name = "DURATION")]
    pub write_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfirmArgs {
    /// Server address to connect to.
    #[arg(
        long,
        value_name = "ADDR",
        default_value = "127.0.0.1:9000",
        env = "DABCONFIRM_ADDR"
    )]
    pub addr: SocketAddr,
    /// Identifier of the delivered DAB message.
    #[arg(long)]
    pub dab_id: u64,
    /// Message type of the delivered DAB message.
    #[arg(long)]
    pub message_type: u32,
    /// Technology that carried the delivery.
    #[arg(long, value_name = "TECH")]
    pub technology: String,
    /// Device the confirmation concerns.
    #[arg(long)]
    pub sender: u64,
    /// Arrival time as seconds since the Unix epoch. Defaults to now.
    #[arg(long, value_name = "SECONDS")]
    pub arrived_at: Option<f64>,
    /// Maximum time to wait for the acknowledgment (e.g. 5s, 500ms).
    #[arg(long, value_name = "DURATION", default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
