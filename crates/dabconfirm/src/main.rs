mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "dabconfirm",
    version,
    about = "DAB confirmation-acknowledgment server"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from([
            "dabconfirm",
            "serve",
            "--bind",
            "127.0.0.1:0",
            "--table",
        ])
        .expect("serve args should parse");

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.bind, "127.0.0.1:0".parse().unwrap());
                assert!(args.table);
                assert!(args.split_by_technology.is_none());
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }

    #[test]
    fn parses_confirm_subcommand_with_default_addr() {
        let cli = Cli::try_parse_from([
            "dabconfirm",
            "confirm",
            "--dab-id",
            "1",
            "--message-type",
            "4",
            "--technology",
            "AIS",
            "--sender",
            "5",
        ])
        .expect("confirm args should parse");

        match cli.command {
            Command::Confirm(args) => {
                assert_eq!(args.addr, "127.0.0.1:9000".parse().unwrap());
                assert_eq!(args.dab_id, 1);
                assert_eq!(args.technology, "AIS");
                assert!(args.arrived_at.is_none());
            }
            other => panic!("expected confirm command, got {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_split_policy_flag() {
        let cli = Cli::try_parse_from([
            "dabconfirm",
            "serve",
            "--split-by-technology",
            "AIS",
        ])
        .expect("serve args should parse");

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.split_by_technology.as_deref(), Some("AIS"));
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_bind_address() {
        let err = Cli::try_parse_from(["dabconfirm", "serve", "--bind", "nonsense"])
            .expect_err("invalid bind should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn confirm_requires_identifying_fields() {
        let err = Cli::try_parse_from(["dabconfirm", "confirm", "--dab-id", "1"])
            .expect_err("missing required args should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }
}
