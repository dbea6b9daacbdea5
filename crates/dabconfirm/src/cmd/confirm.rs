use std::time::{SystemTime, UNIX_EPOCH};

use dabconfirm_frame::FrameConfig;
use dabconfirm_server::ConfirmationClient;
use dabconfirm_store::Confirmation;

use crate::cmd::{parse_duration, ConfirmArgs};
use crate::exit::{server_error, CliResult, SUCCESS};
use crate::output::{print_reply, OutputFormat};

pub fn run(args: ConfirmArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let frame_config = FrameConfig {
        read_timeout: Some(timeout),
        write_timeout: Some(timeout),
        ..FrameConfig::default()
    };

    let mut client = ConfirmationClient::connect_with_config(args.addr, frame_config)
        .map_err(|err| server_error("connect failed", err))?;

    let confirmation = Confirmation::new(
        args.dab_id,
        args.message_type,
        args.arrived_at.unwrap_or_else(now_unix_seconds),
        args.technology,
        args.sender,
    );

    let reply = client
        .confirm(&confirmation)
        .map_err(|err| server_error("confirm failed", err))?;
    print_reply(&reply, format);

    client
        .disconnect()
        .map_err(|err| server_error("disconnect failed", err))?;

    Ok(SUCCESS)
}

fn now_unix_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
