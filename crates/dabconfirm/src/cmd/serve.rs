use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dabconfirm_server::{ConfirmationServer, ReplyPolicy, ServerConfig};
use dabconfirm_store::ConfirmationStore;

use crate::cmd::{parse_duration, ServeArgs};
use crate::exit::{server_error, CliError, CliResult, SUCCESS};
use crate::output::{print_listening, ConfirmationTable, OutputFormat};

pub fn run(args: ServeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut config = ServerConfig::new(args.bind);
    if let Some(technology) = args.split_by_technology {
        config = config.with_reply_policy(ReplyPolicy::TechnologySplit {
            reference_technology: technology,
        });
    }
    if let Some(raw) = &args.read_timeout {
        config = config.with_read_timeout(Some(parse_duration(raw)?));
    }
    if let Some(raw) = &args.write_timeout {
        config = config.with_write_timeout(Some(parse_duration(raw)?));
    }

    tracing::info!(addr = %config.bind_addr, "starting confirmation server");
    let store = Arc::new(ConfirmationStore::new());
    let mut server = ConfirmationServer::bind(config, store)
        .map_err(|err| server_error("bind failed", err))?;
    if args.table {
        server = server.with_display(Arc::new(ConfirmationTable));
    }

    let addr = server
        .local_addr()
        .map_err(|err| server_error("bound address unavailable", err))?;
    print_listening(addr, format);

    let shutdown = Arc::new(AtomicBool::new(false));
    install_ctrlc_handler(shutdown.clone())?;

    server
        .run_until(&shutdown)
        .map_err(|err| server_error("serve failed", err))?;

    Ok(SUCCESS)
}

fn install_ctrlc_handler(shutdown: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        shutdown.store(true, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
