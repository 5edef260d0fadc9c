//! DwaarIO - barrier gate client daemon
//!
//! Announces itself to the decision server with a UDP heartbeat, applies
//! the plate decisions it receives to the barrier and the display, and
//! reports back what was displayed.

use dwaar_io::client::{GateClient, LoopTiming};
use dwaar_io::config::Config;
use dwaar_io::devices::{create_actuator, create_display};
use dwaar_io::error::{Error, Result};
use dwaar_io::gate::GateController;
use dwaar_io::session::TransportSession;
use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Parse config path from command line arguments.
///
/// Supports:
/// - `dwaar-io <path>` (positional)
/// - `dwaar-io --config <path>` (flag-based)
/// - `dwaar-io -c <path>` (short flag)
///
/// Defaults to `/etc/dwaario.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    "/etc/dwaario.toml".to_string()
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let config = Config::load(&config_path)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("DwaarIO v{} starting...", env!("CARGO_PKG_VERSION"));
    log::info!("Using config: {}", config_path);
    log::info!(
        "Actuator: {}, display: {}",
        config.actuator.device_type,
        config.display.device_type
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let actuator = create_actuator(&config.actuator)?;
    let display = create_display(&config.display)?;
    let controller = GateController::new(actuator, display);

    let session = TransportSession::start(&config.network)?;
    let timing = LoopTiming::from(&config.network);

    let mut client = GateClient::new(session, controller, timing, running);
    client.run()?;

    log::info!("DwaarIO stopped");
    Ok(())
}
