// Module declarations for the application's core components
pub mod button;       // Button edge classification and GPIO polling
pub mod channels;     // Inter-component communication channels
pub mod config;       // Configuration management
pub mod coordinator;  // The control loop
pub mod display;      // Rendering surface boundary and OLED adapter
pub mod error;        // Error handling helpers
pub mod metrics;      // Derived power-flow metrics pipeline
pub mod options;      // Command line options parsing
pub mod prelude;      // Common imports and types
pub mod provisioning; // Network connectivity watcher
pub mod register;     // SunSpec register definitions
pub mod screens;      // Screen state machine and renderers
pub mod transport;    // Modbus register transport
pub mod watcher;      // Config-change restart watcher

// Get the package version from Cargo.toml
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::prelude::*;

use crate::button::GpioButton;
use crate::coordinator::{Coordinator, Outcome};
use crate::provisioning::NetworkWatcher;
use crate::transport::ModbusTransport;
use crate::watcher::ConfigWatcher;

use std::io::Write as _;

fn init_logging(level: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .try_init()
}

/// Main application entry point: wires the channels, starts the watcher
/// tasks and runs the coordinator until shutdown or restart.
pub async fn app(mut shutdown_rx: broadcast::Receiver<()>, options: Options) -> Result<()> {
    let _ = init_logging("info");

    let config = ConfigWrapper::new(options.config_file.clone()).unwrap_or_else(|err| {
        error!("Failed to load config: {:?}", err);
        std::process::exit(255);
    });

    // Update log level based on configuration
    let loglevel = config.loglevel();
    if loglevel != "info" {
        if let Err(e) = init_logging(&loglevel) {
            error!("Failed to update log level: {}", e);
        }
    }

    info!("solaredge-monitor {} starting", CARGO_PKG_VERSION);

    let channels = Channels::new();

    // Forward the process-level shutdown signal onto the channels
    {
        let channels = channels.clone();
        tokio::spawn(async move {
            let _ = shutdown_rx.recv().await;
            let _ = channels.shutdown.send(());
        });
    }

    info!("  Starting network watcher...");
    let network = NetworkWatcher::new(config.network().interface().to_string(), channels.clone());
    tokio::spawn(async move {
        if let Err(e) = network.start().await {
            error!("Network watcher failed: {}", e);
        }
    });

    info!("  Starting config watcher...");
    let config_watcher = ConfigWatcher::new(options.config_file.clone(), channels.clone());
    tokio::spawn(async move {
        if let Err(e) = config_watcher.start().await {
            error!("Config watcher failed: {}", e);
        }
    });

    if let Some(button) = config.button() {
        info!("  Starting button poller on GPIO{}...", button.gpio());
        let pin = linux_embedded_hal::Pin::new(button.gpio());
        pin.export()
            .map_err(|e| anyhow!("failed to export GPIO{}: {}", button.gpio(), e))?;
        pin.set_direction(linux_embedded_hal::sysfs_gpio::Direction::In)
            .map_err(|e| anyhow!("failed to configure GPIO{}: {}", button.gpio(), e))?;

        let gpio_button = GpioButton::new(pin, channels.clone());
        tokio::spawn(async move {
            if let Err(e) = gpio_button.start().await {
                error!("Button poller failed: {}", e);
            }
        });
    }

    let inverter = config.inverter();
    let transport = ModbusTransport::new(
        inverter.host().to_string(),
        inverter.port(),
        inverter.unit_id(),
    );
    let surface = display::Oled::new(config.display().i2c_bus())?;

    let mut coordinator = Coordinator::new(config, channels, transport, surface);
    let outcome = coordinator.start().await?;

    coordinator.shared_stats.lock().unwrap().print_summary();

    match outcome {
        Outcome::Restart => info!("exiting for supervisor restart"),
        Outcome::Shutdown => info!("shutdown complete"),
    }

    Ok(())
}
