use crate::file_error;
use crate::prelude::*;

use serde::Deserialize;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub inverter: Inverter,

    #[serde(default = "Config::default_display")]
    pub display: Display,

    #[serde(default)]
    pub button: Option<Button>,

    #[serde(default = "Config::default_network")]
    pub network: Network,

    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,
}

// Inverter {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Inverter {
    pub host: String,
    pub port: u16,

    #[serde(default = "Config::default_unit_id")]
    pub unit_id: u8,
}

impl Inverter {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn unit_id(&self) -> u8 {
        self.unit_id
    }
} // }}}

// Display {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Display {
    #[serde(default = "Config::default_i2c_bus")]
    pub i2c_bus: String,

    /// Turn the panel off after this many minutes to reduce OLED
    /// wearing; 0 = always on.
    #[serde(default = "Config::default_auto_off_mins")]
    pub auto_off_mins: u64,

    #[serde(default = "Config::default_update_interval_secs")]
    pub update_interval_secs: u64,
}

impl Display {
    pub fn i2c_bus(&self) -> &str {
        &self.i2c_bus
    }

    pub fn auto_off(&self) -> Duration {
        Duration::from_secs(self.auto_off_mins * 60)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }
} // }}}

// Button {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Button {
    pub gpio: u64,
}

impl Button {
    pub fn gpio(&self) -> u64 {
        self.gpio
    }
} // }}}

// Network {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Network {
    #[serde(default = "Config::default_interface")]
    pub interface: String,
}

impl Network {
    pub fn interface(&self) -> &str {
        &self.interface
    }
} // }}}

pub struct ConfigWrapper {
    config: Arc<Mutex<Config>>,
}

impl Clone for ConfigWrapper {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
        }
    }
}

impl ConfigWrapper {
    pub fn new(file: String) -> Result<Self> {
        let config = Config::new(file)?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            config: Arc::new(Mutex::new(config)),
        }
    }

    pub fn inverter(&self) -> Inverter {
        self.config.lock().unwrap().inverter.clone()
    }

    pub fn display(&self) -> Display {
        self.config.lock().unwrap().display.clone()
    }

    pub fn button(&self) -> Option<Button> {
        self.config.lock().unwrap().button.clone()
    }

    pub fn network(&self) -> Network {
        self.config.lock().unwrap().network.clone()
    }

    pub fn loglevel(&self) -> String {
        self.config.lock().unwrap().loglevel.clone()
    }
}

impl Config {
    pub fn new(file: String) -> Result<Self> {
        info!("Reading configuration from {}", file);
        let content = std::fs::read_to_string(&file)
            .map_err(|err| file_error!("error reading {}: {}", file, err))?;

        let config: Self = serde_yaml::from_str(&content)?;

        info!("Configuration loaded:");
        info!("  Inverter: {}:{} (unit {})", config.inverter.host, config.inverter.port, config.inverter.unit_id);
        info!("  Display: {} (auto-off {}m, update every {}s)",
            config.display.i2c_bus,
            config.display.auto_off_mins,
            config.display.update_interval_secs,
        );
        match &config.button {
            Some(button) => info!("  Button: GPIO{}", button.gpio),
            None => info!("  Button: none"),
        }
        info!("  Network interface: {}", config.network.interface);
        info!("  Log Level: {}", config.loglevel);

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        // Note the host is deliberately NOT parsed as an address here: a
        // malformed address is surfaced on the status screen instead of
        // failing startup.
        if self.inverter.host.is_empty() {
            bail!("inverter.host cannot be empty");
        }
        if self.inverter.port == 0 {
            bail!("inverter.port must be between 1 and 65535");
        }
        if self.display.update_interval_secs == 0 {
            bail!("display.update_interval_secs must be at least 1");
        }
        if self.network.interface.is_empty() {
            bail!("network.interface cannot be empty");
        }

        Ok(())
    }

    fn default_unit_id() -> u8 {
        1
    }

    fn default_i2c_bus() -> String {
        "/dev/i2c-1".to_string()
    }

    fn default_auto_off_mins() -> u64 {
        15
    }

    fn default_update_interval_secs() -> u64 {
        5
    }

    fn default_display() -> Display {
        Display {
            i2c_bus: Self::default_i2c_bus(),
            auto_off_mins: Self::default_auto_off_mins(),
            update_interval_secs: Self::default_update_interval_secs(),
        }
    }

    fn default_interface() -> String {
        "wlan0".to_string()
    }

    fn default_network() -> Network {
        Network {
            interface: Self::default_interface(),
        }
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }
}
