//! The provisioning boundary: host network connectivity as an enumerated
//! state, published on the network channel whenever it changes.

use crate::prelude::*;

use std::path::Path;

const PROBE_INTERVAL_SECS: u64 = 1;

/// Connectivity state of the host network. Labels match the status
/// screen wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    Booting,
    Connecting,
    ApMode,
    NotConfigured,
    Offline,
    Online,
}

impl NetworkState {
    pub fn label(&self) -> &'static str {
        match self {
            NetworkState::Booting => "Booting",
            NetworkState::Connecting => "Connecting to WiFi",
            NetworkState::ApMode => "Access Point Mode",
            NetworkState::NotConfigured => "Not configured",
            NetworkState::Offline => "Offline",
            NetworkState::Online => "Online",
        }
    }
}

/// Watches a network interface through sysfs and publishes state
/// transitions. The coordinator only ever consumes the channel; it never
/// probes the interface itself.
pub struct NetworkWatcher {
    interface: String,
    channels: Channels,
}

impl NetworkWatcher {
    pub fn new(interface: String, channels: Channels) -> Self {
        Self {
            interface,
            channels,
        }
    }

    pub async fn start(&self) -> Result<()> {
        let mut last = NetworkState::Booting;
        let _ = self.channels.network_events.send(last);

        let mut interval = tokio::time::interval(Duration::from_secs(PROBE_INTERVAL_SECS));

        loop {
            interval.tick().await;

            let state = self.probe();
            if state != last {
                info!("network {}: {} -> {}", self.interface, last.label(), state.label());
                let _ = self.channels.network_events.send(state);
                last = state;
            }
        }
    }

    fn probe(&self) -> NetworkState {
        let base = format!("/sys/class/net/{}", self.interface);
        if !Path::new(&base).exists() {
            return NetworkState::NotConfigured;
        }

        match std::fs::read_to_string(format!("{}/operstate", base)) {
            Ok(state) => match state.trim() {
                "up" => NetworkState::Online,
                "dormant" => NetworkState::Connecting,
                _ => NetworkState::Offline,
            },
            Err(_) => NetworkState::Offline,
        }
    }
}
