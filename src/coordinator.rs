//! The control loop. One tick polls connectivity, reads the register
//! bank, renders whichever screen is due, then drains button events;
//! `start` runs ticks until shutdown or a requested restart.

use crate::display::Surface;
use crate::metrics::{self, PowerFlowSnapshot};
use crate::prelude::*;
use crate::register;
use crate::screens::{self, Screen, ScreenState};
use crate::transport::RegisterTransport;

use std::net::IpAddr;
use std::sync::{Arc, Mutex};

const POLL_INTERVAL_MS: u64 = 100;
const RESTART_GRACE_MS: u64 = 1000;

// short holds after status transitions so they stay readable before the
// next poll overwrites them; tests run under a paused clock, so these
// advance instantly there
const STATUS_HOLD_MS: u64 = 500;
const CONNECT_HOLD_MS: u64 = 2000;

/// Why the control loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Shutdown was requested (ctrl-c / service stop).
    Shutdown,
    /// The configuration changed; the supervisor relaunches us.
    Restart,
}

#[derive(Default)]
pub struct MonitorStats {
    register_reads: u64,
    read_errors: u64,
    connect_attempts: u64,
    connect_failures: u64,
    status_renders: u64,
    content_renders: u64,
    clicks: u64,
    double_clicks: u64,
    idle_power_offs: u64,
}

impl MonitorStats {
    pub fn print_summary(&self) {
        info!("Monitor statistics:");
        info!("  Register reads: {} ({} errors)", self.register_reads, self.read_errors);
        info!("  Connect attempts: {} ({} failures)", self.connect_attempts, self.connect_failures);
        info!("  Status renders: {}", self.status_renders);
        info!("  Content renders: {}", self.content_renders);
        info!("  Clicks: {} single, {} double", self.clicks, self.double_clicks);
        info!("  Idle power-offs: {}", self.idle_power_offs);
    }
}

pub struct Coordinator<T, S> {
    config: ConfigWrapper,
    transport: T,
    surface: S,
    screen: ScreenState,
    network: NetworkState,
    pub shared_stats: Arc<Mutex<MonitorStats>>,

    button_rx: broadcast::Receiver<ButtonEvent>,
    network_rx: broadcast::Receiver<NetworkState>,
    restart_rx: broadcast::Receiver<()>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl<T, S> Coordinator<T, S>
where
    T: RegisterTransport,
    S: Surface,
{
    pub fn new(config: ConfigWrapper, channels: Channels, transport: T, surface: S) -> Self {
        Self {
            config,
            transport,
            surface,
            screen: ScreenState::new(Instant::now()),
            network: NetworkState::Booting,
            shared_stats: Arc::new(Mutex::new(MonitorStats::default())),
            button_rx: channels.button_events.subscribe(),
            network_rx: channels.network_events.subscribe(),
            restart_rx: channels.restart_requests.subscribe(),
            shutdown_rx: channels.shutdown.subscribe(),
        }
    }

    pub async fn start(&mut self) -> Result<Outcome> {
        info!("coordinator starting");

        loop {
            if let Some(outcome) = self.tick().await? {
                return Ok(outcome);
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    /// One loop iteration: connectivity, registers, render, button.
    pub async fn tick(&mut self) -> Result<Option<Outcome>> {
        if self.shutdown_rx.try_recv().is_ok() {
            info!("shutdown requested");
            return Ok(Some(Outcome::Shutdown));
        }

        if self.restart_rx.try_recv().is_ok() {
            info!("restart in {}ms", RESTART_GRACE_MS);
            tokio::time::sleep(Duration::from_millis(RESTART_GRACE_MS)).await;
            return Ok(Some(Outcome::Restart));
        }

        self.poll_network();

        // while offline the status screen owns the panel; once online a
        // state change still gets one render before the Modbus path runs
        let status_due = if self.network == NetworkState::Online {
            self.screen.network_label_changed(self.network)
        } else {
            self.screen.wifi_status_due(self.network)
        };

        if status_due {
            screens::status::render_network(&mut self.surface, self.network)?;
            self.screen.note_status_render(self.network);
            self.shared_stats.lock().unwrap().status_renders += 1;
            tokio::time::sleep(Duration::from_millis(STATUS_HOLD_MS)).await;
        } else if self.network != NetworkState::Online {
            // status already current; wait for connectivity
        } else if !self.transport.is_connected() {
            self.connect_transport().await?;
        } else {
            let now = Instant::now();
            if self.screen.update_due(now, self.config.display().update_interval()) {
                match self.read_snapshot().await {
                    Ok(snapshot) => self.render_content(&snapshot)?,
                    Err(e) => {
                        // transport drops its connection on failure; the
                        // next tick re-enters the connect path
                        warn!("register read failed: {}", e);
                        self.shared_stats.lock().unwrap().read_errors += 1;
                    }
                }
            }

            if self
                .screen
                .idle_expired(Instant::now(), self.config.display().auto_off())
            {
                info!("idle timeout, powering display off");
                self.shared_stats.lock().unwrap().idle_power_offs += 1;
                self.surface.power(false)?;
            }
        }

        self.drain_buttons()?;

        Ok(None)
    }

    fn poll_network(&mut self) {
        loop {
            match self.network_rx.try_recv() {
                Ok(state) => self.network = state,
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
    }

    /// The Modbus connect path, with its progress rendered on the status
    /// screen. A connect failure is not fatal; the next tick retries.
    async fn connect_transport(&mut self) -> Result<()> {
        let inverter = self.config.inverter();
        info!("inverter address: {} port: {}", inverter.host(), inverter.port());

        let ip_line = format!("IP: {}", inverter.host());
        let port_line = format!("Port: {}", inverter.port());

        if inverter.host().parse::<IpAddr>().is_err() {
            screens::status::render(
                &mut self.surface,
                &["Init Modbus client", &ip_line, &port_line, "> IP is invalid"],
            )?;
            self.screen.note_transport_status();
            tokio::time::sleep(Duration::from_millis(CONNECT_HOLD_MS)).await;
            return Ok(());
        }

        screens::status::render(
            &mut self.surface,
            &["Init Modbus client", &ip_line, &port_line],
        )?;
        self.screen.note_transport_status();
        tokio::time::sleep(Duration::from_millis(CONNECT_HOLD_MS)).await;

        self.shared_stats.lock().unwrap().connect_attempts += 1;
        let result = self.transport.connect().await;
        let verdict = match &result {
            Ok(()) => "> Modbus connected",
            Err(e) => {
                warn!("{}", e);
                self.shared_stats.lock().unwrap().connect_failures += 1;
                "> Modbus conn. failed"
            }
        };

        screens::status::render(
            &mut self.surface,
            &["Init Modbus client", &ip_line, &port_line, verdict],
        )?;
        self.screen.note_transport_status();
        tokio::time::sleep(Duration::from_millis(CONNECT_HOLD_MS)).await;

        Ok(())
    }

    /// Reads the register bank and derives one snapshot. Raw readings
    /// are fetched fresh every tick, never cached across ticks.
    async fn read_snapshot(&mut self) -> Result<PowerFlowSnapshot> {
        let i_ac_power = self.transport.read_i16(register::I_AC_POWER).await?;
        let i_ac_power_sf = self.transport.read_i16(register::I_AC_POWER_SF).await?;
        let inverter_ac = metrics::normalize(i_ac_power, i_ac_power_sf);

        let m_ac_power = self.transport.read_i16(register::M1_AC_POWER).await?;
        let m_ac_power_sf = self.transport.read_i16(register::M1_AC_POWER_SF).await?;
        let meter_ac = metrics::normalize(m_ac_power, m_ac_power_sf);

        let battery_power = self
            .transport
            .read_f32(register::B1_INSTANTANEOUS_POWER)
            .await?;
        let battery_soe = self.transport.read_f32(register::B1_STATE_OF_ENERGY).await?;

        self.shared_stats.lock().unwrap().register_reads += 6;

        let snapshot = PowerFlowSnapshot::derive(
            inverter_ac,
            meter_ac,
            f64::from(battery_power),
            battery_soe,
        );
        debug!(
            "snapshot: sun={:.0}W house={:.0}W grid={:.0}W battery={:.0}W soe={:.0}%",
            snapshot.sun_power,
            snapshot.house_usage,
            snapshot.grid_power,
            snapshot.battery_power,
            snapshot.battery_soe,
        );
        Ok(snapshot)
    }

    fn render_content(&mut self, snapshot: &PowerFlowSnapshot) -> Result<()> {
        let screen = self.screen.content_screen();
        match screen {
            Screen::CompactText => screens::compact::render(&mut self.surface, snapshot)?,
            _ => screens::dashboard::render(&mut self.surface, snapshot)?,
        }
        self.screen.note_content_render(screen, Instant::now());
        self.shared_stats.lock().unwrap().content_renders += 1;
        Ok(())
    }

    fn drain_buttons(&mut self) -> Result<()> {
        loop {
            match self.button_rx.try_recv() {
                Ok(ButtonEvent::Click) => {
                    debug!("click");
                    self.shared_stats.lock().unwrap().clicks += 1;
                    if self.screen.handle_click(Instant::now()) {
                        info!("display reactivated");
                        self.surface.power(true)?;
                    }
                }
                Ok(ButtonEvent::DoubleClick) => {
                    self.shared_stats.lock().unwrap().double_clicks += 1;
                    let reactivate = self.screen.handle_double_click(Instant::now());
                    debug!("double click, switching to {:?}", self.screen.last_content());
                    if reactivate {
                        info!("display reactivated");
                        self.surface.power(true)?;
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        Ok(())
    }
}
