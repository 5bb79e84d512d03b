#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use solaredge_monitor::channels::Channels;
use solaredge_monitor::config::{Button, Config, ConfigWrapper, Display, Inverter, Network};
use solaredge_monitor::coordinator::{Coordinator, Outcome};
use solaredge_monitor::display::Surface;
use solaredge_monitor::provisioning::NetworkState;
use solaredge_monitor::register::{self, Register};
use solaredge_monitor::transport::RegisterTransport;

pub struct Factory;

impl Factory {
    pub fn config() -> ConfigWrapper {
        Self::config_with(|_| {})
    }

    pub fn config_with(adjust: impl FnOnce(&mut Config)) -> ConfigWrapper {
        let mut config = Config {
            inverter: Inverter {
                host: "192.168.0.10".to_string(),
                port: 1502,
                unit_id: 1,
            },
            display: Display {
                i2c_bus: "/dev/i2c-1".to_string(),
                auto_off_mins: 15,
                update_interval_secs: 5,
            },
            button: None::<Button>,
            network: Network {
                interface: "wlan0".to_string(),
            },
            loglevel: "info".to_string(),
        };
        adjust(&mut config);
        ConfigWrapper::from_config(config)
    }
}

/// Drawing operations recorded by the mock surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Clear,
    Text { x: i32, y: i32, text: String },
    Bitmap { x: i32, y: i32, width: u32, data: Vec<u8> },
    Rect { x: i32, y: i32, width: u32, height: u32 },
    FillRect { x: i32, y: i32, width: u32, height: u32 },
    Flush,
    Power(bool),
}

/// Surface double that records every operation. Clones share the same
/// recording, so a test keeps a handle while the coordinator owns the
/// other.
#[derive(Clone, Default)]
pub struct MockSurface {
    ops: Arc<Mutex<Vec<Op>>>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn take_ops(&self) -> Vec<Op> {
        std::mem::take(&mut *self.ops.lock().unwrap())
    }

    pub fn texts(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn has_bitmap(&self, data: &[u8]) -> bool {
        self.ops()
            .iter()
            .any(|op| matches!(op, Op::Bitmap { data: d, .. } if d == data))
    }

    pub fn powered(&self) -> Vec<bool> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Power(on) => Some(on),
                _ => None,
            })
            .collect()
    }
}

impl Surface for MockSurface {
    fn clear(&mut self) {
        self.ops.lock().unwrap().push(Op::Clear);
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<()> {
        self.ops.lock().unwrap().push(Op::Text {
            x,
            y,
            text: text.to_string(),
        });
        Ok(())
    }

    fn draw_bitmap(&mut self, x: i32, y: i32, width: u32, data: &[u8]) -> Result<()> {
        self.ops.lock().unwrap().push(Op::Bitmap {
            x,
            y,
            width,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        self.ops.lock().unwrap().push(Op::Rect {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        self.ops.lock().unwrap().push(Op::FillRect {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.ops.lock().unwrap().push(Op::Flush);
        Ok(())
    }

    fn power(&mut self, on: bool) -> Result<()> {
        self.ops.lock().unwrap().push(Op::Power(on));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockTransportState {
    pub connected: bool,
    pub connect_should_fail: bool,
    pub fail_reads: bool,
    pub connect_attempts: u32,
    pub i16_registers: HashMap<u16, i16>,
    pub f32_registers: HashMap<u16, f32>,
}

/// Transport double backed by fixed register values. Like the real
/// transport it drops the connection when a read fails.
#[derive(Clone, Default)]
pub struct MockTransport {
    pub state: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard scenario: producing 5kW, exporting 2kW, battery
    /// discharging 1kW at 76%.
    pub fn with_standard_registers() -> Self {
        let transport = Self::new();
        transport.set_i16(register::I_AC_POWER, 500);
        transport.set_i16(register::I_AC_POWER_SF, 1);
        transport.set_i16(register::M1_AC_POWER, -200);
        transport.set_i16(register::M1_AC_POWER_SF, 1);
        transport.set_f32(register::B1_INSTANTANEOUS_POWER, 1000.0);
        transport.set_f32(register::B1_STATE_OF_ENERGY, 76.0);
        transport
    }

    pub fn set_i16(&self, register: Register, value: i16) {
        self.state
            .lock()
            .unwrap()
            .i16_registers
            .insert(register.address, value);
    }

    pub fn set_f32(&self, register: Register, value: f32) {
        self.state
            .lock()
            .unwrap()
            .f32_registers
            .insert(register.address, value);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn fail_connects(&self, fail: bool) {
        self.state.lock().unwrap().connect_should_fail = fail;
    }

    pub fn connect_attempts(&self) -> u32 {
        self.state.lock().unwrap().connect_attempts
    }
}

/// A coordinator wired up to the mocks, with handles to everything a
/// test needs to drive it.
pub struct Fixture {
    pub channels: Channels,
    pub transport: MockTransport,
    pub surface: MockSurface,
    pub coordinator: Coordinator<MockTransport, MockSurface>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(Factory::config())
    }

    pub fn with_config(config: ConfigWrapper) -> Self {
        let channels = Channels::new();
        let transport = MockTransport::with_standard_registers();
        let surface = MockSurface::new();
        let coordinator = Coordinator::new(
            config,
            channels.clone(),
            transport.clone(),
            surface.clone(),
        );
        Self {
            channels,
            transport,
            surface,
            coordinator,
        }
    }

    pub fn go_online(&self) {
        let _ = self.channels.network_events.send(NetworkState::Online);
    }

    pub async fn tick(&mut self) -> Result<Option<Outcome>> {
        self.coordinator.tick().await
    }

    /// Drives the coordinator online and through the connect path, then
    /// discards the boot-time drawing so tests start from a clean
    /// recording. One more tick renders the first content screen.
    pub async fn tick_until_connected(&mut self) -> Result<()> {
        self.go_online();
        // status render, then the connect path
        self.tick().await?;
        self.tick().await?;
        self.surface.take_ops();
        Ok(())
    }
}

#[async_trait]
impl RegisterTransport for MockTransport {
    async fn connect(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.connect_attempts += 1;
        if state.connect_should_fail {
            bail!("connection refused");
        }
        state.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    async fn read_i16(&mut self, register: Register) -> Result<i16> {
        let mut state = self.state.lock().unwrap();
        if state.fail_reads {
            state.connected = false;
            bail!("read of {} failed: broken pipe", register.name);
        }
        match state.i16_registers.get(&register.address) {
            Some(value) => Ok(*value),
            None => bail!("no such register {}", register.name),
        }
    }

    async fn read_f32(&mut self, register: Register) -> Result<f32> {
        let mut state = self.state.lock().unwrap();
        if state.fail_reads {
            state.connected = false;
            bail!("read of {} failed: broken pipe", register.name);
        }
        match state.f32_registers.get(&register.address) {
            Some(value) => Ok(*value),
            None => bail!("no such register {}", register.name),
        }
    }
}
