//! The register transport boundary: reads of named SunSpec registers
//! over a connection endpoint, plus the connect/is-connected pair the
//! control loop drives its retry path with.

use crate::prelude::*;
use crate::register::Register;

use async_trait::async_trait;
use std::net::SocketAddr;
use tokio_modbus::client::{tcp, Context, Reader};
use tokio_modbus::slave::Slave;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 5;

#[async_trait]
pub trait RegisterTransport {
    async fn connect(&mut self) -> Result<()>;
    fn is_connected(&self) -> bool;
    /// Reads a signed 16-bit register.
    async fn read_i16(&mut self, register: Register) -> Result<i16>;
    /// Reads an IEEE-754 32-bit register pair.
    async fn read_f32(&mut self, register: Register) -> Result<f32>;
}

/// Modbus TCP client for the inverter's register bank. A failed read
/// drops the context so the control loop falls back to the
/// connection-status path and retries.
pub struct ModbusTransport {
    host: String,
    port: u16,
    unit_id: u8,
    ctx: Option<Context>,
}

impl ModbusTransport {
    pub fn new(host: String, port: u16, unit_id: u8) -> Self {
        Self {
            host,
            port,
            unit_id,
            ctx: None,
        }
    }

    async fn read_words(&mut self, register: Register) -> Result<Vec<u16>> {
        let ctx = match self.ctx.as_mut() {
            Some(ctx) => ctx,
            None => bail!("not connected to {}:{}", self.host, self.port),
        };

        let read = ctx.read_holding_registers(register.address, register.words);
        match tokio::time::timeout(Duration::from_secs(READ_TIMEOUT_SECS), read).await {
            Ok(Ok(words)) if words.len() == register.words as usize => Ok(words),
            Ok(Ok(words)) => {
                self.ctx = None;
                Err(anyhow!(
                    "short read of {}: got {} of {} words",
                    register.name,
                    words.len(),
                    register.words
                ))
            }
            Ok(Err(e)) => {
                self.ctx = None;
                Err(anyhow!("read of {} failed: {}", register.name, e))
            }
            Err(_) => {
                self.ctx = None;
                Err(anyhow!(
                    "read of {} timed out after {}s",
                    register.name,
                    READ_TIMEOUT_SECS
                ))
            }
        }
    }
}

#[async_trait]
impl RegisterTransport for ModbusTransport {
    async fn connect(&mut self) -> Result<()> {
        let endpoint: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow!("invalid inverter address {}:{}: {}", self.host, self.port, e))?;

        info!("connecting to inverter at {}", endpoint);

        let connect = tcp::connect_slave(endpoint, Slave(self.unit_id));
        match tokio::time::timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS), connect).await {
            Ok(Ok(ctx)) => {
                info!("inverter connection established");
                self.ctx = Some(ctx);
                Ok(())
            }
            Ok(Err(e)) => bail!("failed to connect to inverter: {}", e),
            Err(_) => bail!("connection timeout after {} seconds", CONNECT_TIMEOUT_SECS),
        }
    }

    fn is_connected(&self) -> bool {
        self.ctx.is_some()
    }

    async fn read_i16(&mut self, register: Register) -> Result<i16> {
        let words = self.read_words(register).await?;
        Ok(words[0] as i16)
    }

    async fn read_f32(&mut self, register: Register) -> Result<f32> {
        let words = self.read_words(register).await?;
        if words.len() < 2 {
            bail!("register {} is not a float32", register.name);
        }
        // battery block floats are little-endian word order
        let bits = (u32::from(words[1]) << 16) | u32::from(words[0]);
        Ok(f32::from_bits(bits))
    }
}
