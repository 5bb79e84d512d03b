//! The button boundary: a polled GPIO pin turned into discrete
//! single-click and double-click events on the button channel.

use crate::prelude::*;

use embedded_hal::digital::v2::InputPin;

const POLL_INTERVAL_MS: u64 = 10;
const DEBOUNCE_MS: u64 = 50;
const DOUBLE_CLICK_WINDOW_MS: u64 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Click,
    DoubleClick,
}

/// Edge classifier for a polled button line. Debounces the raw level,
/// counts releases, and waits out the double-click window before
/// reporting a single click.
pub struct ClickDetector {
    raw: bool,
    level: bool,
    edge_at: Instant,
    clicks: u8,
    last_release: Option<Instant>,
}

impl ClickDetector {
    pub fn new(now: Instant) -> Self {
        Self {
            raw: false,
            level: false,
            edge_at: now,
            clicks: 0,
            last_release: None,
        }
    }

    /// Feed the current (active-high) pin level; returns an event once
    /// one is complete.
    pub fn update(&mut self, pressed: bool, now: Instant) -> Option<ButtonEvent> {
        if pressed != self.raw {
            self.raw = pressed;
            self.edge_at = now;
        }

        if pressed != self.level
            && now.duration_since(self.edge_at) >= Duration::from_millis(DEBOUNCE_MS)
        {
            self.level = pressed;
            if !pressed {
                self.clicks += 1;
                self.last_release = Some(now);
                if self.clicks >= 2 {
                    self.clicks = 0;
                    self.last_release = None;
                    return Some(ButtonEvent::DoubleClick);
                }
            }
        }

        if let Some(released) = self.last_release {
            if !self.level
                && now.duration_since(released) >= Duration::from_millis(DOUBLE_CLICK_WINDOW_MS)
            {
                self.clicks = 0;
                self.last_release = None;
                return Some(ButtonEvent::Click);
            }
        }

        None
    }
}

/// Polls a GPIO pin and publishes click events. The pin is active high,
/// matching the original hardware's wiring.
pub struct GpioButton<P> {
    pin: P,
    channels: Channels,
}

impl<P> GpioButton<P>
where
    P: InputPin,
    P::Error: std::fmt::Debug,
{
    pub fn new(pin: P, channels: Channels) -> Self {
        Self { pin, channels }
    }

    pub async fn start(mut self) -> Result<()> {
        let mut detector = ClickDetector::new(Instant::now());
        let mut interval = tokio::time::interval(Duration::from_millis(POLL_INTERVAL_MS));

        loop {
            interval.tick().await;

            let pressed = self
                .pin
                .is_high()
                .map_err(|e| anyhow!("button read failed: {:?}", e))?;

            if let Some(event) = detector.update(pressed, Instant::now()) {
                debug!("button: {:?}", event);
                let _ = self.channels.button_events.send(event);
            }
        }
    }
}
