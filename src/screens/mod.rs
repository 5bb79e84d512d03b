//! Screen bookkeeping and the three renderers.
//!
//! `ScreenState` is the pure state machine: which screen is showing,
//! when it last rendered, and the idle auto-off clock. The coordinator
//! owns one instance and performs the actual panel side effects.

pub mod compact;
pub mod dashboard;
pub mod status;

use crate::prelude::*;

/// Which screen is currently shown. At boot no screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    NoScreen,
    WifiStatus,
    CompactText,
    Dashboard,
}

impl Screen {
    fn is_content(self) -> bool {
        matches!(self, Screen::CompactText | Screen::Dashboard)
    }
}

pub struct ScreenState {
    current: Screen,
    /// Most recently rendered content screen; the double-click toggle
    /// only ever moves between CompactText and Dashboard.
    last_content: Screen,
    last_network: Option<NetworkState>,
    display_on_since: Instant,
    last_update: Option<Instant>,
    display_on: bool,
}

impl ScreenState {
    pub fn new(now: Instant) -> Self {
        Self {
            current: Screen::NoScreen,
            last_content: Screen::NoScreen,
            last_network: None,
            display_on_since: now,
            last_update: None,
            display_on: true,
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn last_content(&self) -> Screen {
        self.last_content
    }

    pub fn is_on(&self) -> bool {
        self.display_on
    }

    /// True when the status screen must render: the network state
    /// changed, or something else is on the panel. Status renders bypass
    /// the update cadence.
    pub fn wifi_status_due(&self, network: NetworkState) -> bool {
        self.last_network != Some(network) || self.current != Screen::WifiStatus
    }

    /// True only on an actual state change; used once the network is
    /// online so the new label still gets one render before the Modbus
    /// path takes over the panel.
    pub fn network_label_changed(&self, network: NetworkState) -> bool {
        self.last_network != Some(network)
    }

    pub fn note_status_render(&mut self, network: NetworkState) {
        self.current = Screen::WifiStatus;
        self.last_network = Some(network);
    }

    /// The Modbus connect progress lines also go through the status
    /// screen; they carry no network state of their own.
    pub fn note_transport_status(&mut self) {
        self.current = Screen::WifiStatus;
    }

    /// Returns the content screen to render, defaulting to the dashboard
    /// on the first transition out of NoScreen/WifiStatus.
    pub fn content_screen(&mut self) -> Screen {
        if !self.last_content.is_content() {
            self.last_content = Screen::Dashboard;
        }
        self.last_content
    }

    pub fn note_content_render(&mut self, screen: Screen, now: Instant) {
        self.current = screen;
        self.last_content = screen;
        self.last_update = Some(now);
    }

    /// Content screens re-render only on the update cadence, and only
    /// while the panel is powered.
    pub fn update_due(&self, now: Instant, interval: Duration) -> bool {
        self.display_on
            && self
                .last_update
                .map_or(true, |t| now.duration_since(t) >= interval)
    }

    /// A click reactivates the panel without changing the screen.
    /// Returns true when the panel was off and must be powered back on.
    pub fn handle_click(&mut self, now: Instant) -> bool {
        self.display_on_since = now;
        if self.display_on {
            false
        } else {
            self.display_on = true;
            true
        }
    }

    /// A double click toggles between the two content screens and forces
    /// an immediate re-render instead of waiting for the next cadence
    /// tick. Returns true when the panel must be powered back on.
    pub fn handle_double_click(&mut self, now: Instant) -> bool {
        self.last_content = match self.content_screen() {
            Screen::CompactText => Screen::Dashboard,
            _ => Screen::CompactText,
        };
        self.last_update = None;
        self.display_on_since = now;
        if self.display_on {
            false
        } else {
            self.display_on = true;
            true
        }
    }

    /// Fires at most once per activation: powers the panel down after
    /// `auto_off` of no clicks. `auto_off` of zero disables the timer.
    pub fn idle_expired(&mut self, now: Instant, auto_off: Duration) -> bool {
        if auto_off.is_zero() || !self.display_on {
            return false;
        }
        if now.duration_since(self.display_on_since) > auto_off {
            self.display_on = false;
            true
        } else {
            false
        }
    }
}
