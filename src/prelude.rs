pub use std::str::FromStr;
pub use std::time::Duration;

// tokio's Instant so paused-clock tests control the timers
pub use tokio::time::Instant;

pub use anyhow::{anyhow, bail, Result};
pub use log::{debug, error, info, trace, warn};
pub use tokio::sync::broadcast;

pub use crate::{
    button::ButtonEvent,
    channels::Channels,
    config::{Config, ConfigWrapper},
    options::Options,
    provisioning::NetworkState,
};
