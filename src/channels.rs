use crate::prelude::*;

/// Broadcast fan-out between the components: the GPIO poller, the
/// network watcher and the config watcher publish; the coordinator
/// drains everything once per tick.
#[derive(Debug, Clone)]
pub struct Channels {
    pub button_events: broadcast::Sender<ButtonEvent>,
    pub network_events: broadcast::Sender<NetworkState>,
    pub restart_requests: broadcast::Sender<()>,
    pub shutdown: broadcast::Sender<()>,
}

impl Default for Channels {
    fn default() -> Self {
        Self::new()
    }
}

impl Channels {
    pub fn new() -> Self {
        Self {
            button_events: Self::channel(),
            network_events: Self::channel(),
            restart_requests: Self::channel(),
            shutdown: Self::channel(),
        }
    }

    fn channel<T: Clone>() -> broadcast::Sender<T> {
        broadcast::channel(64).0
    }
}
