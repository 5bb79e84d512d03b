//! Config-change detection. A saved configuration requires a restart;
//! this task polls the config file's mtime and publishes a restart
//! request once it changes, then exits.

use crate::file_error;
use crate::prelude::*;

use std::time::SystemTime;

const CHECK_INTERVAL_SECS: u64 = 2;

pub struct ConfigWatcher {
    path: String,
    channels: Channels,
}

impl ConfigWatcher {
    pub fn new(path: String, channels: Channels) -> Self {
        Self { path, channels }
    }

    pub async fn start(&self) -> Result<()> {
        let baseline = self.modified_at()?;
        let mut interval = tokio::time::interval(Duration::from_secs(CHECK_INTERVAL_SECS));

        loop {
            interval.tick().await;

            match self.modified_at() {
                Ok(modified) if modified != baseline => {
                    info!("config {} changed, requesting restart", self.path);
                    let _ = self.channels.restart_requests.send(());
                    return Ok(());
                }
                Ok(_) => {}
                // transient error (editor replacing the file); keep polling
                Err(e) => debug!("config stat failed: {}", e),
            }
        }
    }

    fn modified_at(&self) -> Result<SystemTime> {
        let metadata = std::fs::metadata(&self.path)
            .map_err(|e| file_error!("error reading {}: {}", self.path, e))?;
        Ok(metadata.modified()?)
    }
}
