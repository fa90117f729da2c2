//! Process teardown: wait for a termination request, then release the display.

use anyhow::Result;
use std::sync::Arc;
use tokio::signal;

use crate::traits::DisplayAdapter;

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn wait_for_signal() -> Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    signal::ctrl_c().await?;

    Ok(())
}

/// Hooks run once, in order, after the scheduler has stopped.
#[derive(Default)]
pub struct ShutdownHooks {
    displays: Vec<Arc<dyn DisplayAdapter>>,
}

impl ShutdownHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power_off_on_exit(mut self, display: Arc<dyn DisplayAdapter>) -> Self {
        self.displays.push(display);
        self
    }

    pub async fn run(self) {
        for display in self.displays {
            display.power_off().await;
        }
        tracing::info!("Shutdown hooks complete");
    }
}
