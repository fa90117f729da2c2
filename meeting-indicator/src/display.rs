//! Simulated 16x2 character LCD plate with an RGB backlight.
//!
//! Mirrors what the physical plate would show and logs every change, so the
//! service can run on machines without the hardware attached.

use async_trait::async_trait;
use serde::Serialize;
use shared::Status;
use tokio::sync::Mutex;

use crate::traits::DisplayAdapter;

pub const LCD_COLUMNS: usize = 16;
pub const LCD_ROWS: usize = 2;

const BUSY_MESSAGE: &str = "Meeting in\nProgress!";
const FREE_MESSAGE: &str = "I'm free!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backlight {
    #[default]
    Off,
    Red,
    Green,
}

/// What is currently on the plate
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LcdFrame {
    pub backlight: Backlight,
    pub lines: Vec<String>,
}

impl LcdFrame {
    fn blank() -> Self {
        Self::default()
    }

    /// Lay `text` out the way the plate does: one row per line, clipped to the glass.
    fn with_message(backlight: Backlight, text: &str) -> Self {
        let lines = text
            .lines()
            .take(LCD_ROWS)
            .map(|line| line.chars().take(LCD_COLUMNS).collect())
            .collect();
        Self { backlight, lines }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Default)]
pub struct SimulatedLcd {
    frame: Mutex<LcdFrame>,
}

impl SimulatedLcd {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn frame(&self) -> LcdFrame {
        self.frame.lock().await.clone()
    }

    async fn show(&self, next: LcdFrame) {
        let mut frame = self.frame.lock().await;
        if *frame != next {
            tracing::info!(
                "LCD backlight={:?} text={:?}",
                next.backlight,
                next.text()
            );
        }
        *frame = next;
    }
}

#[async_trait]
impl DisplayAdapter for SimulatedLcd {
    async fn render(&self, status: Status) {
        let next = match status {
            Status::Off => LcdFrame::blank(),
            Status::Busy => LcdFrame::with_message(Backlight::Red, BUSY_MESSAGE),
            Status::Free => LcdFrame::with_message(Backlight::Green, FREE_MESSAGE),
            Status::Error => {
                tracing::warn!("Refusing to render error status; keeping current frame");
                return;
            }
        };
        self.show(next).await;
    }

    async fn power_off(&self) {
        tracing::info!("Powering off LCD");
        self.show(LcdFrame::blank()).await;
    }
}
