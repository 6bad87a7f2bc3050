use std::sync::Mutex;
use std::time::Duration;

use crate::ui;

/// Source of the consistency waits
pub trait Clock: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            ui::display_status(&format!(
                "Waiting {}s for the service to settle",
                duration.as_secs()
            ));
            std::thread::sleep(duration);
        }
    }
}

/// Records requested waits without sleeping
#[derive(Debug, Default)]
pub struct RecordingClock {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.waits
            .lock()
            .map(|waits| waits.clone())
            .unwrap_or_default()
    }
}

impl Clock for RecordingClock {
    fn sleep(&self, duration: Duration) {
        if let Ok(mut waits) = self.waits.lock() {
            waits.push(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_clock_keeps_order() {
        let clock = RecordingClock::new();
        clock.sleep(Duration::from_secs(30));
        clock.sleep(Duration::from_secs(5));
        assert_eq!(
            clock.waits(),
            vec![Duration::from_secs(30), Duration::from_secs(5)]
        );
    }

    #[test]
    fn test_system_clock_skips_zero_wait() {
        SystemClock.sleep(Duration::ZERO);
    }
}
