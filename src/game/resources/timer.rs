//! Displayed countdown clocks
//!
//! The authority owns clock accounting. The client only shows the most recent
//! reading, refreshed by the clock ticker between moves and replaced by every
//! snapshot.

use crate::core::settings::TimeControl;
use crate::game::types::{ClockReading, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockDisplay {
    reading: ClockReading,
    time_control: TimeControl,
}

impl ClockDisplay {
    /// Both clocks full for the given time control
    pub fn new(time_control: TimeControl) -> Self {
        let full = u64::from(time_control.as_wire_seconds());
        Self {
            reading: ClockReading {
                white_secs: full,
                black_secs: full,
            },
            time_control,
        }
    }

    pub fn update(&mut self, reading: ClockReading) {
        self.reading = reading;
    }

    pub fn reading(&self) -> ClockReading {
        self.reading
    }

    pub fn time_control(&self) -> TimeControl {
        self.time_control
    }

    pub fn seconds(&self, side: Side) -> u64 {
        match side {
            Side::White => self.reading.white_secs,
            Side::Black => self.reading.black_secs,
        }
    }

    /// `m:ss`, or `--:--` without a time limit
    pub fn formatted(&self, side: Side) -> String {
        if self.time_control.is_unlimited() {
            return "--:--".to_string();
        }
        let secs = self.seconds(side);
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

impl Default for ClockDisplay {
    fn default() -> Self {
        Self::new(TimeControl::Unlimited)
    }
}
