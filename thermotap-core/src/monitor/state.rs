//! Monitor state
//!
//! One instance per process, owned by the [`Monitor`](super::Monitor) and
//! mutated only from the cooperative loop. If this is ever driven from
//! more than one thread of control, wrap it in a mutex first.

use crate::config::ChipKind;

/// Reporting lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// Not reporting; the bus is ignored
    Stopped,
    /// Sniffing the bus and emitting periodic reports
    Running,
}

/// Shared monitor state
///
/// `temperature_c` is only ever written by a decode that passed the
/// plausibility filter; it is never reset on failure, so readers always
/// see the last known-good value.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorState {
    /// Current lifecycle state
    pub run_state: RunState,
    /// Chip format, fixed at initialization
    chip: ChipKind,
    /// Last accepted decoded temperature (°C)
    pub temperature_c: f32,
    /// Last auxiliary ADC sample (0 on read failure)
    pub last_adc_raw: u16,
    /// Monotonic timestamp of the last start (ms)
    pub run_started_ms: u64,
    /// Next report deadline, relative to `run_started_ms` (ms)
    pub next_report_ms: u64,
}

impl MonitorState {
    /// Create the initial (stopped, zeroed) state for a chip format
    pub const fn new(chip: ChipKind) -> Self {
        Self {
            run_state: RunState::Stopped,
            chip,
            temperature_c: 0.0,
            last_adc_raw: 0,
            run_started_ms: 0,
            next_report_ms: 0,
        }
    }

    /// The chip format this session decodes
    pub const fn chip(&self) -> ChipKind {
        self.chip
    }

    /// Check if periodic reporting is active
    pub const fn is_running(&self) -> bool {
        matches!(self.run_state, RunState::Running)
    }
}
