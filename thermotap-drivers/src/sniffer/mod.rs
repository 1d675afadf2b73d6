//! Passive SPI frame sniffer
//!
//! Watches a thermocouple converter bus driven by an external master and
//! reconstructs each frame by polling the raw line levels in software
//! (bit-banged sniffing). The sniffer never drives a line; it aligns
//! itself to the already-running external clock purely by observation.
//!
//! Acquisition walks Idle -> SyncWait -> BitCapture -> FrameComplete ->
//! AwaitDeassert: a cheap chip-select probe, a clock-settle wait, the
//! interrupt-masked bit loop, then sitting out the rest of the select
//! window so the same frame is never decoded twice.

use thermotap_core::config::ChipKind;
use thermotap_core::traits::{SensorFault, ThermocoupleTap};

pub mod frame;
pub mod max6675;
pub mod max31855;

pub use frame::RawFrame;

use frame::capture_frame;

/// Default poll count for the initial clock-settle wait
pub const DEFAULT_SYNC_POLLS: u32 = 1_000;

/// Default poll count for each clock-edge wait
pub const DEFAULT_EDGE_POLLS: u32 = 5_000;

/// Default poll count for the chip-select release wait
pub const DEFAULT_DEASSERT_POLLS: u32 = 100_000;

/// Default MAX6675 calibration offset in °C
///
/// Empirically fitted against a reference probe; per-board, not physics.
pub const DEFAULT_MAX6675_OFFSET_C: f32 = 36.75;

/// Instantaneous bus line levels
///
/// The only hardware-facing surface the sniffer depends on. Queries are
/// pure and reflect the line state at call time, so a scripted double can
/// stand in for real pins.
pub trait BusLines {
    /// Chip-select asserted (frame in progress)?
    fn select_active(&self) -> bool;

    /// Clock line currently high?
    fn clock_high(&self) -> bool;

    /// Data-out line currently high?
    fn data_high(&self) -> bool;
}

/// Poll-count bounds for the acquisition waits
///
/// Raw iteration counts with no fixed relationship to the bus clock
/// frequency; tune per board. They exist so a stalled or disconnected
/// master degrades the capture instead of wedging the loop.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollBudgets {
    /// Bound on the initial clock-settle wait
    pub sync_polls: u32,
    /// Bound on each rising/falling edge wait
    pub edge_polls: u32,
    /// Bound on the chip-select release wait after capture
    pub deassert_polls: u32,
}

impl Default for PollBudgets {
    fn default() -> Self {
        Self {
            sync_polls: DEFAULT_SYNC_POLLS,
            edge_polls: DEFAULT_EDGE_POLLS,
            deassert_polls: DEFAULT_DEASSERT_POLLS,
        }
    }
}

/// Decoder calibration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Subtracted from every MAX6675 reading (°C)
    pub max6675_offset_c: f32,
    /// Left-shift applied to the captured word before field extraction
    ///
    /// Some boards sample one clock late and deliver the frame shifted
    /// right by a bit; 1 undoes that. 0 matches the datasheet layout.
    pub realign_shift: u8,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            max6675_offset_c: DEFAULT_MAX6675_OFFSET_C,
            realign_shift: 0,
        }
    }
}

/// Sniffer configuration
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SnifferConfig {
    /// Acquisition wait bounds
    pub budgets: PollBudgets,
    /// Decoder calibration
    pub calibration: Calibration,
}

/// Decode a captured word for one chip format
pub fn decode_frame(raw: u32, chip: ChipKind, calibration: &Calibration) -> Result<f32, SensorFault> {
    let raw = raw << calibration.realign_shift;
    match chip {
        ChipKind::Max6675 => max6675::decode(raw as u16, calibration.max6675_offset_c),
        ChipKind::Max31855 => max31855::decode(raw),
    }
}

/// Passive bus tap for one chip format
pub struct SpiSniffer<B> {
    bus: B,
    chip: ChipKind,
    config: SnifferConfig,
    last_missed_edges: u16,
}

impl<B: BusLines> SpiSniffer<B> {
    /// Create a sniffer over a set of bus lines
    pub fn new(bus: B, chip: ChipKind, config: SnifferConfig) -> Self {
        Self {
            bus,
            chip,
            config,
            last_missed_edges: 0,
        }
    }

    /// Edge waits that expired during the most recent capture
    ///
    /// Non-zero means the frame was assembled best-effort from whatever
    /// levels were on the lines; callers may want to log it.
    pub fn last_missed_edges(&self) -> u16 {
        self.last_missed_edges
    }
}

impl<B: BusLines> ThermocoupleTap for SpiSniffer<B> {
    fn try_capture(&mut self) -> Option<Result<f32, SensorFault>> {
        if !self.bus.select_active() {
            return None;
        }

        // The bit loop runs with interrupts masked: a tick firing between
        // two edge polls loses bits. Time-keeping stalls for the duration,
        // so the mask covers exactly the settle and bit loops.
        let bits = self.chip.frame_bits();
        let captured =
            critical_section::with(|_| capture_frame(&self.bus, bits, &self.config.budgets));
        self.last_missed_edges = captured.missed_edges;

        #[cfg(feature = "defmt")]
        if captured.missed_edges > 0 {
            defmt::warn!(
                "degraded capture: {=u16} edge waits expired",
                captured.missed_edges
            );
        }

        // Sit out the rest of the select window so the frame is not
        // decoded twice; bounded, so a master wedged with select held
        // low hands control back eventually.
        let mut budget = self.config.budgets.deassert_polls;
        while self.bus.select_active() && budget > 0 {
            budget -= 1;
        }

        Some(decode_frame(captured.word, self.chip, &self.config.calibration))
    }
}
