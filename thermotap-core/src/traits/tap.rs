//! Thermocouple tap trait
//!
//! The monitor consumes decoded temperatures from a passive bus tap; the
//! concrete sniffer lives in the drivers crate.

/// Faults reported by the thermocouple converter itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorFault {
    /// Thermocouple disconnected (open circuit)
    OpenCircuit,
    /// Thermocouple shorted to ground
    ShortToGround,
    /// Thermocouple shorted to VCC
    ShortToVcc,
    /// Fault flagged without further detail
    Unknown,
}

/// A passive source of decoded thermocouple temperatures
///
/// Implementations watch a bus driven by an external master and decode
/// whatever frames appear on it; they never initiate a transfer.
pub trait ThermocoupleTap {
    /// Capture and decode one frame if the bus is currently active
    ///
    /// Returns `None` without touching the bus further when no frame is in
    /// progress, so it is cheap to call on every scheduler tick. Returns
    /// `Some(Err(_))` when the captured frame carries a device fault flag.
    fn try_capture(&mut self) -> Option<Result<f32, SensorFault>>;
}
