//! MAX6675 frame decoding
//!
//! 16-bit frames: bits [15:3] carry an unsigned temperature count at
//! 0.25 °C per step, bit 2 flags an open thermocouple. The chip cannot
//! report below 0 °C, so the calibration offset is the only way a
//! negative value ever comes out of here.

use thermotap_core::traits::SensorFault;

/// Open-thermocouple flag (D2)
const OPEN_CIRCUIT_BIT: u16 = 1 << 2;

/// Temperature resolution in °C per count
const DEG_C_PER_COUNT: f32 = 0.25;

/// Decode one 16-bit frame, applying the calibration offset
pub fn decode(raw: u16, offset_c: f32) -> Result<f32, SensorFault> {
    if raw & OPEN_CIRCUIT_BIT != 0 {
        return Err(SensorFault::OpenCircuit);
    }

    let count = raw >> 3; // bits [15:3]
    Ok(f32::from(count) * DEG_C_PER_COUNT - offset_c)
}
