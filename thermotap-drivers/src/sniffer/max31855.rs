//! MAX31855 frame decoding
//!
//! 32-bit frames: bits [31:18] carry the thermocouple reading as 14-bit
//! two's complement at 0.25 °C per count, bit 16 is the fault summary
//! flag, and bits [2:0] break the fault down (short to VCC, short to
//! ground, open circuit). The internal reference-junction field in bits
//! [15:4] is ignored here.

use thermotap_core::traits::SensorFault;

/// Fault summary flag (D16)
const FAULT_BIT: u32 = 1 << 16;

/// Short-to-VCC fault detail (D2)
const FAULT_VCC_SHORT_BIT: u32 = 1 << 2;

/// Short-to-ground fault detail (D1)
const FAULT_GROUND_SHORT_BIT: u32 = 1 << 1;

/// Open-thermocouple fault detail (D0)
const FAULT_OPEN_BIT: u32 = 1 << 0;

/// Sign bit of the 14-bit thermocouple field
const SIGN_BIT: u16 = 0x2000;

/// Temperature resolution in °C per count
const DEG_C_PER_COUNT: f32 = 0.25;

/// Decode one 32-bit frame
pub fn decode(raw: u32) -> Result<f32, SensorFault> {
    if raw & FAULT_BIT != 0 {
        return Err(fault_detail(raw));
    }

    let mut count = ((raw >> 18) & 0x3FFF) as u16;
    if count & SIGN_BIT != 0 {
        count |= 0xC000; // sign-extend to 16 bits
    }

    Ok(f32::from(count as i16) * DEG_C_PER_COUNT)
}

fn fault_detail(raw: u32) -> SensorFault {
    if raw & FAULT_OPEN_BIT != 0 {
        SensorFault::OpenCircuit
    } else if raw & FAULT_GROUND_SHORT_BIT != 0 {
        SensorFault::ShortToGround
    } else if raw & FAULT_VCC_SHORT_BIT != 0 {
        SensorFault::ShortToVcc
    } else {
        SensorFault::Unknown
    }
}
