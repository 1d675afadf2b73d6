//! Bus sniffer driver implementations
//!
//! This crate provides the concrete implementation of the
//! `ThermocoupleTap` trait defined in thermotap-core:
//!
//! - Passive frame acquisition from raw CS/SCK/SO line levels
//! - MAX6675 (16-bit) and MAX31855 (32-bit) frame decoders
//! - Calibration and poll-budget configuration

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod sniffer;
