//! Board-agnostic core logic for the Thermotap bus monitor
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (thermocouple tap, ADC, button, console)
//! - Monitor state and the running/stopped lifecycle
//! - Button debouncing
//! - The cooperative scheduler loop (sniff + periodic reporting)
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod monitor;
pub mod traits;
