//! Hardware abstraction traits
//!
//! These traits define the interface between the monitor logic and
//! hardware-specific implementations, and are the seams where scripted
//! test doubles plug in.

pub mod adc;
pub mod button;
pub mod console;
pub mod tap;

pub use adc::AdcReader;
pub use button::ButtonInput;
pub use console::Console;
pub use tap::{SensorFault, ThermocoupleTap};
