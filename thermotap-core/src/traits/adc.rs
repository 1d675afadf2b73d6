//! ADC reading trait for the auxiliary analog sample

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read one ADC sample (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}
