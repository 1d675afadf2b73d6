//! Text output trait
//!
//! The monitor produces status and report lines; where they go (UART,
//! RTT, a test buffer) is up to the implementation.

/// Line-oriented text sink
pub trait Console {
    /// Write one line of text
    ///
    /// The implementation appends the line terminator. Output failures are
    /// swallowed by implementations; reporting is never fatal to the loop.
    fn write_line(&mut self, line: &str);
}
