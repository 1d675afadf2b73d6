//! Start/stop button trait

/// A momentary button, already normalized to pressed = true
///
/// The hardware is typically active-low; implementations hide that.
/// Each call reflects the instantaneous line state at call time.
pub trait ButtonInput {
    /// Check if the button is currently held down
    fn is_pressed(&self) -> bool;
}
