//! Button debouncing
//!
//! A press is confirmed only if the button is still down `debounce_ms`
//! after it was first seen, and further presses are ignored until the
//! button is released again. The whole thing is polled so the cooperative
//! loop never blocks waiting on the button.

/// Debounce phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for a press
    Armed,
    /// Press seen; confirm it is still held at the deadline
    Pending { confirm_at_ms: u64 },
    /// Toggle delivered; ignore the button until it is released
    WaitRelease,
}

/// Polled button debouncer
#[derive(Debug, Clone)]
pub struct Debouncer {
    debounce_ms: u64,
    phase: Phase,
}

impl Debouncer {
    /// Create a debouncer with the given confirmation delay
    pub const fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            phase: Phase::Armed,
        }
    }

    /// Feed the current button level; returns true on a confirmed press
    ///
    /// At most one confirmed press is reported per physical press, no
    /// matter how often this is polled or how much the contacts bounce.
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> bool {
        match self.phase {
            Phase::Armed => {
                if pressed {
                    self.phase = Phase::Pending {
                        confirm_at_ms: now_ms + self.debounce_ms,
                    };
                }
                false
            }
            Phase::Pending { confirm_at_ms } => {
                if now_ms < confirm_at_ms {
                    return false;
                }
                if pressed {
                    self.phase = Phase::WaitRelease;
                    true
                } else {
                    // Bounce or a tap shorter than the debounce window
                    self.phase = Phase::Armed;
                    false
                }
            }
            Phase::WaitRelease => {
                if !pressed {
                    self.phase = Phase::Armed;
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_confirmed_after_delay() {
        let mut d = Debouncer::new(20);
        assert!(!d.update(true, 0));
        assert!(!d.update(true, 10));
        assert!(d.update(true, 20));
    }

    #[test]
    fn test_short_tap_rejected() {
        let mut d = Debouncer::new(20);
        assert!(!d.update(true, 0));
        // Released by the time the deadline arrives
        assert!(!d.update(false, 25));
        assert!(!d.update(false, 30));
    }

    #[test]
    fn test_double_press_within_window_is_one_toggle() {
        let mut d = Debouncer::new(20);
        let mut toggles = 0;
        // Press, bounce open, press again - all inside the window
        for (pressed, now) in [(true, 0), (false, 5), (true, 10), (true, 20), (true, 25)] {
            if d.update(pressed, now) {
                toggles += 1;
            }
        }
        assert_eq!(toggles, 1);
    }

    #[test]
    fn test_held_button_toggles_once() {
        let mut d = Debouncer::new(20);
        let mut toggles = 0;
        for now in 0..200 {
            if d.update(true, now) {
                toggles += 1;
            }
        }
        assert_eq!(toggles, 1);
        // Release re-arms for the next press
        assert!(!d.update(false, 200));
        assert!(!d.update(true, 210));
        assert!(d.update(true, 230));
    }
}
