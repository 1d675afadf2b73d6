//! The monitor loop
//!
//! One cooperative loop body, invoked repeatedly by the host environment:
//! debounce the button into start/stop toggles, sniff the bus while
//! running (highest priority, every tick), and emit a report line each
//! time the cadence deadline passes. Report deadlines advance by a fixed
//! interval from the moment the run started; they are not resynchronized
//! against the wall clock, so drift accumulates additively.

use core::fmt::Write;

use heapless::String;

use crate::config::{ChipKind, MonitorConfig};
use crate::traits::{AdcReader, ButtonInput, Console, SensorFault, ThermocoupleTap};

pub mod button;
pub mod state;

pub use button::Debouncer;
pub use state::{MonitorState, RunState};

/// Report lines are short; this leaves slack for extreme values
const REPORT_LINE_CAP: usize = 48;

/// The bus monitor: owns the state and all hardware-facing collaborators
pub struct Monitor<T, A, B, C> {
    state: MonitorState,
    config: MonitorConfig,
    debouncer: Debouncer,
    tap: T,
    adc: A,
    button: B,
    console: C,
}

impl<T, A, B, C> Monitor<T, A, B, C>
where
    T: ThermocoupleTap,
    A: AdcReader,
    B: ButtonInput,
    C: Console,
{
    /// Create a monitor for one chip format, announcing readiness
    ///
    /// The chip format is fixed for the session; there is no runtime
    /// reconfiguration path.
    pub fn new(chip: ChipKind, config: MonitorConfig, tap: T, adc: A, button: B, mut console: C) -> Self {
        console.write_line("System ready. Press the button to start/stop.");
        Self {
            state: MonitorState::new(chip),
            debouncer: Debouncer::new(config.debounce_ms),
            config,
            tap,
            adc,
            button,
            console,
        }
    }

    /// Read access for the reporting path and for host-side inspection
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Run one iteration of the cooperative loop
    ///
    /// `now_ms` is a monotonic millisecond timestamp supplied by the host.
    pub fn tick(&mut self, now_ms: u64) {
        let pressed = self.button.is_pressed();
        if self.debouncer.update(pressed, now_ms) {
            self.toggle_running(now_ms);
        }

        if !self.state.is_running() {
            return;
        }

        // Bus activity outranks everything else: a frame lasts well under a
        // tick, so it must be caught the moment chip-select drops.
        if let Some(decoded) = self.tap.try_capture() {
            self.apply_decode(decoded);
        }

        let elapsed = now_ms.saturating_sub(self.state.run_started_ms);
        if elapsed >= self.state.next_report_ms {
            self.emit_report();
        }
    }

    /// Accept a decode into shared state if it passes the validity filter
    ///
    /// Faulted or implausible decodes leave the previous temperature in
    /// place; this loop has no authority to request a retransmission, so
    /// the last known-good value is the best it can offer.
    fn apply_decode(&mut self, decoded: Result<f32, SensorFault>) {
        match decoded {
            Ok(temp) if temp > self.config.min_plausible_c => {
                self.state.temperature_c = temp;
            }
            Ok(_) => {}
            Err(_) => {}
        }
    }

    fn toggle_running(&mut self, now_ms: u64) {
        match self.state.run_state {
            RunState::Stopped => {
                self.state.run_state = RunState::Running;
                self.state.run_started_ms = now_ms;
                self.state.next_report_ms = 0;
                self.console.write_line("--- START ---");
                self.console.write_line("Time(ms)\tTemp(C)\tADC_Raw");
            }
            RunState::Running => {
                self.state.run_state = RunState::Stopped;
                self.console.write_line("--- STOP ---");
            }
        }
    }

    /// Sample the auxiliary ADC and emit one report line
    ///
    /// The time column is the nominal deadline, not the measured elapsed
    /// time, so the log reads in exact cadence steps.
    fn emit_report(&mut self) {
        let sample = self.adc.read().unwrap_or(0);
        self.state.last_adc_raw = sample;

        let mut line: String<REPORT_LINE_CAP> = String::new();
        let _ = write!(
            line,
            "{}\t{:.2}\t{}",
            self.state.next_report_ms, self.state.temperature_c, sample
        );
        self.console.write_line(&line);

        self.state.next_report_ms += self.config.report_interval_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::string::String as StdString;
    use std::vec::Vec;

    struct ScriptTap {
        outcomes: Vec<Option<Result<f32, SensorFault>>>,
        next: usize,
    }

    impl ScriptTap {
        fn new(outcomes: &[Option<Result<f32, SensorFault>>]) -> Self {
            Self {
                outcomes: outcomes.into(),
                next: 0,
            }
        }

        fn idle() -> Self {
            Self::new(&[])
        }
    }

    impl ThermocoupleTap for ScriptTap {
        fn try_capture(&mut self) -> Option<Result<f32, SensorFault>> {
            let out = self.outcomes.get(self.next).copied().flatten();
            self.next += 1;
            out
        }
    }

    /// Tap that must never be asked for a frame
    struct UntouchableTap;

    impl ThermocoupleTap for UntouchableTap {
        fn try_capture(&mut self) -> Option<Result<f32, SensorFault>> {
            panic!("bus tapped while stopped");
        }
    }

    struct FixedAdc(u16);

    impl AdcReader for FixedAdc {
        fn read(&mut self) -> Result<u16, ()> {
            Ok(self.0)
        }
    }

    struct BrokenAdc;

    impl AdcReader for BrokenAdc {
        fn read(&mut self) -> Result<u16, ()> {
            Err(())
        }
    }

    /// Button level script, one entry consumed per poll
    struct ScriptButton {
        levels: Vec<bool>,
        next: Cell<usize>,
    }

    impl ScriptButton {
        fn new(levels: &[bool]) -> Self {
            Self {
                levels: levels.into(),
                next: Cell::new(0),
            }
        }
    }

    impl ButtonInput for ScriptButton {
        fn is_pressed(&self) -> bool {
            let i = self.next.get();
            self.next.set(i + 1);
            self.levels.get(i).copied().unwrap_or(false)
        }
    }

    #[derive(Clone, Default)]
    struct CapturedConsole(Rc<RefCell<Vec<StdString>>>);

    impl CapturedConsole {
        fn lines(&self) -> Vec<StdString> {
            self.0.borrow().clone()
        }
    }

    impl Console for CapturedConsole {
        fn write_line(&mut self, line: &str) {
            self.0.borrow_mut().push(line.into());
        }
    }

    fn start_running<T: ThermocoupleTap, A: AdcReader>(
        tap: T,
        adc: A,
        extra_button: &[bool],
    ) -> (Monitor<T, A, ScriptButton, CapturedConsole>, CapturedConsole) {
        // Press at t=0, confirm at t=20, release at t=30
        let mut levels = std::vec![true, true, false];
        levels.extend_from_slice(extra_button);
        let console = CapturedConsole::default();
        let mut monitor = Monitor::new(
            ChipKind::Max6675,
            MonitorConfig::default(),
            tap,
            adc,
            ScriptButton::new(&levels),
            console.clone(),
        );
        monitor.tick(0);
        monitor.tick(20);
        monitor.tick(30);
        (monitor, console)
    }

    #[test]
    fn test_ready_banner_on_construction() {
        let console = CapturedConsole::default();
        let _monitor = Monitor::new(
            ChipKind::Max31855,
            MonitorConfig::default(),
            ScriptTap::idle(),
            FixedAdc(0),
            ScriptButton::new(&[]),
            console.clone(),
        );
        assert_eq!(console.lines().len(), 1);
        assert!(console.lines()[0].starts_with("System ready"));
    }

    #[test]
    fn test_start_emits_headers_and_first_report() {
        let (monitor, console) = start_running(ScriptTap::idle(), FixedAdc(512), &[]);
        assert!(monitor.state().is_running());

        let lines = console.lines();
        assert_eq!(lines[1], "--- START ---");
        assert_eq!(lines[2], "Time(ms)\tTemp(C)\tADC_Raw");
        // First report fires at the nominal 0 ms mark
        assert_eq!(lines[3], "0\t0.00\t512");
    }

    #[test]
    fn test_stop_emits_footer() {
        // Second press at t=100, confirmed at t=120
        let (mut monitor, console) =
            start_running(ScriptTap::idle(), FixedAdc(0), &[true, true, false]);
        monitor.tick(100);
        monitor.tick(120);
        monitor.tick(130);

        assert!(!monitor.state().is_running());
        assert_eq!(console.lines().last().unwrap(), "--- STOP ---");
    }

    #[test]
    fn test_report_cadence_is_additive() {
        let (mut monitor, console) = start_running(ScriptTap::idle(), FixedAdc(100), &[]);
        // Run started at t=20; drive to 79 ms elapsed
        monitor.tick(70); // elapsed 50 -> second report
        monitor.tick(80); // elapsed 60 -> nothing
        monitor.tick(99); // elapsed 79 -> nothing, third report still pending

        let reports: Vec<_> = console
            .lines()
            .into_iter()
            .filter(|l| l.ends_with("\t100"))
            .collect();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].starts_with("0\t"));
        assert!(reports[1].starts_with("50\t"));
        assert_eq!(monitor.state().next_report_ms, 100);
    }

    #[test]
    fn test_accepted_decode_updates_temperature() {
        let tap = ScriptTap::new(&[Some(Ok(99.5))]);
        let (monitor, console) = start_running(tap, FixedAdc(7), &[]);
        assert!((monitor.state().temperature_c - 99.5).abs() < 1e-4);
        // The decode lands before the report on the same tick
        assert_eq!(console.lines()[3], "0\t99.50\t7");
    }

    #[test]
    fn test_invalid_decodes_keep_last_good_value() {
        let tap = ScriptTap::new(&[
            Some(Ok(99.5)),
            Some(Ok(-36.75)),
            Some(Err(SensorFault::OpenCircuit)),
            None,
            Some(Err(SensorFault::ShortToGround)),
        ]);
        let (mut monitor, _console) = start_running(tap, FixedAdc(0), &[]);
        for now in [40, 41, 42, 43] {
            monitor.tick(now);
            assert!((monitor.state().temperature_c - 99.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let config = MonitorConfig::default();
        let tap = ScriptTap::new(&[Some(Ok(config.min_plausible_c))]);
        let (monitor, _console) = start_running(tap, FixedAdc(0), &[]);
        // A value exactly at the threshold is still noise
        assert_eq!(monitor.state().temperature_c, 0.0);
    }

    #[test]
    fn test_adc_failure_reports_zero() {
        let (monitor, console) = start_running(ScriptTap::idle(), BrokenAdc, &[]);
        assert_eq!(console.lines()[3], "0\t0.00\t0");
        assert_eq!(monitor.state().last_adc_raw, 0);
    }

    #[test]
    fn test_stopped_monitor_leaves_bus_alone() {
        let console = CapturedConsole::default();
        let mut monitor = Monitor::new(
            ChipKind::Max6675,
            MonitorConfig::default(),
            UntouchableTap,
            FixedAdc(0),
            ScriptButton::new(&[]),
            console.clone(),
        );
        for now in 0..50 {
            monitor.tick(now);
        }
        assert_eq!(console.lines().len(), 1); // just the ready banner
    }
}
