//! Thermotap - passive SPI thermocouple bus monitor
//!
//! Firmware binary for RP2040-based boards. Three GPIO inputs tap the
//! external master's CS/SCK/SO lines, a fourth reads the start/stop
//! button, ADC0 supplies the auxiliary analog sample, and UART0 carries
//! the report stream.
//!
//! Everything runs in one cooperative loop: the sniffer's capture window
//! is the only critical section, and nothing else contends for the
//! monitor state.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{self, Uart, UartTx};
use embassy_time::Instant;
use {defmt_rtt as _, panic_probe as _};

use thermotap_core::config::{ChipKind, MonitorConfig};
use thermotap_core::monitor::Monitor;
use thermotap_core::traits::{AdcReader, ButtonInput, Console};
use thermotap_drivers::sniffer::{BusLines, SnifferConfig, SpiSniffer};

/// Chip format on the sniffed bus, fixed per build
const CHIP: ChipKind = ChipKind::Max6675;

/// The three sniffed bus lines, read straight off the pads
///
/// Chip-select is active low on both supported chips.
struct PinBus {
    select: Input<'static>,
    clock: Input<'static>,
    data: Input<'static>,
}

impl BusLines for PinBus {
    fn select_active(&self) -> bool {
        self.select.is_low()
    }

    fn clock_high(&self) -> bool {
        self.clock.is_high()
    }

    fn data_high(&self) -> bool {
        self.data.is_high()
    }
}

/// Active-low button on a pulled-up pad
struct PinButton {
    pin: Input<'static>,
}

impl ButtonInput for PinButton {
    fn is_pressed(&self) -> bool {
        self.pin.is_low()
    }
}

/// One-shot blocking conversions on ADC0
struct AuxAdc {
    adc: Adc<'static, adc::Blocking>,
    channel: Channel<'static>,
}

impl AdcReader for AuxAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|_| ())
    }
}

/// Report stream on UART0 TX
struct SerialConsole {
    tx: UartTx<'static, UART0, uart::Blocking>,
}

impl Console for SerialConsole {
    fn write_line(&mut self, line: &str) {
        // Reporting is best-effort; a write error drops the line
        let _ = self.tx.blocking_write(line.as_bytes());
        let _ = self.tx.blocking_write(b"\r\n");
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Thermotap firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Bus taps float; the master's board provides the drive
    let bus = PinBus {
        select: Input::new(p.PIN_2, Pull::None),
        clock: Input::new(p.PIN_3, Pull::None),
        data: Input::new(p.PIN_4, Pull::None),
    };

    let button = PinButton {
        pin: Input::new(p.PIN_15, Pull::Up),
    };

    // Auxiliary analog input on GPIO26 / ADC0
    let aux = AuxAdc {
        adc: Adc::new_blocking(p.ADC, adc::Config::default()),
        channel: Channel::new_pin(p.PIN_26, Pull::None),
    };

    // Report stream on UART0 (115200 8N1 default)
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart::Config::default());
    let (tx, _rx) = uart.split();
    let console = SerialConsole { tx };

    info!("GPIO, ADC and UART initialized");

    let sniffer = SpiSniffer::new(bus, CHIP, SnifferConfig::default());
    let mut monitor = Monitor::new(CHIP, MonitorConfig::default(), sniffer, aux, button, console);

    info!("Monitor running, chip format {}", CHIP);

    // One cooperative loop; yield each pass so the executor's timer
    // bookkeeping still runs between ticks.
    loop {
        monitor.tick(Instant::now().as_millis());
        yield_now().await;
    }
}
