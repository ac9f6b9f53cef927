use qrk_bringup::{
    run_bringup, BoardConfig, BoardHost, BringUpError, BringUpOptions,
    BringUpResult, I2cBoardInfo, I2cDevice, Identify, LineFlags,
    ReservedLine, SpiBoardInfo, SpiMode, SpiTable, SpiTables,
};

// ---------------------------------------------------------------------------
// Board tables
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
struct MockPdata {
    gpio_base: u32,
}

static EXP_PDATA: MockPdata = MockPdata { gpio_base: 16 };

static RESERVED: [ReservedLine; 1] =
    [ReservedLine::new(9, LineFlags::IN, "exp-int")];

static I2C_DEVICES: [I2cDevice<MockPdata>; 4] = [
    I2cDevice {
        dev_type: "24c08",
        addresses: &[0x54],
        irq_line: None,
        platform_data: None,
    },
    I2cDevice {
        dev_type: "pcal9555a",
        addresses: &[0x25],
        irq_line: None,
        platform_data: Some(&EXP_PDATA),
    },
    I2cDevice {
        dev_type: "pcal9555a",
        addresses: &[0x27, 0x26],
        irq_line: Some(9),
        platform_data: Some(&EXP_PDATA),
    },
    I2cDevice {
        dev_type: "pca9685",
        addresses: &[0x47],
        irq_line: None,
        platform_data: None,
    },
];

static SPI_ONBOARD: [SpiBoardInfo<MockPdata>; 1] = [SpiBoardInfo {
    modalias: "m25p80",
    max_speed_hz: 0,
    bus_num: 3,
    chip_select: 0,
    mode: SpiMode::Mode0,
    platform_data: None,
    controller_data: None,
}];

static SPI_EXPANSION: [SpiBoardInfo<MockPdata>; 1] = [SpiBoardInfo {
    modalias: "spidev",
    max_speed_hz: 50_000_000,
    bus_num: 1,
    chip_select: 0,
    mode: SpiMode::Mode0,
    platform_data: None,
    controller_data: None,
}];

static SPI_EXPANSION_GPIO_CS: [SpiBoardInfo<MockPdata>; 1] = [SpiBoardInfo {
    modalias: "spidev-gpiocs",
    max_speed_hz: 50_000_000,
    bus_num: 1,
    chip_select: 0,
    mode: SpiMode::Mode0,
    platform_data: None,
    controller_data: None,
}];

fn config(gpio_cs: bool) -> BoardConfig<MockPdata> {
    BoardConfig {
        i2c_adapter: 0,
        reserved_lines: &RESERVED,
        i2c_devices: &I2C_DEVICES,
        spi: SpiTables {
            onboard: &SPI_ONBOARD,
            expansion: &SPI_EXPANSION,
            expansion_gpio_cs: &SPI_EXPANSION_GPIO_CS,
        },
        options: BringUpOptions { gpio_cs },
    }
}

// ---------------------------------------------------------------------------
// Mock host
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
struct MockAdapter(u8);

#[derive(Debug, PartialEq, Eq)]
struct MockError;

/// Everything the sequencer asked the host to do, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    GetAdapter(u8),
    PutAdapter(u8),
    RequestLines(usize),
    LineToIrq(u16),
    Probe(String),
    I2cRegistered { dev_type: String, addr: u16, irq: Option<u32> },
    SpiRegistered(&'static str),
}

#[derive(Default)]
struct MockHost {
    adapter_present: bool,
    fail_lines: bool,
    /// `line_to_irq` finds no interrupt for any line.
    no_irq: bool,
    /// Zero-based I2C probe that finds nothing.
    fail_probe: Option<usize>,
    fail_spi: Option<SpiTable>,
    probes: usize,
    events: Vec<Event>,
}

impl MockHost {
    fn ready() -> Self {
        Self { adapter_present: true, ..Self::default() }
    }

    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    fn puts(&self) -> usize {
        self.count(|e| matches!(e, Event::PutAdapter(_)))
    }

    fn i2c_registered(&self) -> usize {
        self.count(|e| matches!(e, Event::I2cRegistered { .. }))
    }

    fn spi_registered(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::SpiRegistered(name) => Some(*name),
                _ => None,
            })
            .collect()
    }

    fn line_requests(&self) -> usize {
        self.count(|e| matches!(e, Event::RequestLines(_)))
    }
}

impl BoardHost<MockPdata> for MockHost {
    type Adapter = MockAdapter;
    type Client = u16;
    type Error = MockError;

    fn get_adapter(&mut self, nr: u8) -> Option<MockAdapter> {
        self.events.push(Event::GetAdapter(nr));
        self.adapter_present.then_some(MockAdapter(nr))
    }

    fn put_adapter(&mut self, adapter: MockAdapter) {
        self.events.push(Event::PutAdapter(adapter.0));
    }

    fn request_lines(&mut self, lines: &[ReservedLine]) -> Result<(), MockError> {
        if self.fail_lines {
            return Err(MockError);
        }
        self.events.push(Event::RequestLines(lines.len()));
        Ok(())
    }

    fn line_to_irq(&mut self, gpio: u16) -> Option<u32> {
        self.events.push(Event::LineToIrq(gpio));
        if self.no_irq {
            return None;
        }
        Some(32 + gpio as u32)
    }

    fn new_probed_device(
        &mut self,
        adapter: &MockAdapter,
        mut info: I2cBoardInfo<MockPdata>,
        addresses: &[u16],
        identify: Identify<MockAdapter>,
    ) -> Option<u16> {
        let probe = self.probes;
        self.probes += 1;
        self.events.push(Event::Probe(info.dev_type.as_str().to_string()));
        if self.fail_probe == Some(probe) {
            return None;
        }

        let addr = addresses.iter().copied().find(|&a| identify(adapter, a))?;
        info.addr = addr;
        self.events.push(Event::I2cRegistered {
            dev_type: info.dev_type.as_str().to_string(),
            addr: info.addr,
            irq: info.irq,
        });
        Some(addr)
    }

    fn register_spi_board_info(
        &mut self,
        table: &'static [SpiBoardInfo<MockPdata>],
    ) -> Result<(), MockError> {
        let which = if table.as_ptr() == SPI_ONBOARD.as_ptr() {
            SpiTable::Onboard
        } else if table.as_ptr() == SPI_EXPANSION.as_ptr() {
            SpiTable::Expansion
        } else {
            SpiTable::ExpansionGpioCs
        };
        if self.fail_spi == Some(which) {
            return Err(MockError);
        }
        for dev in table {
            self.events.push(Event::SpiRegistered(dev.modalias));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn full_bringup_succeeds() {
    let mut host = MockHost::ready();

    let result = run_bringup(&config(false), &mut host);

    assert_eq!(result, BringUpResult::Success);
    assert_eq!(host.i2c_registered(), 4);
    assert_eq!(host.spi_registered(), ["m25p80", "spidev"]);
    assert_eq!(host.line_requests(), 1);
    assert_eq!(host.puts(), 1);
}

#[test]
fn steps_run_in_order() {
    let mut host = MockHost::ready();

    let _ = run_bringup(&config(false), &mut host);

    let first_probe = host
        .events
        .iter()
        .position(|e| matches!(e, Event::Probe(_)))
        .unwrap();
    let first_spi = host
        .events
        .iter()
        .position(|e| matches!(e, Event::SpiRegistered(_)))
        .unwrap();
    assert_eq!(host.events[0], Event::GetAdapter(0));
    assert_eq!(host.events[1], Event::RequestLines(1));
    assert!(first_probe < first_spi);
    assert_eq!(host.events.last(), Some(&Event::PutAdapter(0)));
}

#[test]
fn missing_adapter_defers_without_side_effects() {
    let mut host = MockHost::default();

    let result = run_bringup(&config(false), &mut host);

    assert_eq!(result, BringUpResult::NotReady);
    assert!(result.is_deferred());
    assert_eq!(host.events, [Event::GetAdapter(0)]);
    assert_eq!(host.puts(), 0);
}

#[test]
fn retry_after_adapter_appears() {
    let mut host = MockHost::default();
    let config = config(false);

    assert!(run_bringup(&config, &mut host).is_deferred());

    host.adapter_present = true;
    assert!(run_bringup(&config, &mut host).is_success());
    assert_eq!(host.i2c_registered(), 4);
    assert_eq!(host.puts(), 1);
}

#[test]
fn reservation_failure_skips_probing() {
    let mut host = MockHost { fail_lines: true, ..MockHost::ready() };

    let result = run_bringup(&config(false), &mut host);

    assert_eq!(
        result,
        BringUpResult::Failed(BringUpError::ReservationFailed(MockError))
    );
    assert_eq!(host.count(|e| matches!(e, Event::Probe(_))), 0);
    assert!(host.spi_registered().is_empty());
    assert_eq!(host.puts(), 1);
}

#[test]
fn probe_failure_stops_at_failing_device() {
    // Third of four devices finds nothing.
    let mut host = MockHost { fail_probe: Some(2), ..MockHost::ready() };

    let result = run_bringup(&config(false), &mut host);

    assert_eq!(
        result,
        BringUpResult::Failed(BringUpError::ProbeFailed {
            index: 2,
            device: "pcal9555a",
        })
    );
    assert_eq!(host.i2c_registered(), 2);
    assert_eq!(host.count(|e| matches!(e, Event::Probe(_))), 3);
    assert!(host.spi_registered().is_empty());
    assert_eq!(host.puts(), 1);
}

#[test]
fn probe_failure_at_each_position() {
    for k in 0..I2C_DEVICES.len() {
        let mut host = MockHost { fail_probe: Some(k), ..MockHost::ready() };

        let result = run_bringup(&config(false), &mut host);

        assert_eq!(
            result.error(),
            Some(&BringUpError::ProbeFailed {
                index: k,
                device: I2C_DEVICES[k].dev_type,
            })
        );
        assert_eq!(host.i2c_registered(), k);
        assert_eq!(host.puts(), 1);
    }
}

#[test]
fn irq_resolved_from_reserved_line() {
    let mut host = MockHost::ready();

    let _ = run_bringup(&config(false), &mut host);

    assert_eq!(host.count(|e| matches!(e, Event::LineToIrq(_))), 1);
    assert!(host.events.contains(&Event::I2cRegistered {
        dev_type: "pcal9555a".to_string(),
        addr: 0x27,
        irq: Some(41),
    }));
    assert!(host.events.contains(&Event::I2cRegistered {
        dev_type: "24c08".to_string(),
        addr: 0x54,
        irq: None,
    }));
}

#[test]
fn unresolved_irq_registers_device_without_one() {
    let mut host = MockHost { no_irq: true, ..MockHost::ready() };

    let result = run_bringup(&config(false), &mut host);

    assert_eq!(result, BringUpResult::Success);
    assert_eq!(host.count(|e| matches!(e, Event::LineToIrq(9))), 1);
    assert_eq!(host.i2c_registered(), 4);
    assert!(host.events.contains(&Event::I2cRegistered {
        dev_type: "pcal9555a".to_string(),
        addr: 0x27,
        irq: None,
    }));
    assert_eq!(host.spi_registered(), ["m25p80", "spidev"]);
    assert_eq!(host.puts(), 1);
}

#[test]
fn gpio_cs_selects_expansion_table() {
    let mut native = MockHost::ready();
    let mut gpio_cs = MockHost::ready();

    assert!(run_bringup(&config(false), &mut native).is_success());
    assert!(run_bringup(&config(true), &mut gpio_cs).is_success());

    assert_eq!(native.spi_registered(), ["m25p80", "spidev"]);
    assert_eq!(gpio_cs.spi_registered(), ["m25p80", "spidev-gpiocs"]);

    let i2c = |host: &MockHost| -> Vec<Event> {
        host.events
            .iter()
            .filter(|e| !matches!(e, Event::SpiRegistered(_)))
            .cloned()
            .collect()
    };
    assert_eq!(i2c(&native), i2c(&gpio_cs));
}

#[test]
fn onboard_spi_failure_is_tagged() {
    let mut host =
        MockHost { fail_spi: Some(SpiTable::Onboard), ..MockHost::ready() };

    let result = run_bringup(&config(false), &mut host);

    assert_eq!(
        result,
        BringUpResult::Failed(BringUpError::RegistrationFailed {
            table: SpiTable::Onboard,
            error: MockError,
        })
    );
    // No rollback of the I2C devices.
    assert_eq!(host.i2c_registered(), 4);
    assert!(host.spi_registered().is_empty());
    assert_eq!(host.puts(), 1);
}

#[test]
fn expansion_spi_failure_is_tagged() {
    let mut host = MockHost {
        fail_spi: Some(SpiTable::ExpansionGpioCs),
        ..MockHost::ready()
    };

    let result = run_bringup(&config(true), &mut host);

    assert_eq!(
        result.error(),
        Some(&BringUpError::RegistrationFailed {
            table: SpiTable::ExpansionGpioCs,
            error: MockError,
        })
    );
    assert_eq!(host.spi_registered(), ["m25p80"]);
    assert_eq!(host.puts(), 1);
}

#[test]
fn error_display_names_the_device() {
    let err: BringUpError<MockError> =
        BringUpError::ProbeFailed { index: 4, device: "pca9685" };
    assert_eq!(err.to_string(), "failed to probe pca9685 I2C device (#4)");

    let err = BringUpError::RegistrationFailed {
        table: SpiTable::ExpansionGpioCs,
        error: MockError,
    };
    assert_eq!(
        err.to_string(),
        "failed to register expansion (gpio cs) SPI devices: MockError"
    );
}
