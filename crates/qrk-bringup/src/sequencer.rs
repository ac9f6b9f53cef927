use crate::descriptor::{I2cDevice, ReservedLine, SpiBoardInfo};
use crate::error::{BringUpError, BringUpResult, SpiTable};
use crate::handle::AdapterHandle;
use crate::host::{always_present, BoardHost};

/// Options fixed when the board support is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BringUpOptions {
    /// Drive the expansion SPI chip select from a GPIO.
    pub gpio_cs: bool,
}

/// SPI device tables of a board.
#[derive(Debug)]
pub struct SpiTables<P: 'static> {
    pub onboard: &'static [SpiBoardInfo<P>],
    pub expansion: &'static [SpiBoardInfo<P>],
    /// Replaces `expansion` when [`BringUpOptions::gpio_cs`] is set.
    pub expansion_gpio_cs: &'static [SpiBoardInfo<P>],
}

impl<P> SpiTables<P> {
    /// The expansion table in use for `gpio_cs`.
    pub fn expansion_for(
        &self,
        gpio_cs: bool,
    ) -> (SpiTable, &'static [SpiBoardInfo<P>]) {
        if gpio_cs {
            (SpiTable::ExpansionGpioCs, self.expansion_gpio_cs)
        } else {
            (SpiTable::Expansion, self.expansion)
        }
    }
}

/// Everything [`run_bringup`] needs to know about a board.
///
/// Built once when the board is attached and passed by reference.
#[derive(Debug)]
pub struct BoardConfig<P: 'static> {
    /// Number of the I2C adapter the devices hang off.
    pub i2c_adapter: u8,
    pub reserved_lines: &'static [ReservedLine],
    /// Probed in order.
    pub i2c_devices: &'static [I2cDevice<P>],
    pub spi: SpiTables<P>,
    pub options: BringUpOptions,
}

/// Bring up the board described by `config`.
///
/// Returns [`BringUpResult::NotReady`] without side effects if the I2C
/// adapter is not registered yet. Otherwise reserves the lines, probes the
/// I2C devices in table order and registers the SPI tables, stopping at the
/// first failure. The adapter is released before returning on every path
/// that acquired it. Nothing registered before a failure is rolled back.
pub fn run_bringup<P, H>(
    config: &BoardConfig<P>,
    host: &mut H,
) -> BringUpResult<H::Error>
where
    P: 'static,
    H: BoardHost<P>,
{
    let Some(mut adapter) =
        AdapterHandle::<P, H>::acquire(host, config.i2c_adapter)
    else {
        #[cfg(feature = "defmt")]
        defmt::info!(
            "i2c adapter {} not ready yet, deferring",
            config.i2c_adapter
        );
        return BringUpResult::NotReady;
    };

    let result = bring_up(config, &mut adapter);
    adapter.release();

    if result.is_ok() {
        #[cfg(feature = "defmt")]
        defmt::info!(
            "board bring-up complete: {} i2c devices",
            config.i2c_devices.len()
        );
    }

    result.into()
}

fn bring_up<P, H>(
    config: &BoardConfig<P>,
    adapter: &mut AdapterHandle<'_, P, H>,
) -> Result<(), BringUpError<H::Error>>
where
    P: 'static,
    H: BoardHost<P>,
{
    if let Err(error) = adapter.host().request_lines(config.reserved_lines) {
        #[cfg(feature = "defmt")]
        defmt::error!(
            "failed to reserve {} gpio lines",
            config.reserved_lines.len()
        );
        return Err(BringUpError::ReservationFailed(error));
    }

    for (index, device) in config.i2c_devices.iter().enumerate() {
        // Interrupts routed through GPIO only exist once the lines are held.
        let irq = match device.irq_line {
            Some(gpio) => {
                let irq = adapter.host().line_to_irq(gpio);
                if irq.is_none() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "no irq for gpio {}, {} registered without one",
                        gpio,
                        device.dev_type
                    );
                }
                irq
            }
            None => None,
        };

        let info = device.board_info(irq);
        let client =
            adapter.probe(info, device.addresses, always_present::<H::Adapter>);
        if client.is_none() {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "failed to probe {} I2C device (#{})",
                device.dev_type,
                index
            );
            return Err(BringUpError::ProbeFailed {
                index,
                device: device.dev_type,
            });
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("probed {} I2C device", device.dev_type);
    }

    let host = adapter.host();
    register_spi(host, SpiTable::Onboard, config.spi.onboard)?;

    let (table, devices) = config.spi.expansion_for(config.options.gpio_cs);
    register_spi(host, table, devices)
}

fn register_spi<P, H>(
    host: &mut H,
    table: SpiTable,
    devices: &'static [SpiBoardInfo<P>],
) -> Result<(), BringUpError<H::Error>>
where
    P: 'static,
    H: BoardHost<P>,
{
    host.register_spi_board_info(devices).map_err(|error| {
        #[cfg(feature = "defmt")]
        defmt::error!("failed to register {} SPI devices", table);
        BringUpError::RegistrationFailed { table, error }
    })?;

    #[cfg(feature = "defmt")]
    defmt::debug!("registered {} {} SPI devices", devices.len(), table);
    Ok(())
}
