use bitflags::bitflags;
use heapless::String;

/// Capacity of an I2C device type name.
pub const I2C_NAME_SIZE: usize = 20;

/// Device type string handed to the I2C core, e.g. `"pcal9555a"`.
pub type DeviceType = String<I2C_NAME_SIZE>;

bitflags! {
    /// Request flags for a GPIO line.
    ///
    /// An empty set requests an output driven low.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LineFlags: u8 {
        /// Line is an input.
        const DIR_IN = 1 << 0;
        /// Output starts high.
        const INIT_HIGH = 1 << 1;
    }
}

impl LineFlags {
    pub const IN: Self = Self::DIR_IN;
    pub const OUT_INIT_LOW: Self = Self::empty();
    pub const OUT_INIT_HIGH: Self = Self::INIT_HIGH;

    pub fn is_input(self) -> bool {
        self.contains(Self::DIR_IN)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LineFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "LineFlags({=u8:#x})", self.bits())
    }
}

/// A GPIO line claimed on behalf of firmware or another driver.
///
/// Once requested the line is never released nor driven by the board code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReservedLine {
    pub gpio: u16,
    pub flags: LineFlags,
    pub label: &'static str,
}

impl ReservedLine {
    pub const fn new(gpio: u16, flags: LineFlags, label: &'static str) -> Self {
        Self { gpio, flags, label }
    }
}

/// Static description of an I2C device known to be soldered on the board.
///
/// `P` is the board's platform data type; the sequencer never looks inside
/// it and only forwards the reference to the host.
#[derive(Debug)]
pub struct I2cDevice<P: 'static> {
    /// Type name the I2C core matches drivers against.
    pub dev_type: &'static str,
    /// Candidate addresses, tried in order.
    pub addresses: &'static [u16],
    /// GPIO line whose interrupt is routed to the device, if any.
    pub irq_line: Option<u16>,
    pub platform_data: Option<&'static P>,
}

impl<P> I2cDevice<P> {
    /// Build the board info registered for this device.
    ///
    /// `irq` is the interrupt resolved from [`I2cDevice::irq_line`] at
    /// bring-up time. The address is left at zero; the host fills it in with
    /// the candidate that was accepted.
    pub fn board_info(&self, irq: Option<u32>) -> I2cBoardInfo<P> {
        I2cBoardInfo {
            dev_type: device_type(self.dev_type),
            addr: 0,
            irq,
            platform_data: self.platform_data,
        }
    }
}

/// Per-attempt board info for one I2C device.
#[derive(Debug)]
pub struct I2cBoardInfo<P: 'static> {
    pub dev_type: DeviceType,
    pub addr: u16,
    pub irq: Option<u32>,
    pub platform_data: Option<&'static P>,
}

/// Copy `name` into a [`DeviceType`].
///
/// At most `I2C_NAME_SIZE - 1` bytes are kept, the last byte of the I2C
/// core's name buffer holds the terminator. Truncation never splits a
/// character.
fn device_type(name: &str) -> DeviceType {
    let mut out = DeviceType::new();
    for c in name.chars() {
        if out.len() + c.len_utf8() >= I2C_NAME_SIZE {
            break;
        }
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Clock polarity and phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    #[default]
    Mode0,
    Mode1,
    Mode2,
    Mode3,
}

/// Static description of a device on an SPI bus.
#[derive(Debug)]
pub struct SpiBoardInfo<P: 'static> {
    /// Driver name the SPI core binds the device to.
    pub modalias: &'static str,
    /// Zero leaves the controller default in place.
    pub max_speed_hz: u32,
    pub bus_num: u16,
    pub chip_select: u16,
    pub mode: SpiMode,
    pub platform_data: Option<&'static P>,
    /// Controller specific data, e.g. a GPIO chip select.
    pub controller_data: Option<&'static P>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_truncates_long_names() {
        let name = device_type("a-device-name-that-is-far-too-long");
        assert_eq!(name.len(), I2C_NAME_SIZE - 1);
        assert_eq!(name.as_str(), "a-device-name-that-");
    }

    #[test]
    fn device_type_keeps_names_that_fit() {
        let name = device_type("abcdefghijklmnopqrs");
        assert_eq!(name.as_str(), "abcdefghijklmnopqrs");

        let info = I2cDevice::<()> {
            dev_type: "abcdefghijklmnopqrstuvwxyz",
            addresses: &[0x50],
            irq_line: None,
            platform_data: None,
        }
        .board_info(None);
        assert_eq!(info.dev_type.as_str(), "abcdefghijklmnopqrs");
    }

    #[test]
    fn device_type_does_not_split_characters() {
        // 18 ASCII bytes, then a two-byte character that would end at 20.
        let name = device_type("abcdefghijklmnopqré");
        assert_eq!(name.as_str(), "abcdefghijklmnopqr");
    }

    #[test]
    fn board_info_carries_irq() {
        let dev: I2cDevice<()> = I2cDevice {
            dev_type: "pcal9555a",
            addresses: &[0x27],
            irq_line: Some(9),
            platform_data: None,
        };
        let info = dev.board_info(Some(41));
        assert_eq!(info.dev_type.as_str(), "pcal9555a");
        assert_eq!(info.addr, 0);
        assert_eq!(info.irq, Some(41));
    }

    #[test]
    fn line_flags_direction() {
        assert!(LineFlags::IN.is_input());
        assert!(!LineFlags::OUT_INIT_HIGH.is_input());
        assert!(LineFlags::OUT_INIT_LOW.is_empty());
        assert_eq!(LineFlags::all(), LineFlags::DIR_IN | LineFlags::INIT_HIGH);
    }
}
