/// Platform data handed to the drivers of the board's devices.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QrkPlatformData {
    Pca953x(Pca953xPlatformData),
    Pca9685(Pca9685PlatformData),
    Adc1x8s102(Adc1x8s102PlatformData),
    Flash(FlashPlatformData),
    SpiChip(Pxa2xxSpiChip),
}

/// PCA953x family GPIO expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pca953xPlatformData {
    /// First GPIO number of the expander.
    pub gpio_base: u32,
    /// `None` disables the expander's interrupt controller. `Some(0)` lets
    /// it allocate descriptors dynamically.
    pub irq_base: Option<u32>,
}

/// Function of one PCA9685 output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmChannel {
    Disabled,
    Pwm,
    Gpio,
}

/// PCA9685 has 16 outputs plus the ALL_LED channel.
pub const PCA9685_MAXCHAN: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pca9685PlatformData {
    pub chan_mapping: [PwmChannel; PCA9685_MAXCHAN],
    pub gpio_base: u32,
}

impl Pca9685PlatformData {
    /// Number of outputs exposed as GPIOs.
    pub fn gpio_count(&self) -> usize {
        self.chan_mapping
            .iter()
            .filter(|c| **c == PwmChannel::Gpio)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Adc1x8s102PlatformData {
    /// Maximum input voltage, in millivolts.
    pub ext_vin: u16,
}

/// One MTD partition of an SPI flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MtdPartition {
    pub name: &'static str,
    pub size: u64,
    pub offset: u64,
}

impl MtdPartition {
    /// First byte past the partition.
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

/// SPI NOR flash and its partition layout. Passed through to the flash
/// driver as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashPlatformData {
    /// Flash part name, e.g. `"s25fl064k"`.
    pub flash_type: &'static str,
    pub parts: &'static [MtdPartition],
}

impl FlashPlatformData {
    pub fn partition(&self, name: &str) -> Option<&'static MtdPartition> {
        self.parts.iter().find(|p| p.name == name)
    }
}

/// PXA2xx SPI controller data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pxa2xxSpiChip {
    /// GPIO driving the chip select.
    pub gpio_cs: u16,
}

/// I2C bus speed of the GIP (GPIO/I2C) controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cMode {
    /// 100 kHz.
    Standard,
    /// 400 kHz.
    Fast,
}

impl I2cMode {
    pub fn frequency_hz(self) -> u32 {
        match self {
            I2cMode::Standard => 100_000,
            I2cMode::Fast => 400_000,
        }
    }
}

/// Board specific settings of the GIP controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GipPlatformData {
    pub i2c_mode: I2cMode,
}
