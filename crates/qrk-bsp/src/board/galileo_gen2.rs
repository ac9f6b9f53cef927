use qrk_bringup::{
    BoardConfig, BringUpOptions, I2cDevice, LineFlags, ReservedLine,
    SpiBoardInfo, SpiMode, SpiTables,
};

use crate::platform_data::{
    Adc1x8s102PlatformData, FlashPlatformData, GipPlatformData, I2cMode,
    MtdPartition, Pca953xPlatformData, Pca9685PlatformData, PwmChannel,
    Pxa2xxSpiChip, QrkPlatformData,
};

/// GPIO the third PCAL9555A expander signals interrupts on.
pub const GPIO_PCAL9555A_EXP2_INT: u16 = 9;

/// I2C adapter the board's devices hang off.
pub const I2C_ADAPTER: u8 = 0;

pub const EEPROM_ADDR: u16 = 0x54;
pub const PCAL9555A_EXP0_ADDR: u16 = 0x25;
pub const PCAL9555A_EXP1_ADDR: u16 = 0x26;
pub const PCAL9555A_EXP2_ADDR: u16 = 0x27;
pub const PCA9685_ADDR: u16 = 0x47;

/// First GPIO number behind the expanders.
pub const PCAL9555A_GPIO_BASE_OFFSET: u32 = 16;

/// SPI bus number of the legacy bridge SPI controller.
pub const LPC_SCH_SPI_BUS_ID: u16 = 0x03;

/// Maximum ADC input voltage, in millivolts.
pub const ADC1X8S102_MAX_EXT_VIN: u16 = 5000;

// ---------------------------------------------------------------------------
// I2C
// ---------------------------------------------------------------------------

static PCAL9555A_EXP0: QrkPlatformData =
    QrkPlatformData::Pca953x(Pca953xPlatformData {
        gpio_base: PCAL9555A_GPIO_BASE_OFFSET,
        irq_base: None,
    });

static PCAL9555A_EXP1: QrkPlatformData =
    QrkPlatformData::Pca953x(Pca953xPlatformData {
        gpio_base: PCAL9555A_GPIO_BASE_OFFSET + 16,
        irq_base: None,
    });

static PCAL9555A_EXP2: QrkPlatformData =
    QrkPlatformData::Pca953x(Pca953xPlatformData {
        gpio_base: PCAL9555A_GPIO_BASE_OFFSET + 32,
        irq_base: Some(0),
    });

static PCA9685: QrkPlatformData = QrkPlatformData::Pca9685(Pca9685PlatformData {
    chan_mapping: [
        PwmChannel::Gpio,
        PwmChannel::Pwm,
        PwmChannel::Gpio,
        PwmChannel::Pwm,
        PwmChannel::Gpio,
        PwmChannel::Pwm,
        PwmChannel::Gpio,
        PwmChannel::Pwm,
        PwmChannel::Gpio,
        PwmChannel::Pwm,
        PwmChannel::Gpio,
        PwmChannel::Pwm,
        PwmChannel::Gpio,
        PwmChannel::Gpio,
        PwmChannel::Gpio,
        PwmChannel::Gpio,
        // ALL_LED
        PwmChannel::Disabled,
    ],
    gpio_base: PCAL9555A_GPIO_BASE_OFFSET + 48,
});

/// The expander interrupt line has to be held before the expander is
/// registered, its IRQ is derived from it.
static RESERVED_GPIOS: [ReservedLine; 1] = [ReservedLine::new(
    GPIO_PCAL9555A_EXP2_INT,
    LineFlags::IN,
    "pcal9555a-exp2-int",
)];

static I2C_DEVICES: [I2cDevice<QrkPlatformData>; 5] = [
    I2cDevice {
        dev_type: "24c08",
        addresses: &[EEPROM_ADDR],
        irq_line: None,
        platform_data: None,
    },
    I2cDevice {
        dev_type: "pcal9555a",
        addresses: &[PCAL9555A_EXP0_ADDR],
        irq_line: None,
        platform_data: Some(&PCAL9555A_EXP0),
    },
    I2cDevice {
        dev_type: "pcal9555a",
        addresses: &[PCAL9555A_EXP1_ADDR],
        irq_line: None,
        platform_data: Some(&PCAL9555A_EXP1),
    },
    I2cDevice {
        dev_type: "pcal9555a",
        addresses: &[PCAL9555A_EXP2_ADDR],
        irq_line: Some(GPIO_PCAL9555A_EXP2_INT),
        platform_data: Some(&PCAL9555A_EXP2),
    },
    I2cDevice {
        dev_type: "pca9685",
        addresses: &[PCA9685_ADDR],
        irq_line: None,
        platform_data: Some(&PCA9685),
    },
];

// ---------------------------------------------------------------------------
// SPI
// ---------------------------------------------------------------------------

// TODO: read the partition layout from layout.conf in flash.
const ILB_PARTITIONS: [MtdPartition; 5] = [
    MtdPartition { name: "grub", size: 4096, offset: 0 },
    MtdPartition { name: "grub.conf", size: 0xA00, offset: 0x50500 },
    MtdPartition { name: "layout.conf", size: 4096, offset: 0x708000 },
    MtdPartition { name: "sketch", size: 0x40000, offset: 0x750000 },
    MtdPartition { name: "raw", size: 8192000, offset: 0 },
];

const ILB_FLASH_LAYOUT: FlashPlatformData = FlashPlatformData {
    flash_type: "s25fl064k",
    parts: &ILB_PARTITIONS,
};

static ILB_FLASH: QrkPlatformData = QrkPlatformData::Flash(ILB_FLASH_LAYOUT);

static ADC1X8S102: QrkPlatformData =
    QrkPlatformData::Adc1x8s102(Adc1x8s102PlatformData {
        ext_vin: ADC1X8S102_MAX_EXT_VIN,
    });

static SPI_0_CS_0: QrkPlatformData =
    QrkPlatformData::SpiChip(Pxa2xxSpiChip { gpio_cs: 8 });

static SPI_1_CS_0: QrkPlatformData =
    QrkPlatformData::SpiChip(Pxa2xxSpiChip { gpio_cs: 10 });

static SPI_ONBOARD: [SpiBoardInfo<QrkPlatformData>; 2] = [
    SpiBoardInfo {
        modalias: "m25p80",
        max_speed_hz: 0,
        bus_num: LPC_SCH_SPI_BUS_ID,
        chip_select: 0,
        mode: SpiMode::Mode0,
        platform_data: Some(&ILB_FLASH),
        controller_data: None,
    },
    SpiBoardInfo {
        modalias: "adc1x8s102",
        max_speed_hz: 16_667_000,
        bus_num: 0,
        chip_select: 0,
        mode: SpiMode::Mode3,
        platform_data: Some(&ADC1X8S102),
        controller_data: Some(&SPI_0_CS_0),
    },
];

static SPI_EXPANSION: [SpiBoardInfo<QrkPlatformData>; 1] = [SpiBoardInfo {
    modalias: "spidev",
    max_speed_hz: 50_000_000,
    bus_num: 1,
    chip_select: 0,
    mode: SpiMode::Mode0,
    platform_data: None,
    controller_data: None,
}];

static SPI_EXPANSION_GPIO_CS: [SpiBoardInfo<QrkPlatformData>; 1] =
    [SpiBoardInfo {
        modalias: "spidev",
        max_speed_hz: 50_000_000,
        bus_num: 1,
        chip_select: 0,
        mode: SpiMode::Mode0,
        platform_data: None,
        controller_data: Some(&SPI_1_CS_0),
    }];

/// Intel Galileo Gen2.
pub struct GalileoGen2;

impl GalileoGen2 {
    /// Board name as reported by DMI.
    pub const NAME: &'static str = "GalileoGen2";

    /// The I2C master runs in fast mode on this board.
    pub const fn gip_pdata() -> GipPlatformData {
        GipPlatformData { i2c_mode: I2cMode::Fast }
    }

    /// Bring-up configuration for the board.
    pub fn config(options: BringUpOptions) -> BoardConfig<QrkPlatformData> {
        BoardConfig {
            i2c_adapter: I2C_ADAPTER,
            reserved_lines: &RESERVED_GPIOS,
            i2c_devices: &I2C_DEVICES,
            spi: SpiTables {
                onboard: &SPI_ONBOARD,
                expansion: &SPI_EXPANSION,
                expansion_gpio_cs: &SPI_EXPANSION_GPIO_CS,
            },
            options,
        }
    }

    /// Partition layout of the firmware SPI flash.
    pub fn flash_layout() -> &'static FlashPlatformData {
        &ILB_FLASH_LAYOUT
    }
}
