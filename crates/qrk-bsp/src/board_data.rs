//! Board identification.
//!
//! Firmware newer than 0.9.0 reports the board through DMI. Older firmware
//! has no DMI tables; the board is then assumed to be a Galileo and the
//! firmware version is read from the Manifest Flash Header (MFH) in the SPI
//! flash.

use byteorder::{ByteOrder, LittleEndian};

/// Offset of the MFH from the start of the SPI flash window.
pub const MFH_OFFSET: usize = 0x0000_8000;
/// `"_MFH"` read as a little-endian word.
pub const MFH_MAGIC: u32 = 0x5F4D_4648;
/// Size of the MFH block, including its padding.
pub const MFH_SIZE: usize = 24 + MFH_PADDING;
const MFH_PADDING: usize = 0x1E8;
const MFH_ITEM_SIZE: usize = 16;

/// Known Quark boards, by DMI board name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardKind {
    QuarkEmulation,
    ClantonPeakSvp,
    KipsBay,
    CrossHill,
    ClantonHill,
    Galileo,
    GalileoGen2,
}

impl BoardKind {
    pub const ALL: [BoardKind; 7] = [
        BoardKind::QuarkEmulation,
        BoardKind::ClantonPeakSvp,
        BoardKind::KipsBay,
        BoardKind::CrossHill,
        BoardKind::ClantonHill,
        BoardKind::Galileo,
        BoardKind::GalileoGen2,
    ];

    /// Board assumed when the firmware carries no DMI data.
    pub const DEFAULT: BoardKind = BoardKind::Galileo;

    pub fn name(self) -> &'static str {
        match self {
            BoardKind::QuarkEmulation => "QuarkEmulation",
            BoardKind::ClantonPeakSvp => "ClantonPeakSVP",
            BoardKind::KipsBay => "KipsBay",
            BoardKind::CrossHill => "CrossHill",
            BoardKind::ClantonHill => "ClantonHill",
            BoardKind::Galileo => "Galileo",
            BoardKind::GalileoGen2 => "GalileoGen2",
        }
    }

    pub fn from_dmi_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// MFH item types this code understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MfhItemType {
    FwStage1 = 0x00,
    FwStage2 = 0x03,
    FwParams = 0x07,
    Bootloader = 0x0B,
    Kernel = 0x10,
    Ramdisk = 0x12,
    BuildInfo = 0x18,
    Version = 0x19,
}

/// One entry of the MFH item table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MfhItem {
    pub item_type: u32,
    pub addr: u32,
    pub len: u32,
    pub res0: u32,
}

impl MfhItem {
    fn parse(buf: &[u8]) -> Self {
        Self {
            item_type: LittleEndian::read_u32(&buf[0..4]),
            addr: LittleEndian::read_u32(&buf[4..8]),
            len: LittleEndian::read_u32(&buf[8..12]),
            res0: LittleEndian::read_u32(&buf[12..16]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardDataError {
    /// The flash holds no MFH; carries the word found instead of the magic.
    BadMagic(u32),
    /// The MFH or its item table runs past the end of the flash window.
    Truncated,
}

impl core::fmt::Display for BoardDataError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardDataError::BadMagic(found) => write!(
                f,
                "bad MFH magic: want {:#010x} found {:#010x}",
                MFH_MAGIC, found
            ),
            BoardDataError::Truncated => write!(f, "MFH truncated"),
        }
    }
}

/// Manifest Flash Header.
#[derive(Debug, Clone, Copy)]
pub struct Mfh<'a> {
    pub version: u32,
    pub flags: u32,
    pub next_block: u32,
    items: &'a [u8],
}

impl<'a> Mfh<'a> {
    /// Parse the MFH out of the SPI flash window `flash`.
    pub fn parse(flash: &'a [u8]) -> Result<Self, BoardDataError> {
        let header = flash
            .get(MFH_OFFSET..MFH_OFFSET + 24)
            .ok_or(BoardDataError::Truncated)?;

        let id = LittleEndian::read_u32(&header[0..4]);
        if id != MFH_MAGIC {
            return Err(BoardDataError::BadMagic(id));
        }

        let item_count = LittleEndian::read_u32(&header[16..20]) as usize;
        let boot_priority_list = LittleEndian::read_u32(&header[20..24]) as usize;

        // Items follow the boot priority list inside the padding area.
        let start = boot_priority_list
            .checked_mul(4)
            .and_then(|skip| skip.checked_add(MFH_OFFSET + 24))
            .ok_or(BoardDataError::Truncated)?;
        let len = item_count
            .checked_mul(MFH_ITEM_SIZE)
            .ok_or(BoardDataError::Truncated)?;
        let items = start
            .checked_add(len)
            .and_then(|end| flash.get(start..end))
            .ok_or(BoardDataError::Truncated)?;

        Ok(Self {
            version: LittleEndian::read_u32(&header[4..8]),
            flags: LittleEndian::read_u32(&header[8..12]),
            next_block: LittleEndian::read_u32(&header[12..16]),
            items,
        })
    }

    pub fn item_count(&self) -> usize {
        self.items.len() / MFH_ITEM_SIZE
    }

    pub fn items(&self) -> impl Iterator<Item = MfhItem> + 'a {
        self.items.chunks_exact(MFH_ITEM_SIZE).map(MfhItem::parse)
    }

    /// Firmware version recorded in the `VERSION` item, if any.
    pub fn firmware_version(&self) -> Option<u32> {
        self.items()
            .find(|item| item.item_type == MfhItemType::Version as u32)
            .map(|item| item.res0)
    }
}

/// Parse a DMI BIOS version string as hexadecimal.
///
/// An optional `0x` prefix is skipped and parsing stops at the first
/// non-hex character, so `"0x01000300 release"` yields `0x01000300`.
/// Leading whitespace or a sign is not accepted and yields zero. Overlong
/// values keep their low 32 bits.
pub fn parse_firmware_version(s: &str) -> u32 {
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    s.chars()
        .map_while(|c| c.to_digit(16))
        .fold(0u32, |acc, d| acc.wrapping_mul(16).wrapping_add(d))
}

/// The board the kernel is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardIdentity {
    pub kind: BoardKind,
    /// Zero if the firmware does not record a version.
    pub flash_version: u32,
}

/// Identify the board.
///
/// `board_name` and `bios_version` are the DMI strings, if the firmware
/// provides them. When either is missing or the name is unknown the MFH in
/// `flash` is consulted and [`BoardKind::DEFAULT`] is assumed.
pub fn identify(
    board_name: Option<&str>,
    bios_version: Option<&str>,
    flash: &[u8],
) -> Result<BoardIdentity, BoardDataError> {
    if let (Some(name), Some(version)) = (board_name, bios_version) {
        if let Some(kind) = BoardKind::from_dmi_name(name) {
            let flash_version = parse_firmware_version(version);
            #[cfg(feature = "defmt")]
            defmt::info!(
                "Intel Quark board {} firmware version {=u32:#x}",
                kind.name(),
                flash_version
            );
            return Ok(BoardIdentity { kind, flash_version });
        }
    }

    let mfh = Mfh::parse(flash)?;
    #[cfg(feature = "defmt")]
    defmt::info!(
        "MFH: booting on an old BIOS assuming {} board, ver {=u32:#x} entries {}",
        BoardKind::DEFAULT.name(),
        mfh.version,
        mfh.item_count()
    );

    Ok(BoardIdentity {
        kind: BoardKind::DEFAULT,
        flash_version: mfh.firmware_version().unwrap_or(0),
    })
}
