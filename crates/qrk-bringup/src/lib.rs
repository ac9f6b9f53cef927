#![no_std]
//! Ordered, deferrable bring-up of fixed board peripherals.
//!
//! A board describes its hardware as static tables (reserved GPIO lines,
//! I2C devices, SPI board info) and hands them to [`run_bringup`] together
//! with a [`BoardHost`] that fronts the bus subsystems. The sequencer
//! acquires the primary I2C adapter, reserves the lines, probes the I2C
//! devices in table order, registers the SPI tables and releases the
//! adapter again. If the adapter does not exist yet the attempt is deferred
//! without side effects so the host can retry later.

mod descriptor;
mod error;
mod handle;
mod host;
mod sequencer;

pub use descriptor::{
    DeviceType, I2cBoardInfo, I2cDevice, LineFlags, ReservedLine,
    SpiBoardInfo, SpiMode, I2C_NAME_SIZE,
};
pub use error::{BringUpError, BringUpResult, SpiTable};
pub use handle::AdapterHandle;
pub use host::{always_present, BoardHost, Identify};
pub use sequencer::{run_bringup, BoardConfig, BringUpOptions, SpiTables};
