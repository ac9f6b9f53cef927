#![no_std]
#![doc = include_str!("../README.md")]

// Modules
mod board;
pub mod board_data;
mod platform_data;

// Flatten
pub use board::*;
pub use platform_data::*;

use qrk_bringup::{run_bringup, BoardHost, BringUpOptions, BringUpResult};

/// Attach the Galileo Gen2 board.
///
/// Builds the board configuration from `options` and runs the bring-up
/// against `host`. A [`BringUpResult::NotReady`] result asks the host to
/// call `attach` again once I2C adapter 0 has been registered.
pub fn attach<H>(host: &mut H, options: BringUpOptions) -> BringUpResult<H::Error>
where
    H: BoardHost<QrkPlatformData>,
{
    let config = GalileoGen2::config(options);
    run_bringup(&config, host)
}
