use crate::descriptor::{I2cBoardInfo, ReservedLine, SpiBoardInfo};

/// Decides whether a device answers at `addr` on the given adapter.
pub type Identify<A> = fn(&A, u16) -> bool;

/// Identity predicate for hardware that is known to be present.
///
/// Fixed board devices are not discovered; the probe only exists to obtain
/// a registered client, so every candidate address is accepted.
pub fn always_present<A>(_adapter: &A, _addr: u16) -> bool {
    true
}

/// Bus subsystem services the sequencer relies on.
///
/// Implementors front the platform's I2C, GPIO and SPI cores. `P` is the
/// board's platform data type, passed through untouched.
pub trait BoardHost<P: 'static> {
    /// Counted reference to an I2C adapter.
    type Adapter;
    /// Registered I2C client.
    type Client;
    /// Error type for line requests and SPI registration.
    type Error: core::fmt::Debug;

    /// Look up I2C adapter `nr`.
    ///
    /// Returns `None` if the adapter driver has not registered it yet.
    fn get_adapter(&mut self, nr: u8) -> Option<Self::Adapter>;

    /// Drop the reference taken by [`get_adapter`](Self::get_adapter).
    fn put_adapter(&mut self, adapter: Self::Adapter);

    /// Request every line in `lines`.
    ///
    /// All or nothing: on error none of the lines are held.
    fn request_lines(&mut self, lines: &[ReservedLine]) -> Result<(), Self::Error>;

    /// Interrupt number routed from `gpio`, if the GPIO chip provides one.
    fn line_to_irq(&mut self, gpio: u16) -> Option<u32>;

    /// Register `info` at the first address in `addresses` that `identify`
    /// accepts.
    ///
    /// The host stores the accepted address in `info.addr` before
    /// registration. Returns `None` if no address was accepted or the
    /// device could not be registered.
    fn new_probed_device(
        &mut self,
        adapter: &Self::Adapter,
        info: I2cBoardInfo<P>,
        addresses: &[u16],
        identify: Identify<Self::Adapter>,
    ) -> Option<Self::Client>;

    /// Register a table of SPI devices, in order.
    fn register_spi_board_info(
        &mut self,
        table: &'static [SpiBoardInfo<P>],
    ) -> Result<(), Self::Error>;
}
