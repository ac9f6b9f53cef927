use core::marker::PhantomData;

use crate::descriptor::I2cBoardInfo;
use crate::host::{BoardHost, Identify};

/// RAII handle on an I2C adapter.
///
/// Holds the host exclusively for as long as the adapter reference is live.
/// Dropping the handle returns the adapter with
/// [`BoardHost::put_adapter`], so every exit path releases it exactly once.
pub struct AdapterHandle<'a, P: 'static, H: BoardHost<P>> {
    host: &'a mut H,
    adapter: Option<H::Adapter>,
    _phantom: PhantomData<P>,
}

impl<'a, P: 'static, H: BoardHost<P>> AdapterHandle<'a, P, H> {
    /// Take a reference on adapter `nr`, or `None` if it does not exist yet.
    pub fn acquire(host: &'a mut H, nr: u8) -> Option<Self> {
        let adapter = host.get_adapter(nr)?;
        Some(Self { host, adapter: Some(adapter), _phantom: PhantomData })
    }

    /// The host the adapter was taken from.
    #[inline]
    pub fn host(&mut self) -> &mut H {
        &mut *self.host
    }

    /// Probe `info` on this adapter at the candidate `addresses`.
    pub fn probe(
        &mut self,
        info: I2cBoardInfo<P>,
        addresses: &[u16],
        identify: Identify<H::Adapter>,
    ) -> Option<H::Client> {
        let adapter = self.adapter.as_ref()?;
        self.host.new_probed_device(adapter, info, addresses, identify)
    }

    /// Return the adapter now.
    pub fn release(self) {}
}

impl<P: 'static, H: BoardHost<P>> Drop for AdapterHandle<'_, P, H> {
    fn drop(&mut self) {
        if let Some(adapter) = self.adapter.take() {
            self.host.put_adapter(adapter);
        }
    }
}
