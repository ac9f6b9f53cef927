/// SPI table a registration failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiTable {
    /// Devices soldered to the board.
    Onboard,
    /// Expansion header devices with the controller's native chip select.
    Expansion,
    /// Expansion header devices with a GPIO driven chip select.
    ExpansionGpioCs,
}

impl core::fmt::Display for SpiTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SpiTable::Onboard => write!(f, "onboard"),
            SpiTable::Expansion => write!(f, "expansion"),
            SpiTable::ExpansionGpioCs => write!(f, "expansion (gpio cs)"),
        }
    }
}

/// Fatal bring-up failures, tagged with the step that failed.
///
/// `E` is the host's error type. Devices registered before the failure stay
/// registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpError<E> {
    /// The reserved line set could not be requested.
    ReservationFailed(E),
    /// No candidate address yielded a registered device.
    ProbeFailed {
        /// Zero-based position in the I2C device table.
        index: usize,
        device: &'static str,
    },
    /// The host rejected an SPI board info table.
    RegistrationFailed { table: SpiTable, error: E },
}

impl<E: core::fmt::Debug> core::fmt::Display for BringUpError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BringUpError::ReservationFailed(err) => {
                write!(f, "failed to request reserved gpios: {:?}", err)
            }
            BringUpError::ProbeFailed { index, device } => {
                write!(f, "failed to probe {} I2C device (#{})", device, index)
            }
            BringUpError::RegistrationFailed { table, error } => {
                write!(
                    f,
                    "failed to register {} SPI devices: {:?}",
                    table, error
                )
            }
        }
    }
}

/// Terminal status of one [`run_bringup`](crate::run_bringup) attempt.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpResult<E> {
    /// Every step completed.
    Success,
    /// The primary adapter does not exist yet. Nothing was touched; the host
    /// should invoke the bring-up again later.
    NotReady,
    Failed(BringUpError<E>),
}

impl<E> BringUpResult<E> {
    pub fn is_success(&self) -> bool {
        matches!(self, BringUpResult::Success)
    }

    /// Whether the host should schedule another attempt.
    pub fn is_deferred(&self) -> bool {
        matches!(self, BringUpResult::NotReady)
    }

    pub fn error(&self) -> Option<&BringUpError<E>> {
        match self {
            BringUpResult::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<E> From<Result<(), BringUpError<E>>> for BringUpResult<E> {
    fn from(result: Result<(), BringUpError<E>>) -> Self {
        match result {
            Ok(()) => BringUpResult::Success,
            Err(err) => BringUpResult::Failed(err),
        }
    }
}
