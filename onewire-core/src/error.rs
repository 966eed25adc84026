#[allow(unused_imports)]
use crate::OneWireSearch;

/// 1-Wire communication error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// Encapsulates the error type of the underlying bus master hardware.
    Other(E),
    /// No device answered the presence-detect cycle on a bus where one was required.
    NoDevicePresent,
    /// A short circuit was detected on the bus during the presence-detect cycle.
    ShortCircuit,
    /// A [search](OneWireSearch) triplet read back both the id bit and its complement
    /// as 1, meaning no device participated in that time slot. Expected when a device
    /// is unplugged mid-search; the pass must be retried from a bus reset.
    SearchConflict,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}
