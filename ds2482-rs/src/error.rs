/// DS2482 hardware errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ds2482Error<E> {
    /// I2C bus errors, including an addressed transaction not being acknowledged.
    I2c(E),
    /// The bridge never reported completion of a device reset within the retry budget.
    RetriesExceeded,
}

impl<E> From<E> for Ds2482Error<E> {
    fn from(value: E) -> Self {
        Self::I2c(value)
    }
}
