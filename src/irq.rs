//! Home for state owned by an interrupt handler.

use core::cell::RefCell;
use critical_section::Mutex;

/// A `static`-friendly slot for interrupt-owned state.
///
/// Firmware builds the [`TickHandler`](crate::TickHandler) in `main`, moves it
/// in with [`install`](Self::install) and reaches it from the interrupt with
/// [`with`](Self::with). Access happens inside a critical section, so the
/// main loop can also install, inspect or take the value without racing the
/// handler.
///
/// ```
/// use led_candle::IrqCell;
///
/// static COUNTER: IrqCell<u32> = IrqCell::new();
///
/// assert_eq!(COUNTER.with(|n| *n), None);
/// COUNTER.install(41);
/// assert_eq!(COUNTER.with(|n| { *n += 1; *n }), Some(42));
/// ```
pub struct IrqCell<T> {
    inner: Mutex<RefCell<Option<T>>>,
}

impl<T> IrqCell<T> {
    /// Creates an empty cell.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Stores `value`, returning the previous one.
    pub fn install(&self, value: T) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow(cs).replace(Some(value)))
    }

    /// Runs `f` on the stored value. Returns `None` while the cell is empty.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().as_mut().map(f))
    }

    /// Removes and returns the stored value.
    pub fn take(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().take())
    }
}

impl<T> Default for IrqCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_skips_closure() {
        let cell: IrqCell<u8> = IrqCell::new();
        assert_eq!(cell.with(|_| unreachable!()), None::<()>);
    }

    #[test]
    fn install_replaces_and_take_empties() {
        let cell = IrqCell::new();
        assert_eq!(cell.install(1u8), None);
        assert_eq!(cell.install(2u8), Some(1));
        assert_eq!(cell.take(), Some(2));
        assert_eq!(cell.take(), None);
    }
}
