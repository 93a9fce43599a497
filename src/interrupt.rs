//! MCU interrupt masking
//!
//! Copying a frame out of the RX FIFO must not race with an interrupt
//! handler that touches the radio. The HAL supplies the masking through
//! [`InterruptControl`].

/// Suspends and resumes interrupt handling around the RX FIFO copy.
pub trait InterruptControl {
    /// Mask interrupts
    fn disable(&mut self);
    /// Unmask interrupts
    fn enable(&mut self);
}

/// For applications that do not service the radio from an interrupt handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterruptControl;

impl InterruptControl for NoInterruptControl {
    fn disable(&mut self) {}

    fn enable(&mut self) {}
}

impl<T: InterruptControl + ?Sized> InterruptControl for &mut T {
    fn disable(&mut self) {
        T::disable(self)
    }

    fn enable(&mut self) {
        T::enable(self)
    }
}
