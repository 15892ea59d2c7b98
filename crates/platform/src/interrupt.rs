//! Interrupt line carrying the DMA completion signal.

use core::ffi::c_void;

/// Handler signature accepted by the interrupt controller.
///
/// The context pointer is passed back verbatim on every invocation.
pub type IsrHandler = unsafe extern "C" fn(*mut c_void);

/// One maskable interrupt source.
pub trait InterruptLine {
    /// Register `handler` for the source, replacing any previous one.
    ///
    /// # Safety
    ///
    /// `context` must stay valid for as long as the handler can run, i.e.
    /// until [`InterruptLine::detach_isr`] returns.
    unsafe fn attach_isr(&mut self, handler: IsrHandler, context: *mut c_void);

    /// Remove the handler. The source must already be masked.
    fn detach_isr(&mut self);

    /// Unmask the source.
    fn enable_isr(&mut self);

    /// Mask the source.
    fn disable_isr(&mut self);
}
