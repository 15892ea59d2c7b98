//! Hardware abstraction layer for link-list DMA audio output.
//!
//! This crate describes the hardware the streaming core talks to as a small
//! set of traits, so the core can run against the ESP8266 register backend
//! on the target and against [`mocks::MockBoard`] on the host.
//!
//! # Architecture Layers
//!
//! ```text
//! Board crate (firmware: ESP8266 registers + ROM routines)
//!         ↓
//! Streaming core (i2s-stream: pool, ring, interrupt handler, lifecycle)
//!         ↓
//! Platform HAL (this crate - trait abstractions + descriptor layout)
//! ```
//!
//! # Seams
//!
//! - [`LinkDma`] - descriptor-driven DMA engine
//! - [`SerialAudio`] - I2S transmitter
//! - [`InterruptLine`] - one maskable interrupt source with a context pointer
//! - [`PinMux`] - pin function routing
//! - [`PeripheralClock`] - clock gate for the audio block
//! - [`BufferAllocator`] - backing memory for sample buffers
//!
//! [`I2sPlatform`] bundles all of them; it is blanket-implemented.
//!
//! # Features
//!
//! - `std`: host mocks in [`mocks`]
//! - `defmt`: derive `defmt::Format` on public types

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

extern crate alloc;

pub mod audio;
pub mod audio_types;
pub mod clock_config;
pub mod dma;
pub mod gpio;
pub mod interrupt;
pub mod memory;

pub mod mocks;

pub use audio::SerialAudio;
pub use audio_types::{Frame, OutOfRangeError, SampleRateHz};
pub use clock_config::{ClockDividers, PeripheralClock};
pub use dma::{DmaInterrupts, LinkDescriptor, LinkDma, Owner};
pub use gpio::{PinFunction, PinMux, PinRoute};
pub use interrupt::{InterruptLine, IsrHandler};
pub use memory::{BufferAllocator, GlobalHeap};

/// Everything a board must provide to run an audio stream.
///
/// Implemented automatically for any type implementing each seam.
pub trait I2sPlatform:
    LinkDma + SerialAudio + InterruptLine + PinMux + PeripheralClock + BufferAllocator
{
}

impl<T> I2sPlatform for T where
    T: LinkDma + SerialAudio + InterruptLine + PinMux + PeripheralClock + BufferAllocator
{
}
