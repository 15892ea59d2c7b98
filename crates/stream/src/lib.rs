//! Interrupt-driven I2S audio output over a circular DMA descriptor ring.
//!
//! A fixed set of sample buffers is wired into a ring of link descriptors.
//! The DMA engine streams the ring to the I2S transmitter forever; every
//! time it finishes one buffer the completion interrupt asks a [`Render`]
//! source to refill that buffer in place, before the engine wraps back to
//! it.
//!
//! ```text
//! I2sStream::start ─► RateConfigurator ─► BufferPool ─► DescriptorRing
//!                                                           │
//!            ┌──────────── DMA engine walks the ring ◄──────┘
//!            ▼
//!   on_interrupt ─► Render::render(buffer) ─► UnderrunGuard
//! ```
//!
//! # Example
//!
//! ```ignore
//! use i2s_stream::I2sStream;
//!
//! static STREAM: I2sStream<Board, Tone> = I2sStream::new(Board::new());
//!
//! STREAM.start(Tone::new(440), 44_100)?;
//! // ... audio plays from the completion interrupt ...
//! STREAM.stop();
//! ```
//!
//! # Features
//!
//! - `defmt`: log through defmt (target builds)
//! - `tracing`: log through tracing (host builds)
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod guard;
pub mod pool;
pub mod rate;
pub mod render;
pub mod ring;
pub mod stream;

pub use error::StreamError;
pub use guard::UnderrunGuard;
pub use pool::BufferPool;
pub use rate::RateConfigurator;
pub use render::{Render, Silence};
pub use ring::DescriptorRing;
pub use stream::{I2sStream, SessionState, SessionView, StreamStats};

pub use platform::Frame;
