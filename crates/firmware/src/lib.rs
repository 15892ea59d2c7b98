//! ESP8266 board support for `i2s-stream`.
//!
//! Implements every platform seam on the ESP8266: the SLC link-list DMA
//! engine, the I2S transmitter, the SLC interrupt through the ROM interrupt
//! dispatcher, the IO mux, and the audio PLL clock gate.
//!
//! # Architecture
//!
//! ```text
//! Application (owns a static I2sStream<Esp8266, _>)
//!         ↓
//! i2s-stream (pool, ring, completion interrupt, lifecycle)
//!         ↓
//! board (this crate: Esp8266 implements the platform traits)
//!         ↓
//! registers + mask ROM routines
//! ```
//!
//! # Features
//!
//! - `hardware` - Build the [`board`] for xtensa-lx106 (ROM calls,
//!   PS-based critical-section implementation, defmt; needs the `esp`
//!   nightly toolchain)
//! - `defmt` - defmt logging without the board
//!
//! Without `hardware` only the register encoders and the tone generator are
//! built, which keeps them testable on the host.
//!
//! # Example
//!
//! ```ignore
//! use firmware::board::Esp8266;
//! use firmware::tone::SineTone;
//! use i2s_stream::I2sStream;
//!
//! static STREAM: I2sStream<Esp8266, SineTone> = I2sStream::new(Esp8266::new());
//!
//! fn play() -> Result<(), i2s_stream::StreamError> {
//!     STREAM.start(SineTone::new(440, 44_100), 44_100)
//! }
//! ```

#![cfg_attr(not(test), no_std)]
// PS save/restore for the critical section needs xtensa inline asm.
#![cfg_attr(feature = "hardware", feature(asm_experimental_arch))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for register-level code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)] // register names in doc comments

pub mod registers;
pub mod tone;

#[cfg(feature = "hardware")]
pub mod board;
#[cfg(feature = "hardware")]
mod rom;
