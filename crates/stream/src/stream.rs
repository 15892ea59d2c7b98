//! Stream lifecycle and completion interrupt.
//!
//! [`I2sStream`] owns the board and, while running, the session: buffer
//! pool, descriptor ring, underrun guard and render source. All of it sits
//! behind one `critical_section::Mutex`, so the foreground (`start`,
//! `stop`, diagnostics) and the completion interrupt never see it half
//! updated. State and counters live in a second mutex of their own, which
//! the render callback can read while the session is borrowed.
//!
//! Session states:
//!
//! ```text
//!            start() ok
//! Stopped ─────────────► Running
//!    ▲                      │
//!    └──────── stop() ──────┘
//! ```
//!
//! Arming and teardown each run inside a single critical section, so the
//! intermediate phases are never observable.

use core::cell::{Cell, RefCell};
use core::ffi::c_void;

use critical_section::Mutex;
use platform::{ClockDividers, I2sPlatform, LinkDescriptor, SampleRateHz};

use crate::config::BUFFER_COUNT;
use crate::error::StreamError;
use crate::guard::UnderrunGuard;
use crate::pool::BufferPool;
use crate::rate::RateConfigurator;
use crate::render::Render;
use crate::ring::DescriptorRing;

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// No buffers allocated, interrupt detached, pins idle.
    Stopped,
    /// DMA is cycling the ring and the completion interrupt is live.
    Running,
}

/// Counters for the current session, reset by every `start`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamStats {
    /// Completion interrupts that refilled a buffer.
    pub completions: u32,
    /// Guard evictions, i.e. detected underruns.
    pub underruns: u32,
}

/// Read-only view of a running session, for diagnostics and tests.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    /// Sample buffers.
    pub pool: &'a BufferPool,
    /// Descriptor ring wired over `pool`.
    pub ring: &'a DescriptorRing,
    /// Recently refilled slots.
    pub guard: &'a UnderrunGuard,
}

struct Session<R> {
    pool: BufferPool,
    ring: DescriptorRing,
    guard: UnderrunGuard,
    render: R,
}

impl<R: Render> Session<R> {
    fn new(pool: BufferPool, render: R) -> Self {
        Self {
            pool,
            ring: DescriptorRing::new(),
            guard: UnderrunGuard::new(),
            render,
        }
    }

    fn refill(&mut self, slot: usize) {
        if let Some(frames) = self.pool.frames_mut(slot) {
            self.render.render(frames);
        }
    }

    fn view(&self) -> SessionView<'_> {
        SessionView {
            pool: &self.pool,
            ring: &self.ring,
            guard: &self.guard,
        }
    }
}

struct Shared<H, R> {
    hardware: H,
    session: Option<Session<R>>,
}

#[derive(Clone, Copy)]
struct Status {
    state: SessionState,
    stats: StreamStats,
}

/// One I2S output stream fed from a descriptor ring.
///
/// Place it in a `static`: [`I2sStream::start`] hands `&'static self` to the
/// interrupt controller as the handler context.
pub struct I2sStream<H, R> {
    shared: Mutex<RefCell<Shared<H, R>>>,
    status: Mutex<Cell<Status>>,
}

impl<H, R> I2sStream<H, R> {
    /// Stopped stream owning `hardware`.
    pub const fn new(hardware: H) -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                hardware,
                session: None,
            })),
            status: Mutex::new(Cell::new(Status {
                state: SessionState::Stopped,
                stats: StreamStats {
                    completions: 0,
                    underruns: 0,
                },
            })),
        }
    }
}

impl<H, R> I2sStream<H, R>
where
    H: I2sPlatform + Send,
    R: Render + Send,
{
    /// Allocate and pre-fill the buffers, wire the ring and start the DMA
    /// and the transmitter at `rate_hz`.
    ///
    /// `render` fills each buffer once before the hardware starts and then
    /// once per completion interrupt. It may read [`state`](Self::state)
    /// and [`stats`](Self::stats); the session and the board are busy while
    /// it runs, so [`with_session`](Self::with_session) sees `None` and
    /// [`with_hardware`](Self::with_hardware) returns `None`. It must not
    /// start or stop the stream.
    ///
    /// # Errors
    ///
    /// - [`StreamError::AlreadyRunning`] if a session is live, or if called
    ///   from inside the render callback
    /// - [`StreamError::InvalidRate`] if `rate_hz` cannot be produced
    /// - [`StreamError::Allocation`] if the buffers cannot be allocated
    ///
    /// On error no hardware has been touched and the stream stays stopped.
    pub fn start(&'static self, render: R, rate_hz: u32) -> Result<(), StreamError> {
        let context = (self as *const Self).cast_mut().cast::<c_void>();
        critical_section::with(|cs| {
            let status = self.status.borrow(cs);
            if status.get().state == SessionState::Running {
                return Err(StreamError::AlreadyRunning);
            }
            let Ok(mut shared) = self.shared.borrow(cs).try_borrow_mut() else {
                return Err(StreamError::AlreadyRunning);
            };
            let Shared { hardware, session } = &mut *shared;

            let rate = SampleRateHz::new(rate_hz)?;
            let dividers = RateConfigurator::new(hardware.base_clock_hz()).configure(rate)?;
            let pool = BufferPool::allocate(hardware)?;

            let session = session.insert(Session::new(pool, render));
            for slot in 0..BUFFER_COUNT {
                session.refill(slot);
            }
            // Wired only now that the ring sits at its final address.
            session.ring.wire(&session.pool);

            let outbound = session.ring.head();
            let inbound = session.ring.address(1).unwrap_or(outbound);
            // SAFETY: the ring and pool live in `self`, which is 'static, and
            // stay put until `stop` clears the links before dropping them.
            unsafe { arm_dma(hardware, outbound, inbound, context, dispatch::<H, R>) };
            start_serial(hardware, dividers);

            status.set(Status {
                state: SessionState::Running,
                stats: StreamStats::default(),
            });
            info!(
                "i2s stream started: {} Hz requested, {} Hz actual",
                rate_hz,
                dividers.effective_rate(hardware.base_clock_hz())
            );
            Ok(())
        })
    }

    /// Tear the session down. No-op when already stopped, and when called
    /// from inside the render callback.
    pub fn stop(&self) {
        critical_section::with(|cs| {
            let Ok(mut shared) = self.shared.borrow(cs).try_borrow_mut() else {
                warn!("i2s stop requested from inside the render callback");
                return;
            };
            let Shared { hardware, session } = &mut *shared;

            let Some(session) = session.take() else {
                return;
            };

            hardware.disable_isr();
            hardware.disable_interrupts();
            hardware.clear_interrupts();
            hardware.clear_links();
            hardware.detach_isr();
            hardware.stop_transmit();
            hardware.disable_clock();
            hardware.reset_serial();

            // The engine can no longer reach the ring, so the buffers may go.
            let Session { pool, .. } = session;
            pool.release(hardware);

            for route in H::I2S_PINS {
                hardware.set_pin_function(route.pin, route.idle);
            }

            let status = self.status.borrow(cs);
            let stats = status.get().stats;
            status.set(Status {
                state: SessionState::Stopped,
                stats,
            });
            info!(
                "i2s stream stopped after {} buffers, {} underruns",
                stats.completions,
                stats.underruns
            );
        });
    }

    /// Completion interrupt body.
    ///
    /// Refills the buffer the engine just finished and records it with the
    /// underrun guard. Called by the trampoline registered in `start`; safe
    /// to call spuriously.
    pub fn on_interrupt(&self) {
        critical_section::with(|cs| {
            let Ok(mut shared) = self.shared.borrow(cs).try_borrow_mut() else {
                return;
            };
            let Shared { hardware, session } = &mut *shared;

            if !hardware.take_interrupts().outbound_eof {
                return;
            }
            let Some(session) = session.as_mut() else {
                return;
            };

            hardware.disable_isr();
            let finished = hardware.finished_descriptor();
            match session.ring.slot_of(finished) {
                Some(slot) => {
                    session.refill(slot);
                    let status = self.status.borrow(cs);
                    let mut current = status.get();
                    if let Some(evicted) = session.guard.push(slot) {
                        current.stats.underruns = current.stats.underruns.wrapping_add(1);
                        warn!("i2s underrun: slot {} was never consumed", evicted);
                    }
                    current.stats.completions = current.stats.completions.wrapping_add(1);
                    status.set(current);
                }
                None => warn!("i2s completion for descriptor outside the ring"),
            }
            hardware.enable_isr();
        });
    }

    /// Current lifecycle state. Callable from the render callback.
    pub fn state(&self) -> SessionState {
        critical_section::with(|cs| self.status.borrow(cs).get().state)
    }

    /// Counters for the current (or last) session. Callable from the render
    /// callback.
    pub fn stats(&self) -> StreamStats {
        critical_section::with(|cs| self.status.borrow(cs).get().stats)
    }

    /// Run `f` on the board while the stream keeps ownership of it.
    ///
    /// Returns `None` without running `f` while the board is busy, i.e.
    /// when called from inside the render callback.
    pub fn with_hardware<T>(&self, f: impl FnOnce(&mut H) -> T) -> Option<T> {
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow(cs).try_borrow_mut().ok()?;
            Some(f(&mut shared.hardware))
        })
    }

    /// Run `f` on the live session. `f` sees `None` when stopped, and when
    /// called from inside the render callback.
    pub fn with_session<T>(&self, f: impl FnOnce(Option<SessionView<'_>>) -> T) -> T {
        critical_section::with(|cs| {
            let shared = self.shared.borrow(cs).try_borrow().ok();
            f(shared
                .as_deref()
                .and_then(|shared| shared.session.as_ref())
                .map(Session::view))
        })
    }
}

/// Interrupt trampoline registered with the interrupt line.
///
/// # Safety
///
/// `context` must be the `&'static I2sStream<H, R>` passed by `start`.
unsafe extern "C" fn dispatch<H, R>(context: *mut c_void)
where
    H: I2sPlatform + Send,
    R: Render + Send,
{
    // SAFETY: `start` registers a pointer to a 'static stream of this type.
    let stream = unsafe { &*context.cast_const().cast::<I2sStream<H, R>>() };
    stream.on_interrupt();
}

/// Reset the DMA links, point them at the ring and unmask the completion
/// interrupt.
///
/// # Safety
///
/// `outbound`, `inbound` and `context` must stay valid until the links are
/// cleared and the handler detached.
unsafe fn arm_dma<H: I2sPlatform>(
    hardware: &mut H,
    outbound: *const LinkDescriptor,
    inbound: *const LinkDescriptor,
    context: *mut c_void,
    handler: platform::IsrHandler,
) {
    hardware.disable_isr();
    hardware.reset_links();
    hardware.clear_interrupts();
    hardware.configure_outbound();
    // SAFETY: forwarded from the caller.
    unsafe { hardware.set_links(outbound, inbound) };
    // SAFETY: forwarded from the caller.
    unsafe { hardware.attach_isr(handler, context) };
    hardware.enable_eof_interrupt();
    hardware.enable_isr();
    hardware.start_links();
    debug!("i2s dma armed");
}

/// Route the pins, ungate the clock and start the transmitter.
fn start_serial<H: I2sPlatform>(hardware: &mut H, dividers: ClockDividers) {
    for route in H::I2S_PINS {
        hardware.set_pin_function(route.pin, route.active);
    }
    hardware.enable_clock();
    hardware.reset_serial();
    hardware.enable_dma_fifo();
    hardware.set_clock_dividers(dividers);
    hardware.start_transmit();
    debug!(
        "i2s dividers: clock {} bit clock {}",
        dividers.clock(),
        dividers.bit_clock()
    );
}
