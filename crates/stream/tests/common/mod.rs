//! Shared helpers for stream integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use i2s_stream::{Frame, I2sStream};
use platform::mocks::MockBoard;

/// Render source used by every test: a boxed closure.
pub type BoxedRender = Box<dyn FnMut(&mut [Frame]) + Send>;

/// Stream over the mock board.
pub type TestStream = I2sStream<MockBoard, BoxedRender>;

/// Rate every test starts with unless it checks rate handling.
pub const RATE_HZ: u32 = 44_100;

/// Streams must be 'static; tests leak one each.
pub fn leak(board: MockBoard) -> &'static TestStream {
    Box::leak(Box::new(I2sStream::new(board)))
}

/// Render that counts calls and stamps each buffer with its call index.
pub fn counting_render(calls: &Arc<AtomicUsize>) -> BoxedRender {
    let calls = Arc::clone(calls);
    Box::new(move |frames: &mut [Frame]| {
        let call = calls.fetch_add(1, Ordering::SeqCst);
        frames.fill([i16::try_from(call).unwrap_or(i16::MAX), 0]);
    })
}

/// Let the mock engine finish one buffer and deliver its interrupt.
/// Returns whether an interrupt was delivered.
pub fn complete_one(stream: &'static TestStream) -> bool {
    match stream.with_hardware(MockBoard::raise_completion).unwrap() {
        Some(isr) => {
            // SAFETY: the context is `stream`, which is 'static, and no
            // borrow of it is held here.
            unsafe { isr.dispatch() };
            true
        }
        None => false,
    }
}

/// Started stream plus its render call counter.
pub fn running() -> (&'static TestStream, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let stream = leak(MockBoard::new());
    stream
        .start(counting_render(&calls), RATE_HZ)
        .unwrap_or_else(|err| panic!("start failed: {err}"));
    (stream, calls)
}

/// Render calls so far.
pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
