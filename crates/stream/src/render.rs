//! Sample source contract.

use platform::Frame;

/// Fills sample buffers on demand.
///
/// Called once per buffer while a stream starts, then once per finished
/// buffer from the completion interrupt. Implementations run in interrupt
/// context: they must return well within one buffer period, must not block
/// and must not start or stop the stream that calls them.
///
/// Any `FnMut(&mut [Frame])` closure is a `Render`; its captured state plays
/// the role of the user context.
pub trait Render {
    /// Overwrite every frame of `frames`.
    fn render(&mut self, frames: &mut [Frame]);
}

impl<F> Render for F
where
    F: FnMut(&mut [Frame]),
{
    fn render(&mut self, frames: &mut [Frame]) {
        self(frames);
    }
}

/// Writes zeros.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silence;

impl Render for Silence {
    fn render(&mut self, frames: &mut [Frame]) {
        frames.fill([0, 0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_keep_their_state_between_calls() {
        let mut next = 0i16;
        let mut ramp = |frames: &mut [Frame]| {
            for frame in frames {
                *frame = [next, next.wrapping_neg()];
                next = next.wrapping_add(1);
            }
        };
        let mut buffer = [[0; 2]; 4];
        ramp.render(&mut buffer);
        ramp.render(&mut buffer);
        assert_eq!(buffer, [[4, -4], [5, -5], [6, -6], [7, -7]]);
    }

    #[test]
    fn silence_clears_previous_content() {
        let mut buffer = [[123, -123]; 8];
        Silence.render(&mut buffer);
        assert!(buffer.iter().all(|f| *f == [0, 0]));
    }
}
