// GestureWatch - Gesture Recorder
//
// Edge-triggered capture state machine, polled once per tick:
//
//   Idle --(falling edge: released -> pressed)--> Recording   (buffer cleared)
//   Recording --(tick while held)--> Recording                (append one sample)
//   Recording --(rising edge: pressed -> released)--> Idle    (capture finished)
//
// The buffer holds the *first* `capacity` samples of a press. Once full,
// later samples are dropped; nothing is overwritten or wrapped.
//
// A streaming recorder (data collection) keeps only the newest sample and
// counts every one it took, with no cap.

use crate::events::RecorderEvent;
use crate::sensor::{Sample, SampleSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

pub struct GestureRecorder<const A: usize> {
    state: RecorderState,
    prev_pressed: bool,
    samples: Vec<Sample<A>>,
    capacity: usize,
    streaming: bool,
    taken: usize,
}

impl<const A: usize> GestureRecorder<A> {
    /// The trigger is assumed released at construction; a button already
    /// held on the first poll counts as a press.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: RecorderState::Idle,
            prev_pressed: false,
            samples: Vec::with_capacity(capacity),
            capacity,
            streaming: false,
            taken: 0,
        }
    }

    /// Recorder for streaming every held tick out as it is taken. `samples()`
    /// only ever holds the latest one.
    pub fn streaming() -> Self {
        Self {
            streaming: true,
            ..Self::new(1)
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples taken during the current (or last finished) press.
    pub fn count(&self) -> usize {
        self.taken
    }

    /// Samples of the current (or last finished) capture, oldest first.
    pub fn samples(&self) -> &[Sample<A>] {
        &self.samples
    }

    /// Advance one tick with the current trigger level.
    ///
    /// The edge tick itself only changes state; sampling starts on the next
    /// tick the trigger is still held.
    pub fn poll<S: SampleSource<A>>(&mut self, pressed: bool, source: &mut S) -> RecorderEvent {
        let was_pressed = std::mem::replace(&mut self.prev_pressed, pressed);

        match (was_pressed, pressed) {
            (false, true) => {
                self.state = RecorderState::Recording;
                self.samples.clear();
                self.taken = 0;
                RecorderEvent::Started
            }
            (true, false) if self.state == RecorderState::Recording => {
                self.state = RecorderState::Idle;
                RecorderEvent::Finished { count: self.taken }
            }
            (true, true) if self.state == RecorderState::Recording => self.sample(source),
            _ => RecorderEvent::None,
        }
    }

    fn sample<S: SampleSource<A>>(&mut self, source: &mut S) -> RecorderEvent {
        if !self.streaming && self.samples.len() >= self.capacity {
            return RecorderEvent::Full;
        }

        match source.read() {
            Ok(sample) => {
                if self.streaming {
                    self.samples.clear();
                }
                self.samples.push(sample);
                self.taken += 1;
                if !self.streaming && self.samples.len() == self.capacity {
                    log::warn!("capture buffer full ({} samples), ignoring the rest of this press", self.capacity);
                }
                RecorderEvent::Sampled { count: self.taken }
            }
            Err(e) => {
                log::debug!("sample skipped: {}", e);
                RecorderEvent::SampleSkipped
            }
        }
    }
}
