#[cfg(feature = "rtrb")]
use rtrb::Consumer;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoteKind {
    On,
    Off,
}

/// A gate event, timestamped relative to the start of the block it belongs to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NoteEvent {
    /// Sample index within the block at which the event takes effect.
    pub offset: usize,
    pub note: u8,
    /// 0.0 to 1.0.
    pub velocity: f32,
    pub kind: NoteKind,
}

impl NoteEvent {
    pub fn on(offset: usize, note: u8, velocity: f32) -> Self {
        Self {
            offset,
            note,
            velocity,
            kind: NoteKind::On,
        }
    }

    pub fn off(offset: usize, note: u8) -> Self {
        Self {
            offset,
            note,
            velocity: 0.0,
            kind: NoteKind::Off,
        }
    }
}

/// Lock-free source of note events for the audio thread.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<NoteEvent>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<NoteEvent> {
    fn pop(&mut self) -> Option<NoteEvent> {
        Consumer::pop(self).ok()
    }
}
