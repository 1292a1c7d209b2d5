use crate::synth::message::NoteEvent;

/// Walks a block's note events in arrival order, handing each one out once the
/// render loop reaches its sample offset.
///
/// Offsets past the end of the block are treated as the last sample. An event
/// whose offset is earlier than the one before it fires together with its
/// predecessor, so arrival order always wins.
pub struct Scheduler<'a> {
    events: &'a [NoteEvent],
    cursor: usize,
    last_index: usize,
}

impl<'a> Scheduler<'a> {
    pub fn new(events: &'a [NoteEvent], block_len: usize) -> Self {
        Self {
            events,
            cursor: 0,
            last_index: block_len.saturating_sub(1),
        }
    }

    /// Next event due at or before `index`, if any.
    #[inline]
    pub fn due(&mut self, index: usize) -> Option<NoteEvent> {
        let event = *self.events.get(self.cursor)?;
        if event.offset.min(self.last_index) <= index {
            self.cursor += 1;
            Some(event)
        } else {
            None
        }
    }

    /// Hand out whatever was not reached, e.g. for an empty block.
    pub fn flush(&mut self) -> Option<NoteEvent> {
        let event = *self.events.get(self.cursor)?;
        self.cursor += 1;
        Some(event)
    }

    #[cfg(test)]
    fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }
}
