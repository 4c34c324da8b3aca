//! Recorder: makes a forward-only cursor rewindable by remembering every
//! position it has visited.

use crate::map::Cursor;

#[derive(Clone)]
pub struct Recorder<C> {
    recording: Vec<C>,
    index: usize,
}

impl<C: Cursor> Recorder<C> {
    pub fn new(start: C) -> Self {
        Self {
            recording: vec![start],
            index: 0,
        }
    }

    /// The cursor at the current point of the recording.
    pub fn position(&self) -> &C {
        &self.recording[self.index]
    }

    /// Step forward, replaying a recorded position if there is one and
    /// extending the recording otherwise. At the end this is a no-op; the
    /// end position is recorded once.
    pub fn advance(&mut self) {
        if self.index + 1 < self.recording.len() {
            self.index += 1;
            return;
        }
        let last = &self.recording[self.index];
        if last.is_end() {
            return;
        }
        let mut next = last.clone();
        next.advance();
        self.recording.push(next);
        self.index += 1;
    }

    /// Step back one recorded position. Returns `false` at the start.
    pub fn retreat(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Go back to the first recorded position.
    pub fn rewind(&mut self) {
        self.index = 0;
    }

    /// Number of distinct positions visited so far.
    pub fn recorded(&self) -> usize {
        self.recording.len()
    }
}

impl<C: Cursor> PartialEq for Recorder<C> {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
    }
}

impl<C: Cursor> Cursor for Recorder<C> {
    type Key = C::Key;
    type Value = C::Value;

    fn entry(&self) -> Option<(&C::Key, &C::Value)> {
        self.position().entry()
    }

    fn advance(&mut self) {
        Recorder::advance(self)
    }

    fn is_end(&self) -> bool {
        self.position().is_end()
    }
}
