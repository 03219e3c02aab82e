//! Generic past/present/future container for local synchronous edits.

use std::collections::VecDeque;
use std::mem;

/// Bounded undo/redo history around a single current value.
///
/// Used for state that is edited locally and synchronously (form
/// drafts, filter configuration), where every edit goes through
/// [`UndoRedoStack::set`] or [`UndoRedoStack::update`]. Destructive
/// storage operations are *not* tracked here; those go through the
/// action log, which owns the undo window.
///
/// History is linear: a new edit after an undo discards the redo branch,
/// matching standard editor semantics. `past` never grows beyond
/// `max_history`; the oldest state is dropped first.
#[derive(Debug, Clone)]
pub struct UndoRedoStack<T> {
    /// Older states, oldest first.
    past: Vec<T>,
    /// The current value.
    present: T,
    /// Undone states, nearest first.
    future: VecDeque<T>,
    /// Upper bound on `past`.
    max_history: usize,
}

impl<T> UndoRedoStack<T> {
    /// Create a stack holding an initial value and no history.
    pub fn new(present: T, max_history: usize) -> Self {
        Self {
            past: Vec::new(),
            present,
            future: VecDeque::new(),
            max_history,
        }
    }

    /// The current value.
    pub fn present(&self) -> &T {
        &self.present
    }

    /// Whether an undo would change the present.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether a redo would change the present.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of retained past states.
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of undone states available to redo.
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Replace the present. The previous present joins `past` and the
    /// redo branch is discarded.
    pub fn set(&mut self, next: T) {
        let previous = mem::replace(&mut self.present, next);
        self.push_past(previous);
        self.future.clear();
    }

    /// Replace the present with a value computed from it.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.present);
        self.set(next);
    }

    /// Step back to the most recent past state. Returns whether anything
    /// changed; an empty `past` is a no-op.
    pub fn undo(&mut self) -> bool {
        match self.past.pop() {
            Some(previous) => {
                let undone = mem::replace(&mut self.present, previous);
                self.future.push_front(undone);
                true
            }
            None => false,
        }
    }

    /// Step forward to the nearest undone state. Returns whether
    /// anything changed; an empty `future` is a no-op.
    pub fn redo(&mut self) -> bool {
        match self.future.pop_front() {
            Some(next) => {
                let redone = mem::replace(&mut self.present, next);
                self.push_past(redone);
                true
            }
            None => false,
        }
    }

    /// Drop all history and set a fresh present.
    pub fn reset(&mut self, value: T) {
        self.past.clear();
        self.future.clear();
        self.present = value;
    }

    fn push_past(&mut self, value: T) {
        if self.max_history == 0 {
            return;
        }
        if self.past.len() >= self.max_history {
            self.past.remove(0);
        }
        self.past.push(value);
    }
}
