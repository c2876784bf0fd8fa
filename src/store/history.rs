use crate::model::Note;

/// Oldest snapshots are dropped beyond this many undo steps.
const HISTORY_LIMIT: usize = 500;

/// Linear undo/redo history over whole-collection snapshots.
///
/// `present` is always the live notes collection. Committing a mutation
/// pushes the outgoing collection onto `past` and clears `future`; undo
/// and redo move the present pointer through the two stacks without
/// reordering them.
#[derive(Debug, Clone)]
pub struct NoteHistory {
    past: Vec<Vec<Note>>,
    present: Vec<Note>,
    future: Vec<Vec<Note>>,
}

impl NoteHistory {
    pub fn new(initial: Vec<Note>) -> Self {
        NoteHistory {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
        }
    }

    /// The live collection.
    pub fn present(&self) -> &[Note] {
        &self.present
    }

    /// Commit a new state. Clears the redo stack.
    pub fn commit(&mut self, next: Vec<Note>) {
        let prev = std::mem::replace(&mut self.present, next);
        self.past.push(prev);
        if self.past.len() > HISTORY_LIMIT {
            self.past.drain(..self.past.len() - HISTORY_LIMIT);
        }
        self.future.clear();
    }

    /// Step back one snapshot. Returns false when `past` is empty.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.insert(0, current);
        true
    }

    /// Step forward one snapshot. Returns false when `future` is empty.
    pub fn redo(&mut self) -> bool {
        if self.future.is_empty() {
            return false;
        }
        let next = self.future.remove(0);
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo steps available.
    pub fn depth(&self) -> usize {
        self.past.len()
    }
}
