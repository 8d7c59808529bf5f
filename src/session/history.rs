//! Append-only record of positions reached in a session, with truncation for undo.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history index {index} out of range (length {len})")]
    OutOfRange { index: usize, len: usize },
}

/// A position and the ply at which it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<P> {
    pub ply: u32,
    pub position: P,
}

/// Ordered positions, entry 0 being the starting position. Never empty.
#[derive(Debug, Clone)]
pub struct HistoryStack<P> {
    entries: Vec<HistoryEntry<P>>,
}

impl<P> HistoryStack<P> {
    pub fn new(initial: P) -> Self {
        Self {
            entries: vec![HistoryEntry {
                ply: 0,
                position: initial,
            }],
        }
    }

    /// Append a position. Returns its index.
    pub fn record(&mut self, position: P) -> usize {
        let index = self.entries.len();
        self.entries.push(HistoryEntry {
            ply: index as u32,
            position,
        });
        index
    }

    /// Keep entries `0..=index`, discarding the rest.
    pub fn truncate_to(&mut self, index: usize) -> Result<(), HistoryError> {
        if index > self.entries.len() {
            return Err(HistoryError::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.entries.truncate(index + 1);
        Ok(())
    }

    pub fn current(&self) -> &HistoryEntry<P> {
        // Non-empty from construction; truncate_to keeps entry 0
        &self.entries[self.entries.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry<P>> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// False once the initial position is recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry<P>> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_initial_entry() {
        let history = HistoryStack::new("start");
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
        assert_eq!(history.current().position, "start");
        assert_eq!(history.current().ply, 0);
    }

    #[test]
    fn test_record_returns_index() {
        let mut history = HistoryStack::new(0);
        assert_eq!(history.record(10), 1);
        assert_eq!(history.record(20), 2);
        assert_eq!(history.current().position, 20);
        assert_eq!(history.current().ply, 2);
        assert_eq!(history.get(1).map(|e| e.position), Some(10));
    }

    #[test]
    fn test_truncate_to() {
        let mut history = HistoryStack::new(0);
        history.record(1);
        history.record(2);
        history.record(3);

        history.truncate_to(1).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().position, 1);

        // Truncating at or past the end keeps everything
        history.truncate_to(2).unwrap();
        assert_eq!(history.len(), 2);

        history.truncate_to(0).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().position, 0);
    }

    #[test]
    fn test_truncate_out_of_range() {
        let mut history = HistoryStack::new(0);
        history.record(1);
        assert_eq!(
            history.truncate_to(3),
            Err(HistoryError::OutOfRange { index: 3, len: 2 })
        );
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_iter_in_order() {
        let mut history = HistoryStack::new('a');
        history.record('b');
        history.record('c');
        let positions: Vec<char> = history.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec!['a', 'b', 'c']);
    }
}
