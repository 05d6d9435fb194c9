//! Jog history with undo.

use heapless::Deque;

use super::ModeSequence;
use crate::kinematics::MovementMode;

/// Default number of sequences a [`CommandLog`] remembers.
pub const DEFAULT_HISTORY: usize = 16;

/// The sequence that undoes `sequence`: reverse order, each mode replaced by
/// its opposite.
pub fn reverse_sequence(sequence: &[MovementMode]) -> ModeSequence {
    sequence.iter().rev().map(|mode| mode.opposite()).collect()
}

/// Bounded history of executed jog sequences.
///
/// When full, logging a new sequence drops the oldest one.
#[derive(Debug, Clone, Default)]
pub struct CommandLog<const N: usize = DEFAULT_HISTORY> {
    history: Deque<ModeSequence, N>,
}

impl<const N: usize> CommandLog<N> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self { history: Deque::new() }
    }

    /// Record an executed sequence.
    pub fn log(&mut self, sequence: ModeSequence) {
        if self.history.is_full() {
            let _ = self.history.pop_front();
        }
        let _ = self.history.push_back(sequence);
        debug!("logged command sequence, {} in history", self.history.len());
    }

    /// Most recent sequence.
    pub fn last(&self) -> Option<&ModeSequence> {
        self.history.back()
    }

    /// Remove and return the most recent sequence.
    pub fn pop_last(&mut self) -> Option<ModeSequence> {
        self.history.pop_back()
    }

    /// Remove the most recent sequence and return the sequence that undoes it.
    pub fn undo(&mut self) -> Option<ModeSequence> {
        self.pop_last().map(|seq| reverse_sequence(&seq))
    }

    /// Sequences, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ModeSequence> {
        self.history.iter()
    }

    /// Number of remembered sequences.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check if nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_sequence;

    #[test]
    fn test_reverse_sequence() {
        let seq = parse_sequence("wau").unwrap();
        assert_eq!(reverse_sequence(&seq), parse_sequence("nds").unwrap());
    }

    #[test]
    fn test_undo_pops_last() {
        let mut log: CommandLog = CommandLog::new();
        log.log(parse_sequence("w").unwrap());
        log.log(parse_sequence("ad").unwrap());

        assert_eq!(log.undo().unwrap().as_slice(), &[MovementMode::Left, MovementMode::Right]);
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().as_slice(), &[MovementMode::Forward]);

        log.pop_last();
        assert!(log.undo().is_none());
    }

    #[test]
    fn test_bounded_history_drops_oldest() {
        let mut log: CommandLog<2> = CommandLog::new();
        log.log(parse_sequence("w").unwrap());
        log.log(parse_sequence("s").unwrap());
        log.log(parse_sequence("u").unwrap());

        assert_eq!(log.len(), 2);
        let first = log.iter().next().unwrap();
        assert_eq!(first.as_slice(), &[MovementMode::Backward]);
    }
}
