//! Drag sources that saw the current gesture start.

use smallvec::SmallVec;
use touchdnd_core::SourceId;

/// Candidate list, innermost source first.
///
/// Reset at every gesture start, filled by the sources' start handlers, and
/// handed to the host whole once movement confirms a drag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveStartCandidates {
    ids: SmallVec<[SourceId; 4]>,
}

impl MoveStartCandidates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Put `source_id` in front of the sources recorded so far.
    pub fn prepend(&mut self, source_id: SourceId) {
        self.ids.insert(0, source_id);
    }

    /// Move the recorded sources out, leaving the list empty.
    pub fn take(&mut self) -> SmallVec<[SourceId; 4]> {
        std::mem::take(&mut self.ids)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SourceId] {
        &self.ids
    }
}
