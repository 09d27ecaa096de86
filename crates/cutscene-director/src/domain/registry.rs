//! Key to sequence lookup.

use std::collections::HashMap;

use cutscene_core::error::CutsceneError;
use cutscene_core::sequence::NamedSequence;
use tracing::warn;

/// Why an entry was left out of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectedReason {
    /// The key was empty or whitespace.
    EmptyKey,
    /// The handle did not point at any asset.
    NullHandle,
    /// An earlier entry already claimed the key.
    DuplicateKey,
}

/// An entry dropped during [`SequenceRegistry::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSequence {
    /// The offending key, as configured.
    pub key: String,
    /// Why it was dropped.
    pub reason: RejectedReason,
}

/// Immutable mapping from timeline key to sequence. Built once from
/// configuration and replaced wholesale, never patched.
#[derive(Debug, Clone, Default)]
pub struct SequenceRegistry {
    entries: HashMap<String, NamedSequence>,
    rejected: Vec<RejectedSequence>,
}

impl SequenceRegistry {
    /// Builds the lookup. The first registration of a key wins; later
    /// duplicates, blank keys and null handles are dropped with a warning.
    /// Building never fails.
    pub fn build(sequences: impl IntoIterator<Item = NamedSequence>) -> Self {
        let mut registry = Self::default();
        for sequence in sequences {
            let reason = if sequence.key.trim().is_empty() {
                Some(RejectedReason::EmptyKey)
            } else if sequence.handle.is_null() {
                Some(RejectedReason::NullHandle)
            } else if registry.entries.contains_key(&sequence.key) {
                Some(RejectedReason::DuplicateKey)
            } else {
                None
            };
            match reason {
                Some(reason) => {
                    warn!(key = %sequence.key, ?reason, "timeline entry dropped from registry");
                    registry.rejected.push(RejectedSequence {
                        key: sequence.key,
                        reason,
                    });
                }
                None => {
                    registry.entries.insert(sequence.key.clone(), sequence);
                }
            }
        }
        registry
    }

    /// Looks up a timeline by key.
    ///
    /// # Errors
    ///
    /// Returns `CutsceneError::EmptyKey` for a blank key and
    /// `CutsceneError::SequenceNotFound` when nothing is registered under it.
    pub fn resolve(&self, key: &str) -> Result<&NamedSequence, CutsceneError> {
        if key.trim().is_empty() {
            return Err(CutsceneError::EmptyKey);
        }
        self.entries
            .get(key)
            .ok_or_else(|| CutsceneError::SequenceNotFound(key.to_owned()))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries dropped while building, in configuration order.
    #[must_use]
    pub fn rejected(&self) -> &[RejectedSequence] {
        &self.rejected
    }
}
