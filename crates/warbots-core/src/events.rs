//! Sound requests raised by the kernel for the mixer collaborator.

use serde::{Deserialize, Serialize};

use crate::enums::SoundId;

/// Fixed per-id request flags. The kernel raises a flag when an event wants
/// a sound; the mixer observes pending flags and clears the ones it played.
/// Raising an already-raised flag is a no-op, so a sound plays at most once
/// per mixer pass no matter how many events requested it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundRequests {
    flags: [bool; SoundId::COUNT],
}

impl SoundRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, id: SoundId) {
        self.flags[id.index()] = true;
    }

    pub fn is_requested(&self, id: SoundId) -> bool {
        self.flags[id.index()]
    }

    pub fn clear(&mut self, id: SoundId) {
        self.flags[id.index()] = false;
    }

    /// Currently pending ids, in id order. Does not clear.
    pub fn pending(&self) -> Vec<SoundId> {
        SoundId::ALL
            .into_iter()
            .filter(|id| self.flags[id.index()])
            .collect()
    }
}
