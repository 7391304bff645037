use std::sync::Arc;

use rustc_hash::FxHashMap;

/// A named, pre-authored skeletal animation.
///
/// The engine does not sample keyframes itself; it only needs each clip's
/// identity and authored duration to drive blending, loop handling and
/// completion timing. Immutable after registration.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: &str, duration: f32) -> Self {
        Self {
            name: name.to_string(),
            duration,
        }
    }
}

/// The clip table: every clip the character can play, keyed by name.
#[derive(Debug, Default)]
pub struct ClipLibrary {
    clips: FxHashMap<String, Arc<AnimationClip>>,
}

impl ClipLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a clip. A clip re-registered under the same name replaces
    /// the previous entry; actions already holding the old `Arc` keep it.
    pub fn register(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.name.clone(), Arc::new(clip));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<AnimationClip>> {
        self.clips.get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
