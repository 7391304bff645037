use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::rig::{BoneKey, Transform};

/// Semantic role of a bone the procedural layer knows how to animate.
///
/// Role assignment is optional per rig; every consumer treats a missing
/// role as a no-op, never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneRole {
    Head,
    Tail,
    EarLeft,
    EarRight,
}

impl BoneRole {
    /// Human-readable role name, used in log messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BoneRole::Head => "head",
            BoneRole::Tail => "tail",
            BoneRole::EarLeft => "ear_left",
            BoneRole::EarRight => "ear_right",
        }
    }
}

/// A single bone: a named transform inside the rig.
#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub transform: Transform,
}

impl Bone {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::new(),
        }
    }
}

/// The character's spatial model: one root transform (the object the
/// motion controller tweens) plus the bones discovered on the skeleton.
///
/// Bones live in a slotmap; semantic roles index into it so the
/// procedural layer can address "the tail" without knowing rig-specific
/// bone names.
#[derive(Debug, Default)]
pub struct Rig {
    /// The model's object transform (position/orientation/scale).
    pub root: Transform,

    bones: SlotMap<BoneKey, Bone>,
    roles: FxHashMap<BoneRole, BoneKey>,
}

impl Rig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Transform::new(),
            bones: SlotMap::with_key(),
            roles: FxHashMap::default(),
        }
    }

    /// Adds a bone and returns its handle.
    pub fn add_bone(&mut self, name: &str) -> BoneKey {
        self.bones.insert(Bone::new(name))
    }

    /// Adds a bone and assigns it a semantic role in one step.
    pub fn add_role_bone(&mut self, role: BoneRole, name: &str) -> BoneKey {
        let key = self.add_bone(name);
        self.assign_role(role, key);
        key
    }

    /// Assigns (or reassigns) a semantic role to an existing bone.
    /// Returns `false` if the handle is stale.
    pub fn assign_role(&mut self, role: BoneRole, key: BoneKey) -> bool {
        if !self.bones.contains_key(key) {
            log::warn!("assign_role({}): stale bone handle, ignoring", role.as_str());
            return false;
        }
        self.roles.insert(role, key);
        true
    }

    #[must_use]
    pub fn bone(&self, key: BoneKey) -> Option<&Bone> {
        self.bones.get(key)
    }

    pub fn bone_mut(&mut self, key: BoneKey) -> Option<&mut Bone> {
        self.bones.get_mut(key)
    }

    /// Resolves a semantic role to its bone handle.
    #[must_use]
    pub fn role_key(&self, role: BoneRole) -> Option<BoneKey> {
        self.roles.get(&role).copied()
    }

    /// Mutable access to the bone assigned to `role`, if any.
    pub fn role_bone_mut(&mut self, role: BoneRole) -> Option<&mut Bone> {
        let key = self.role_key(role)?;
        self.bones.get_mut(key)
    }

    /// Read access to the bone assigned to `role`, if any.
    #[must_use]
    pub fn role_bone(&self, role: BoneRole) -> Option<&Bone> {
        let key = self.role_key(role)?;
        self.bones.get(key)
    }

    /// Iterates all bones with their handles.
    pub fn bones(&self) -> impl Iterator<Item = (BoneKey, &Bone)> {
        self.bones.iter()
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Rebuilds the cached local matrices the renderer consumes.
    /// Called once at the end of each engine update, after all writers.
    pub fn update_matrices(&mut self) {
        self.root.update_local_matrix();
        for (_, bone) in &mut self.bones {
            bone.transform.update_local_matrix();
        }
    }
}
