use glam::{Quat, Vec3};
use slotmap::SecondaryMap;

use crate::rig::{BoneKey, BoneRole, Rig};

/// Snapshot of bone rotations and the root scale, used as the zero-point
/// for additive procedural offsets.
///
/// Read-only during a tick; invalidated only by an explicit re-cache.
#[derive(Debug, Default)]
pub struct BaselineCache {
    rotations: SecondaryMap<BoneKey, Quat>,
    root_scale: Option<Vec3>,
}

impl BaselineCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots every bone's rotation and the root scale.
    pub fn cache(&mut self, rig: &Rig) {
        self.rotations.clear();
        for (key, bone) in rig.bones() {
            self.rotations.insert(key, bone.transform.rotation);
        }
        self.root_scale = Some(rig.root.scale);
    }

    /// Writes the snapshot back to the bones the procedural layer touches
    /// (role-assigned bones) and the root scale, undoing the previous
    /// tick's additive offsets. Bones without a cached entry are left
    /// alone.
    pub fn restore(&self, rig: &mut Rig) {
        for role in [
            BoneRole::Head,
            BoneRole::Tail,
            BoneRole::EarLeft,
            BoneRole::EarRight,
        ] {
            let Some(key) = rig.role_key(role) else {
                continue;
            };
            let Some(rotation) = self.rotations.get(key) else {
                continue;
            };
            if let Some(bone) = rig.bone_mut(key) {
                bone.transform.rotation = *rotation;
            }
        }

        if let Some(scale) = self.root_scale {
            rig.root.scale = scale;
        }
    }

    /// The cached rotation for a bone, if the bone existed at cache time.
    #[must_use]
    pub fn rotation(&self, key: BoneKey) -> Option<Quat> {
        self.rotations.get(key).copied()
    }

    /// The cached root scale.
    #[must_use]
    pub fn root_scale(&self) -> Option<Vec3> {
        self.root_scale
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.root_scale.is_some()
    }

    pub fn clear(&mut self) {
        self.rotations.clear();
        self.root_scale = None;
    }
}
