//! Rig Module
//!
//! The character's mutable spatial state:
//! - [`Transform`]: TRS component with matrix cache and dirty checking
//! - [`Rig`]: the character's root transform plus named bones, addressable
//!   by semantic role (head, tail, ears)
//!
//! The engine only ever *writes* transform fields; an external renderer
//! consumes them each frame after the update pass.

pub mod rig;
pub mod transform;

pub use rig::{Bone, BoneRole, Rig};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a bone stored in a [`Rig`].
    pub struct BoneKey;
}
