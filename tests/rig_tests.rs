//! Rig and Transform tests
//!
//! Tests for:
//! - Transform TRS defaults and dirty checking
//! - Euler angle helpers and look_at orientation
//! - Bone storage, semantic role lookup and matrix refresh

use glam::{Quat, Vec3};

use familiar::rig::{BoneRole, Rig, Transform};

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

// ============================================================================
// Transform
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();

    // First call always rebuilds (force_update starts true)
    assert!(t.update_local_matrix());

    // Second call without changes is a no-op
    assert!(!t.update_local_matrix());

    // Changing position triggers a rebuild
    t.position = Vec3::new(1.0, 2.0, 3.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    // mark_dirty forces one
    t.mark_dirty();
    assert!(t.update_local_matrix());
}

#[test]
fn transform_local_matrix_reflects_trs() {
    let mut t = Transform::new();
    t.position = Vec3::new(1.0, 2.0, 3.0);
    t.update_local_matrix();

    let translation: Vec3 = t.local_matrix().translation.into();
    assert!(vec3_approx(translation, Vec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn transform_euler_round_trip() {
    let mut t = Transform::new();
    t.set_rotation_euler(0.1, 0.5, -0.2);

    let euler = t.rotation_euler();
    assert!(vec3_approx(euler, Vec3::new(0.1, 0.5, -0.2)));
}

#[test]
fn transform_look_at_faces_the_target() {
    let mut t = Transform::new();
    t.position = Vec3::ZERO;
    t.look_at(Vec3::new(0.0, 0.0, -5.0), Vec3::Y);

    // Looking down -Z from the origin is the identity orientation
    assert!(t.rotation.angle_between(Quat::IDENTITY) < 1e-4);

    // Degenerate case (target straight up) leaves the rotation untouched
    let before = t.rotation;
    t.look_at(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
    assert_eq!(t.rotation, before);
}

// ============================================================================
// Rig
// ============================================================================

#[test]
fn roles_resolve_to_their_bones() {
    let mut rig = Rig::new();
    let tail = rig.add_role_bone(BoneRole::Tail, "tail_01");
    rig.add_bone("unrelated");

    assert_eq!(rig.role_key(BoneRole::Tail), Some(tail));
    assert_eq!(rig.role_bone(BoneRole::Tail).map(|b| b.name.as_str()), Some("tail_01"));
    assert!(rig.role_bone(BoneRole::Head).is_none());
    assert_eq!(rig.bone_count(), 2);
}

#[test]
fn assign_role_rejects_stale_handles() {
    let mut other = Rig::new();
    let foreign = other.add_bone("elsewhere");

    let mut rig = Rig::new();
    assert!(!rig.assign_role(BoneRole::Head, foreign));
    assert!(rig.role_key(BoneRole::Head).is_none());
}

#[test]
fn role_reassignment_takes_the_newest_bone() {
    let mut rig = Rig::new();
    let first = rig.add_role_bone(BoneRole::Head, "head_a");
    let second = rig.add_bone("head_b");
    assert!(rig.assign_role(BoneRole::Head, second));

    assert_eq!(rig.role_key(BoneRole::Head), Some(second));
    assert_ne!(rig.role_key(BoneRole::Head), Some(first));
}

#[test]
fn update_matrices_refreshes_root_and_bones() {
    let mut rig = Rig::new();
    let head = rig.add_role_bone(BoneRole::Head, "head");

    rig.root.position = Vec3::new(2.0, 0.0, 0.0);
    if let Some(bone) = rig.bone_mut(head) {
        bone.transform.position = Vec3::new(0.0, 1.5, 0.0);
    }
    rig.update_matrices();

    let root_translation: Vec3 = rig.root.local_matrix().translation.into();
    assert!(vec3_approx(root_translation, Vec3::new(2.0, 0.0, 0.0)));

    let head_translation: Vec3 = rig
        .bone(head)
        .expect("head bone")
        .transform
        .local_matrix()
        .translation
        .into();
    assert!(vec3_approx(head_translation, Vec3::new(0.0, 1.5, 0.0)));
}
