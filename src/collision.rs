//! Player AABB collider (SPEC_FULL.md §6 "Player collision contract",
//! §1 Non-goals: player physics beyond AABB-vs-block collision is out of
//! scope — no gravity, jumping, or movement input live here, only the
//! axis-by-axis sweep-and-resolve a physics layer built on top of this
//! crate would call into).
//!
//! Grounded on the teacher's `physics::handler::PlayerPhysicsHandler`
//! collision pass, reduced to the block-enumeration + axis-sweep contract
//! the spec actually names.

use crate::geom::Aabb;
use crate::registry::BlockRegistry;
use crate::world::manager::ChunkManager;
use glam::{IVec3, Vec3};

/// Enumerates the AABBs of every block inside `region` whose type has the
/// collision flag set. Used as the broad phase for player movement.
pub fn block_collision_boxes(manager: &ChunkManager, registry: &BlockRegistry, region: Aabb) -> Vec<Aabb> {
    let min = region.min.floor().as_ivec3();
    let max = region.max.ceil().as_ivec3();
    let mut boxes = Vec::new();

    for x in min.x..max.x {
        for y in min.y..max.y {
            for z in min.z..max.z {
                let pos = IVec3::new(x, y, z);
                let block = manager.get_block(pos);
                if block.is_air() || !registry.has_collision(block) {
                    continue;
                }
                let origin = pos.as_vec3();
                boxes.push(Aabb::new(origin, origin + Vec3::ONE));
            }
        }
    }
    boxes
}

/// Sweeps `moving` by `motion`, resolving one axis at a time (Y, then X,
/// then Z — vertical first so slope/step behavior built on top of this
/// sees a stable ground plane) against `obstacles`. Returns the resolved
/// displacement; a physics layer applies it to the player's position and
/// zeroes the corresponding velocity component per axis that was clipped.
pub fn resolve_axis_by_axis(moving: Aabb, motion: Vec3, obstacles: &[Aabb]) -> Vec3 {
    let mut resolved = Vec3::ZERO;
    let mut current = moving;

    for axis in [1usize, 0, 2] {
        let mut delta = Vec3::ZERO;
        delta[axis] = motion[axis];
        if delta[axis] == 0.0 {
            continue;
        }
        let swept = translate(current, delta);
        let clipped = clip_axis(&current, &swept, obstacles, axis);
        resolved[axis] = clipped[axis];
        current = translate(current, clipped);
    }

    resolved
}

fn translate(aabb: Aabb, delta: Vec3) -> Aabb {
    Aabb::new(aabb.min + delta, aabb.max + delta)
}

/// Clips a single-axis displacement `from -> to` against every obstacle,
/// shrinking it to stop flush against the nearest one that would
/// otherwise be penetrated.
fn clip_axis(from: &Aabb, to: &Aabb, obstacles: &[Aabb], axis: usize) -> Vec3 {
    let mut allowed = to.min[axis] - from.min[axis];

    for obstacle in obstacles {
        if !overlaps_other_axes(to, obstacle, axis) {
            continue;
        }
        if allowed > 0.0 {
            let gap = obstacle.min[axis] - from.max[axis];
            if gap >= 0.0 && gap < allowed && from.max[axis] <= obstacle.min[axis] + 1e-4 {
                allowed = allowed.min(gap);
            }
        } else if allowed < 0.0 {
            let gap = obstacle.max[axis] - from.min[axis];
            if gap <= 0.0 && gap > allowed && from.min[axis] >= obstacle.max[axis] - 1e-4 {
                allowed = allowed.max(gap);
            }
        }
    }

    let mut out = Vec3::ZERO;
    out[axis] = allowed;
    out
}

fn overlaps_other_axes(a: &Aabb, b: &Aabb, excluded_axis: usize) -> bool {
    for axis in 0..3 {
        if axis == excluded_axis {
            continue;
        }
        if a.min[axis] >= b.max[axis] || a.max[axis] <= b.min[axis] {
            return false;
        }
    }
    true
}
