//! Pose buffer shared with the host.
//! The host wraps `poses_ptr()` in a Float32Array of `pose_count() * 4`
//! floats after each tick and renders the view from it.

use crate::api::types::Pose;
use crate::components::entity::Entity;

pub struct PoseBuffer {
    poses: Vec<Pose>,
    capacity: usize,
}

impl PoseBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            poses: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.poses.clear();
    }

    /// Append a pose. Returns false once the buffer is full.
    pub fn push(&mut self, pose: Pose) -> bool {
        if self.poses.len() >= self.capacity {
            return false;
        }
        self.poses.push(pose);
        true
    }

    /// Rebuild from the active entities of a scene, in scene order.
    /// Entities past capacity are dropped with a warning.
    pub fn rebuild<'a>(&mut self, entities: impl Iterator<Item = &'a Entity>) {
        self.clear();
        let mut dropped = 0usize;
        for entity in entities.filter(|e| e.active) {
            let pose = Pose {
                id: entity.id.0 as f32,
                x: entity.pos.x,
                y: entity.pos.y,
                facing: entity.facing,
            };
            if !self.push(pose) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            log::warn!("pose buffer full ({}), dropped {} entities", self.capacity, dropped);
        }
    }

    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// Flat float view, 4 floats per pose.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(self.poses.as_slice())
    }

    pub fn pose_count(&self) -> u32 {
        self.poses.len() as u32
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Raw pointer to pose data for shared-memory reads.
    pub fn poses_ptr(&self) -> *const f32 {
        self.poses.as_ptr() as *const f32
    }
}

impl Default for PoseBuffer {
    fn default() -> Self {
        Self::with_capacity(256)
    }
}
