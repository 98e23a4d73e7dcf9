use bytemuck::{Pod, Zeroable};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Handle to an attached behaviour, returned by `BehaviourState::attach`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BehaviourId(pub u32);

/// Entity pose written to shared memory for the host renderer.
/// 4 floats = 16 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Pose {
    /// Entity id, stored as f32 so the buffer stays a flat Float32Array.
    pub id: f32,
    pub x: f32,
    pub y: f32,
    /// Facing in degrees (unnormalized).
    pub facing: f32,
}

impl Pose {
    pub const FLOATS: usize = 4;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}
