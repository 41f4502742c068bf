//! Animation definition data: keyframed channels grouped per bone.
//!
//! Data and serialization only; playback and interpolation math belong to
//! the consumer. Channel targets and keyframe interpolations are
//! referenced by namespaced name and resolved through a name registry.

use std::collections::BTreeMap;

use crate::key::ModelId;

/// Built-in interpolation names every registry starts with.
pub const INTERPOLATION_LINEAR: &str = "minecraft:linear";
pub const INTERPOLATION_CATMULLROM: &str = "minecraft:catmullrom";

/// Built-in channel target names.
pub const TARGET_POSITION: &str = "minecraft:position";
pub const TARGET_ROTATION: &str = "minecraft:rotation";
pub const TARGET_SCALE: &str = "minecraft:scale";

/// One sample on a channel's timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    /// Seconds from the start of the animation.
    pub timestamp: f32,
    /// Target vector at this timestamp, in the channel target's units.
    pub target: [f32; 3],
    /// Interpolation used to approach this keyframe, by registry name.
    pub interpolation: ModelId,
}

/// A keyframed track driving one aspect (position/rotation/scale) of a bone.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationChannel {
    pub target: ModelId,
    pub keyframes: Vec<Keyframe>,
}

/// A complete animation: channels per bone name.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDef {
    pub length_seconds: f32,
    pub looping: bool,
    pub bone_animations: BTreeMap<String, Vec<AnimationChannel>>,
}
