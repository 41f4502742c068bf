//! Codec for animation definition documents.
//!
//! Interpolations and channel targets travel as namespaced names; only
//! their syntax is validated here. Resolving them against the known-name
//! registries happens when an animation set is reloaded.

use std::collections::BTreeMap;

use mp_model::{AnimationChannel, AnimationDef, INTERPOLATION_LINEAR, Keyframe, ModelId};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};

pub fn decode_animation(id: &str, raw: &str) -> Result<AnimationDef, DecodeError> {
    let doc: AnimationDoc =
        serde_json::from_str(raw).map_err(|e| DecodeError::from_json(id, &e))?;
    animation_from_doc(id, doc)
}

pub fn decode_animation_value(
    id: &str,
    value: &serde_json::Value,
) -> Result<AnimationDef, DecodeError> {
    let doc: AnimationDoc =
        serde_json::from_value(value.clone()).map_err(|e| DecodeError::from_json(id, &e))?;
    animation_from_doc(id, doc)
}

pub fn encode_animation(def: &AnimationDef) -> Result<serde_json::Value, EncodeError> {
    Ok(serde_json::to_value(animation_to_doc(def))?)
}

pub fn encode_animation_pretty(def: &AnimationDef) -> Result<String, EncodeError> {
    Ok(serde_json::to_string_pretty(&animation_to_doc(def))?)
}

fn animation_from_doc(id: &str, doc: AnimationDoc) -> Result<AnimationDef, DecodeError> {
    let mut bone_animations = BTreeMap::new();
    for (bone, channels) in doc.bone_animations {
        let channels = channels
            .into_iter()
            .map(|channel| channel_from_doc(id, &bone, channel))
            .collect::<Result<Vec<_>, _>>()?;
        bone_animations.insert(bone, channels);
    }
    Ok(AnimationDef {
        length_seconds: doc.length_in_seconds,
        looping: doc.looping,
        bone_animations,
    })
}

fn channel_from_doc(id: &str, bone: &str, doc: ChannelDoc) -> Result<AnimationChannel, DecodeError> {
    let field = |name: &str| format!("boneAnimations.{bone}.{name}");
    let target: ModelId = doc
        .target
        .parse()
        .map_err(|e| DecodeError::field(id, &field("target"), e))?;
    let keyframes = doc
        .keyframes
        .into_iter()
        .map(|kf| {
            Ok(Keyframe {
                timestamp: kf.timestamp,
                target: kf.target,
                interpolation: kf
                    .interpolation
                    .parse()
                    .map_err(|e| DecodeError::field(id, &field("keyframes.interpolation"), e))?,
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;
    Ok(AnimationChannel { target, keyframes })
}

fn animation_to_doc(def: &AnimationDef) -> AnimationDoc {
    AnimationDoc {
        length_in_seconds: def.length_seconds,
        looping: def.looping,
        bone_animations: def
            .bone_animations
            .iter()
            .map(|(bone, channels)| {
                let channels = channels
                    .iter()
                    .map(|channel| ChannelDoc {
                        target: channel.target.to_string(),
                        keyframes: channel
                            .keyframes
                            .iter()
                            .map(|kf| KeyframeDoc {
                                timestamp: kf.timestamp,
                                target: kf.target,
                                interpolation: kf.interpolation.to_string(),
                            })
                            .collect(),
                    })
                    .collect();
                (bone.clone(), channels)
            })
            .collect(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnimationDoc {
    length_in_seconds: f32,
    #[serde(default, skip_serializing_if = "is_false")]
    looping: bool,
    bone_animations: BTreeMap<String, Vec<ChannelDoc>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChannelDoc {
    target: String,
    keyframes: Vec<KeyframeDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct KeyframeDoc {
    timestamp: f32,
    target: [f32; 3],
    #[serde(
        default = "default_interpolation",
        skip_serializing_if = "is_default_interpolation"
    )]
    interpolation: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn default_interpolation() -> String {
    INTERPOLATION_LINEAR.to_string()
}

fn is_default_interpolation(value: &String) -> bool {
    value == INTERPOLATION_LINEAR
}
