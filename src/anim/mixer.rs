//! Clip playback for animated assets.
//!
//! A [`Mixer`] owns one animation clip and a play cursor. Once per frame it
//! is advanced by the elapsed delta and samples the clip's channels onto the
//! model's node poses, looping when the cursor passes the clip's end. Only
//! the first clip of an asset is ever played; assets with zero clips simply
//! get no mixer.

use cgmath::{InnerSpace, Quaternion, Vector3};

/// Which node property a channel animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelTarget {
    Translation,
    Rotation,
    Scale,
}

/// Keyframe interpolation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
}

/// One animated property of one node: parallel keyframe times and values.
///
/// Values are stored as `[x, y, z, w]`; translation and scale use the first
/// three components, rotation uses all four as a quaternion.
#[derive(Debug, Clone)]
pub struct Channel {
    pub node: usize,
    pub target: ChannelTarget,
    pub interpolation: Interpolation,
    pub times: Vec<f32>,
    pub values: Vec<[f32; 4]>,
}

/// A pre-baked keyframe animation bundled with an asset.
#[derive(Debug, Clone)]
pub struct Clip {
    pub name: String,
    pub duration: f32,
    pub channels: Vec<Channel>,
}

/// Local transform of one scene-graph node, written to by the mixer.
#[derive(Debug, Clone, Copy)]
pub struct NodePose {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for NodePose {
    fn default() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Per-model animation driver advancing one clip by elapsed time.
#[derive(Debug, Clone)]
pub struct Mixer {
    clip: Clip,
    cursor: f32,
}

impl Mixer {
    pub fn new(clip: Clip) -> Self {
        Self { clip, cursor: 0.0 }
    }

    /// Current play cursor in seconds.
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn clip(&self) -> &Clip {
        &self.clip
    }

    /// Advances the cursor by `dt` seconds (looping) and writes the sampled
    /// channel values onto `poses`. Channels referencing nodes outside the
    /// slice are skipped.
    pub fn update(&mut self, dt: f32, poses: &mut [NodePose]) {
        if self.clip.duration > 0.0 {
            self.cursor = (self.cursor + dt.max(0.0)).rem_euclid(self.clip.duration);
        }

        for channel in &self.clip.channels {
            let Some(pose) = poses.get_mut(channel.node) else {
                continue;
            };
            let Some(value) = sample_channel(channel, self.cursor) else {
                continue;
            };

            match channel.target {
                ChannelTarget::Translation => {
                    pose.translation = Vector3::new(value[0], value[1], value[2]);
                }
                ChannelTarget::Scale => {
                    pose.scale = Vector3::new(value[0], value[1], value[2]);
                }
                ChannelTarget::Rotation => {
                    pose.rotation = quat_from_xyzw(value);
                }
            }
        }
    }
}

fn quat_from_xyzw(v: [f32; 4]) -> Quaternion<f32> {
    Quaternion::new(v[3], v[0], v[1], v[2])
}

/// Samples one channel at `time`, interpolating between the surrounding
/// keyframes. Returns `None` for an empty channel.
fn sample_channel(channel: &Channel, time: f32) -> Option<[f32; 4]> {
    if channel.times.is_empty() || channel.times.len() != channel.values.len() {
        return None;
    }

    // Index of the first keyframe strictly after `time`
    let next = channel.times.partition_point(|&t| t <= time);
    if next == 0 {
        return Some(channel.values[0]);
    }
    if next == channel.times.len() {
        return Some(channel.values[channel.times.len() - 1]);
    }

    let prev = next - 1;
    if channel.interpolation == Interpolation::Step {
        return Some(channel.values[prev]);
    }

    let span = channel.times[next] - channel.times[prev];
    if span <= f32::EPSILON {
        return Some(channel.values[next]);
    }
    let t = (time - channel.times[prev]) / span;

    let a = channel.values[prev];
    let b = channel.values[next];

    if channel.target == ChannelTarget::Rotation {
        let qa = quat_from_xyzw(a);
        let mut qb = quat_from_xyzw(b);
        // Shortest path: flip the second quaternion when the arc is long
        if qa.dot(qb) < 0.0 {
            qb = -qb;
        }
        let q = (qa * (1.0 - t) + qb * t).normalize();
        return Some([q.v.x, q.v.y, q.v.z, q.s]);
    }

    Some([
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation_clip() -> Clip {
        Clip {
            name: "slide".to_string(),
            duration: 2.0,
            channels: vec![Channel {
                node: 0,
                target: ChannelTarget::Translation,
                interpolation: Interpolation::Linear,
                times: vec![0.0, 1.0, 2.0],
                values: vec![
                    [0.0, 0.0, 0.0, 0.0],
                    [2.0, 0.0, 0.0, 0.0],
                    [0.0, 0.0, 0.0, 0.0],
                ],
            }],
        }
    }

    #[test]
    fn samples_linear_keyframes() {
        let mut mixer = Mixer::new(translation_clip());
        let mut poses = vec![NodePose::default()];

        mixer.update(0.5, &mut poses);
        assert!((poses[0].translation.x - 1.0).abs() < 1e-6);

        mixer.update(0.5, &mut poses);
        assert!((poses[0].translation.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn cursor_loops_past_clip_end() {
        let mut mixer = Mixer::new(translation_clip());
        let mut poses = vec![NodePose::default()];

        mixer.update(2.5, &mut poses);
        assert!((mixer.cursor() - 0.5).abs() < 1e-6);
        assert!((poses[0].translation.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn step_interpolation_holds_previous_key() {
        let mut clip = translation_clip();
        clip.channels[0].interpolation = Interpolation::Step;
        let mut mixer = Mixer::new(clip);
        let mut poses = vec![NodePose::default()];

        mixer.update(0.9, &mut poses);
        assert_eq!(poses[0].translation.x, 0.0);
    }

    #[test]
    fn out_of_range_node_is_skipped() {
        let mut clip = translation_clip();
        clip.channels[0].node = 7;
        let mut mixer = Mixer::new(clip);
        let mut poses = vec![NodePose::default()];

        mixer.update(0.5, &mut poses);
        assert_eq!(poses[0].translation.x, 0.0);
    }

    #[test]
    fn rotation_channel_normalizes() {
        let clip = Clip {
            name: "turn".to_string(),
            duration: 1.0,
            channels: vec![Channel {
                node: 0,
                target: ChannelTarget::Rotation,
                interpolation: Interpolation::Linear,
                times: vec![0.0, 1.0],
                values: vec![
                    [0.0, 0.0, 0.0, 1.0],
                    // 90 degrees about Y
                    [0.0, std::f32::consts::FRAC_1_SQRT_2, 0.0, std::f32::consts::FRAC_1_SQRT_2],
                ],
            }],
        };
        let mut mixer = Mixer::new(clip);
        let mut poses = vec![NodePose::default()];

        mixer.update(0.5, &mut poses);
        let q = poses[0].rotation;
        let len = (q.s * q.s + q.v.x * q.v.x + q.v.y * q.v.y + q.v.z * q.v.z).sqrt();
        assert!((len - 1.0).abs() < 1e-5);
    }
}
