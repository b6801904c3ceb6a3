//! Frame timing resource and the delta-time policy applied to it.
use bevy_ecs::prelude::Resource;

/// How implausible frame deltas (e.g. after a debugger pause) are treated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DeltaPolicy {
    /// Pass the sampled delta through unchanged.
    #[default]
    Unbounded,
    /// Clamp the delta to `max` seconds.
    Clamp { max: f32 },
    /// Treat any delta above `max` seconds as a zero-length frame.
    Skip { max: f32 },
}

impl DeltaPolicy {
    /// Apply the policy to a sampled delta. Negative and non-finite samples
    /// always become `0.0`.
    pub fn apply(self, dt: f32) -> f32 {
        if !dt.is_finite() || dt < 0.0 {
            return 0.0;
        }
        match self {
            DeltaPolicy::Unbounded => dt,
            DeltaPolicy::Clamp { max } => dt.min(max),
            DeltaPolicy::Skip { max } if dt > max => 0.0,
            DeltaPolicy::Skip { .. } => dt,
        }
    }

    /// Parse a policy name as written in the config file.
    pub fn from_name(name: &str, max: f32) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "unbounded" | "none" => Some(DeltaPolicy::Unbounded),
            "clamp" => Some(DeltaPolicy::Clamp { max }),
            "skip" => Some(DeltaPolicy::Skip { max }),
            _ => None,
        }
    }
}

/// Session time, updated once per frame before the game's update.
#[derive(Resource, Debug, Clone, Copy)]
pub struct FrameTime {
    /// Scaled seconds since the session started running.
    pub elapsed: f32,
    /// Scaled seconds for the current frame, after the policy.
    pub delta: f32,
    /// Delta exactly as sampled from the platform.
    pub raw_delta: f32,
    pub time_scale: f32,
    /// Frames started so far, including the current one.
    pub frame_count: u64,
}

impl Default for FrameTime {
    fn default() -> Self {
        FrameTime {
            elapsed: 0.0,
            delta: 0.0,
            raw_delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl FrameTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
