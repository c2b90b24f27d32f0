use thiserror::Error;

/// Construction-time rejection of a malformed world description.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("world has no appendage groups")]
    NoGroups,
    #[error("group {group}: appendage count must be at least 1")]
    ZeroAppendages { group: usize },
    #[error("group {group}: joint count range {min}..={max} is invalid (need 2 <= min <= max)")]
    JointCount { group: usize, min: u32, max: u32 },
    #[error("group {group}: rest length range {min}..={max} is invalid (need 0 < min <= max)")]
    RestLength { group: usize, min: f32, max: f32 },
    #[error("group {group}: {field} must be finite and positive, got {value}")]
    NonPositive { group: usize, field: &'static str, value: f32 },
    #[error("group {group}: {field} must be finite and within [0, 1], got {value}")]
    OutOfUnitRange { group: usize, field: &'static str, value: f32 },
    #[error("phased groups drive the body and cannot share a world with other gaits")]
    MixedBodyDrive,
    #[error("pursuit: {field} is invalid ({value})")]
    Pursuit { field: &'static str, value: f32 },
    #[error("viewport {width}x{height} is invalid")]
    Viewport { width: f32, height: f32 },
    #[error("unknown speed profile {0:?} (expected slow, normal or fast)")]
    UnknownProfile(String),
}
