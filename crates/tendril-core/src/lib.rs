pub mod scalar;
pub mod ids;
pub mod types;
pub mod hash;
pub mod time;
pub mod determinism;
pub mod schedule;
pub mod rng;
pub mod seed;
pub mod step_ctx;
pub mod profile;
pub mod error;

pub use scalar::Scalar;
pub use ids::{AppendageId, GroupId};
pub use types::{Vec2, vec2, BodyFrame, Viewport, wrap_angle, lerp_angle};
pub use hash::{StepHasher, hash_vec2, hash_f32};
pub use time::StepStats;
pub use determinism::DeterminismContract;
pub use schedule::{StepStage, schedule_digest};
pub use rng::XorShift64;
pub use seed::{SeedDescriptor, seed_id};
pub use step_ctx::StepCtx;
pub use profile::{SpeedProfile, ProfileGains};
pub use error::ConfigError;
