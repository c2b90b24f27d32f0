use serde::{Deserialize, Serialize};
use tendril_core::{AppendageId, GroupId, SpeedProfile, Vec2};
use tendril_locomotion::GaitStatus;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppendageView {
    pub id: AppendageId,
    pub group: GroupId,
    pub joints: Vec<Vec2>,
    pub status: GaitStatus,
}

impl AppendageView {
    pub fn is_stepping(&self) -> bool { self.status.is_stepping() }
}

/// Read-only copy of everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub generation: u64,
    pub profile: SpeedProfile,
    pub target: Vec2,
    pub body: BodySnapshot,
    pub appendages: Vec<AppendageView>,
}
