use serde::{Deserialize, Serialize};
use tendril_controllers::PursuitParams;
use tendril_core::{ConfigError, DeterminismContract, SpeedProfile};
use tendril_locomotion::{GaitSpec, PhaseParams, ReachParams, StepParams};

/// Inclusive joint-count range an appendage draws from at seed time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange { pub min: u32, pub max: u32 }

/// Rest-length range `[min, max)`; `min == max` pins every chain to one length.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LengthRange { pub min: f32, pub max: f32 }

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self { Self { min, max } }
}
impl LengthRange {
    pub const fn new(min: f32, max: f32) -> Self { Self { min, max } }
}

fn default_iterations() -> u32 { DeterminismContract::default_contract().iterations }

/// A set of appendages sharing one gait and one set of seeding ranges.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub count: u32,
    pub joints: CountRange,
    pub rest_length: LengthRange,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    pub gait: GaitSpec,
}

impl GroupConfig {
    pub fn validate(&self, group: usize) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::ZeroAppendages { group });
        }
        let CountRange { min, max } = self.joints;
        if min < 2 || min > max {
            return Err(ConfigError::JointCount { group, min, max });
        }
        let LengthRange { min, max } = self.rest_length;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::RestLength { group, min, max });
        }
        self.gait.validate(group)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub profile: SpeedProfile,
    pub groups: Vec<GroupConfig>,
    #[serde(default)]
    pub pursuit: PursuitParams,
}

impl Default for WorldConfig {
    fn default() -> Self { Self::spider() }
}

impl WorldConfig {
    /// Eight stepping legs around an oriented body.
    pub fn spider() -> Self {
        Self {
            profile: SpeedProfile::Normal,
            groups: vec![GroupConfig {
                count: 8,
                joints: CountRange::new(4, 5),
                rest_length: LengthRange::new(30.0, 40.0),
                iterations: default_iterations(),
                gait: GaitSpec::Stepping(StepParams::default()),
            }],
            pursuit: PursuitParams::default(),
        }
    }

    /// Six limbs on a shared reach/drag/recover cycle.
    pub fn crawler() -> Self {
        Self {
            profile: SpeedProfile::Normal,
            groups: vec![GroupConfig {
                count: 6,
                joints: CountRange::new(5, 7),
                rest_length: LengthRange::new(18.0, 26.0),
                iterations: default_iterations(),
                gait: GaitSpec::Phased(PhaseParams::default()),
            }],
            pursuit: PursuitParams::default(),
        }
    }

    /// Long trailing tentacles easing toward the target.
    pub fn tentacles() -> Self {
        Self {
            profile: SpeedProfile::Normal,
            groups: vec![GroupConfig {
                count: 10,
                joints: CountRange::new(12, 20),
                rest_length: LengthRange::new(8.0, 12.0),
                iterations: default_iterations(),
                gait: GaitSpec::Reaching(ReachParams::default()),
            }],
            pursuit: PursuitParams::default(),
        }
    }

    /// Preset by name, as accepted on the bench command line.
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "spider" => Some(Self::spider()),
            "crawler" => Some(Self::crawler()),
            "tentacles" => Some(Self::tentacles()),
            _ => None,
        }
    }

    pub fn with_profile(mut self, profile: SpeedProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn appendage_count(&self) -> u32 { self.groups.iter().map(|g| g.count).sum() }

    /// True when phased groups move the body instead of pursuit.
    pub fn body_driven_by_gait(&self) -> bool { self.groups.iter().any(|g| g.gait.drives_body()) }

    pub fn body_oriented(&self) -> bool { self.groups.iter().any(|g| g.gait.needs_heading()) }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.groups.is_empty() {
            return Err(ConfigError::NoGroups);
        }
        for (i, g) in self.groups.iter().enumerate() {
            g.validate(i)?;
        }
        let driving = self.groups.iter().filter(|g| g.gait.drives_body()).count();
        if driving != 0 && driving != self.groups.len() {
            return Err(ConfigError::MixedBodyDrive);
        }
        self.pursuit.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for c in [WorldConfig::spider(), WorldConfig::crawler(), WorldConfig::tentacles()] {
            assert_eq!(c.validate(), Ok(()));
        }
        assert!(WorldConfig::preset("Crawler").is_some());
        assert!(WorldConfig::preset("octopus").is_none());
    }

    #[test]
    fn rejects_malformed_groups() {
        assert_eq!(WorldConfig { groups: vec![], ..WorldConfig::spider() }.validate(), Err(ConfigError::NoGroups));

        let mut c = WorldConfig::spider();
        c.groups[0].count = 0;
        assert_eq!(c.validate(), Err(ConfigError::ZeroAppendages { group: 0 }));

        let mut c = WorldConfig::spider();
        c.groups[0].joints = CountRange::new(1, 4);
        assert_eq!(c.validate(), Err(ConfigError::JointCount { group: 0, min: 1, max: 4 }));
        c.groups[0].joints = CountRange::new(6, 4);
        assert!(matches!(c.validate(), Err(ConfigError::JointCount { .. })));

        let mut c = WorldConfig::spider();
        c.groups[0].rest_length = LengthRange::new(0.0, 10.0);
        assert!(matches!(c.validate(), Err(ConfigError::RestLength { .. })));
        c.groups[0].rest_length = LengthRange::new(12.0, f32::INFINITY);
        assert!(matches!(c.validate(), Err(ConfigError::RestLength { .. })));
    }

    #[test]
    fn phased_groups_cannot_mix_with_pursuit() {
        let mut c = WorldConfig::crawler();
        c.groups.push(WorldConfig::tentacles().groups[0]);
        assert_eq!(c.validate(), Err(ConfigError::MixedBodyDrive));
        let mut c = WorldConfig::crawler();
        c.groups.push(c.groups[0]);
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn bad_pursuit_surfaces() {
        let mut c = WorldConfig::tentacles();
        c.pursuit.decay = -0.5;
        assert!(matches!(c.validate(), Err(ConfigError::Pursuit { field: "decay", .. })));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let json = r#"{
            "groups": [{
                "count": 3,
                "joints": { "min": 4, "max": 4 },
                "rest_length": { "min": 10.0, "max": 10.0 },
                "gait": { "gait": "reaching", "smoothing": 0.2, "wobble_amplitude": 4.0, "wobble_frequency": 1.0 }
            }]
        }"#;
        let c: WorldConfig = serde_json::from_str(json).unwrap();
        assert_eq!(c.profile, SpeedProfile::Normal);
        assert_eq!(c.groups[0].iterations, 3);
        assert_eq!(c.pursuit, PursuitParams::default());
        assert!(matches!(c.groups[0].gait, GaitSpec::Reaching(p) if p.smoothing == 0.2));
        assert_eq!(c.validate(), Ok(()));
    }
}
