use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Named speed profile selected by the host; never computed by the simulation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedProfile {
    Slow,
    #[default]
    Normal,
    Fast,
}

/// Gains fixed by a profile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProfileGains {
    pub body_gain: f32,  // fraction of the remaining distance the body covers per frame
    pub step_speed: f32, // stepping progress per frame
    pub phase_rate: f32, // shared gait phase advance per frame
}

impl SpeedProfile {
    pub const ALL: [SpeedProfile; 3] = [SpeedProfile::Slow, SpeedProfile::Normal, SpeedProfile::Fast];

    pub fn gains(self) -> ProfileGains {
        match self {
            SpeedProfile::Slow   => ProfileGains { body_gain: 0.02, step_speed: 0.05, phase_rate: 0.01 },
            SpeedProfile::Normal => ProfileGains { body_gain: 0.05, step_speed: 0.10, phase_rate: 0.02 },
            SpeedProfile::Fast   => ProfileGains { body_gain: 0.10, step_speed: 0.20, phase_rate: 0.04 },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpeedProfile::Slow => "slow",
            SpeedProfile::Normal => "normal",
            SpeedProfile::Fast => "fast",
        }
    }
}

impl fmt::Display for SpeedProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for SpeedProfile {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(SpeedProfile::Slow),
            "normal" => Ok(SpeedProfile::Normal),
            "fast" => Ok(SpeedProfile::Fast),
            _ => Err(ConfigError::UnknownProfile(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faster_profiles_have_larger_gains() {
        let [s, n, f] = SpeedProfile::ALL.map(|p| p.gains());
        assert!(s.body_gain < n.body_gain && n.body_gain < f.body_gain);
        assert!(s.step_speed < n.step_speed && n.step_speed < f.step_speed);
        assert!(s.phase_rate < n.phase_rate && n.phase_rate < f.phase_rate);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("FAST".parse::<SpeedProfile>().ok(), Some(SpeedProfile::Fast));
        assert_eq!(" slow ".parse::<SpeedProfile>().ok(), Some(SpeedProfile::Slow));
        assert!(matches!("warp".parse::<SpeedProfile>(), Err(ConfigError::UnknownProfile(_))));
        for p in SpeedProfile::ALL {
            assert_eq!(p.to_string().parse::<SpeedProfile>().ok(), Some(p));
        }
    }
}
