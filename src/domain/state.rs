//! Worker and mission lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a worker is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkerState {
    #[default]
    #[serde(rename = "resting")]
    Resting,
    #[serde(rename = "loading")]
    Loading,
    #[serde(rename = "onMission")]
    OnMission,
}

impl WorkerState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resting => "resting",
            Self::Loading => "loading",
            Self::OnMission => "onMission",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkerState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resting" => Ok(Self::Resting),
            "loading" => Ok(Self::Loading),
            "onMission" => Ok(Self::OnMission),
            other => anyhow::bail!("Unknown worker state: {other}"),
        }
    }
}

/// Lifecycle of a mission.
///
/// `InProgress` is the only state that accepts further transitions through
/// `failMission`; `endMission` may be repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionState {
    #[default]
    InProgress,
    Finished,
    Failed,
}

impl MissionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Finished => "finished",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }
}

impl fmt::Display for MissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissionState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "finished" => Ok(Self::Finished),
            "failed" => Ok(Self::Failed),
            other => anyhow::bail!("Unknown mission state: {other}"),
        }
    }
}
