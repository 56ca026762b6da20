use serde::Serialize;
use tracing::warn;

use super::domain::{Milestone, SchemeId, Stage};

/// Rendering hint for one stage of the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageMarker {
    pub key: &'static str,
    pub label: &'static str,
    pub position: usize,
    pub reached: bool,
    pub current: bool,
}

/// Projection of an externally supplied stage over the fixed stage list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub scheme: SchemeId,
    pub current_stage: String,
    pub current_index: Option<usize>,
    pub stages: Vec<StageMarker>,
    pub milestones: Vec<Milestone>,
}

/// Marks every stage up to and including `current_key` as reached. An
/// unknown key reaches nothing.
pub fn stage_markers(stages: &[Stage], current_key: &str) -> Vec<StageMarker> {
    let current_index = stages.iter().position(|stage| stage.key == current_key);

    stages
        .iter()
        .enumerate()
        .map(|(position, stage)| StageMarker {
            key: stage.key,
            label: stage.label,
            position,
            reached: current_index.map_or(false, |current| position <= current),
            current: current_index == Some(position),
        })
        .collect()
}

impl StatusView {
    pub fn project(
        scheme: SchemeId,
        stages: &[Stage],
        current_key: &str,
        milestones: &[Milestone],
    ) -> Self {
        let current_index = stages.iter().position(|stage| stage.key == current_key);
        if current_index.is_none() {
            warn!(%scheme, stage = current_key, "status source reported an unknown stage");
        }

        Self {
            scheme,
            current_stage: current_key.to_string(),
            current_index,
            stages: stage_markers(stages, current_key),
            milestones: milestones.to_vec(),
        }
    }

    pub fn reached_count(&self) -> usize {
        self.stages.iter().filter(|marker| marker.reached).count()
    }
}
