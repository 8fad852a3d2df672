use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::goal::GoalNumber;
use crate::error::CoreError;

/// Highest relevance score a provider may assign.
pub const MAX_SCORE: u8 = 100;

/// A validated (goal, score, justification) triple produced by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImpactCandidate {
    pub goal_number: GoalNumber,
    pub score: u8,
    pub justification: String,
}

impl ImpactCandidate {
    /// Validate raw provider values. Out-of-range values are rejected, never clamped.
    pub fn new(
        goal_number: i64,
        score: i64,
        justification: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let goal_number = GoalNumber::new(goal_number)?;
        if !(0..=MAX_SCORE as i64).contains(&score) {
            return Err(CoreError::InvalidScore(score));
        }
        Ok(Self {
            goal_number,
            score: score as u8,
            justification: justification.into(),
        })
    }
}

/// A scored association between one activity and one goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Impact {
    pub activity_id: Uuid,
    pub goal_number: GoalNumber,
    pub score: u8,
    pub justification: String,
    pub created_at: jiff::Timestamp,
}

impl Impact {
    /// Build the full impact set for one activity.
    ///
    /// At most one row per goal: the first candidate for a goal wins.
    pub fn from_candidates(
        activity_id: Uuid,
        candidates: &[ImpactCandidate],
        now: jiff::Timestamp,
    ) -> Vec<Impact> {
        let mut seen = HashSet::new();
        candidates
            .iter()
            .filter(|c| seen.insert(c.goal_number))
            .map(|c| Impact {
                activity_id,
                goal_number: c.goal_number,
                score: c.score,
                justification: c.justification.clone(),
                created_at: now,
            })
            .collect()
    }
}
