use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::goal::GoalNumber;
use crate::error::CoreError;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// Benchmarking data for an institution's performance on one goal in one year.
///
/// Independent of activities and impacts; ingested separately. At most one
/// metric exists per (institution, year, goal).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstitutionMetric {
    pub id: Uuid,
    pub institution: String,
    pub year: i32,
    pub goal_number: GoalNumber,
    pub score: f64,
    pub total_activities: u32,
}

/// Client input for recording a metric. The id is always assigned here.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewMetric {
    pub institution: String,
    pub year: i32,
    pub goal_number: GoalNumber,
    pub score: f64,
    #[serde(default)]
    pub total_activities: u32,
}

impl InstitutionMetric {
    /// Build a validated metric with a fresh id.
    pub fn create(input: NewMetric) -> Result<Self, CoreError> {
        let metric = Self {
            id: Uuid::new_v4(),
            institution: input.institution.trim().to_string(),
            year: input.year,
            goal_number: input.goal_number,
            score: input.score,
            total_activities: input.total_activities,
        };
        metric.validate()?;
        Ok(metric)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.institution.trim().is_empty() {
            return Err(CoreError::MissingField("institution".to_string()));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(CoreError::OutOfRange {
                field: "year".to_string(),
                message: format!("{} not in {MIN_YEAR}..={MAX_YEAR}", self.year),
            });
        }
        if !self.score.is_finite() || !(0.0..=100.0).contains(&self.score) {
            return Err(CoreError::OutOfRange {
                field: "score".to_string(),
                message: format!("{} not in 0..=100", self.score),
            });
        }
        Ok(())
    }

    /// Same institution (case-insensitive), year and goal.
    pub fn same_slot(&self, other: &InstitutionMetric) -> bool {
        self.year == other.year
            && self.goal_number == other.goal_number
            && self.institution.eq_ignore_ascii_case(&other.institution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(year: i32, score: f64) -> NewMetric {
        NewMetric {
            institution: " Strathmore University ".to_string(),
            year,
            goal_number: GoalNumber::new(4).unwrap(),
            score,
            total_activities: 0,
        }
    }

    #[test]
    fn create_checks_ranges() {
        let metric = InstitutionMetric::create(input(2024, 71.5)).unwrap();
        assert_eq!(metric.institution, "Strathmore University");
        assert!(InstitutionMetric::create(input(1999, 50.0)).is_err());
        assert!(InstitutionMetric::create(input(2024, 100.5)).is_err());
        assert!(InstitutionMetric::create(input(2024, f64::NAN)).is_err());
    }

    #[test]
    fn create_assigns_fresh_ids() {
        let a = InstitutionMetric::create(input(2024, 10.0)).unwrap();
        let b = InstitutionMetric::create(input(2024, 10.0)).unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.same_slot(&b));
    }

    #[test]
    fn client_supplied_id_is_ignored() {
        let json = format!(
            r#"{{"id":"{}","institution":"UoN","year":2023,"goal_number":3,"score":40.0}}"#,
            Uuid::new_v4()
        );
        let parsed: NewMetric = serde_json::from_str(&json).unwrap();
        let metric = InstitutionMetric::create(parsed).unwrap();
        assert_eq!(metric.goal_number.get(), 3);
        assert_eq!(metric.total_activities, 0);
    }
}
