use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// A unit of user-submitted university work, scored against the goals.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ActivityCategory,
    pub status: ActivityStatus,
    pub evidence: Option<EvidenceDocument>,
    pub external_url: Option<String>,
    pub author_id: Uuid,
    /// True when the classifier produced at least one impact.
    pub auto_classified: bool,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Activity {
    /// Build a new, unclassified activity from validated input.
    pub fn create(
        author_id: Uuid,
        input: NewActivity,
        now: jiff::Timestamp,
    ) -> Result<Self, CoreError> {
        let input = input.validated()?;
        Ok(Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            category: input.category,
            status: input.status.unwrap_or_default(),
            evidence: None,
            external_url: input.external_url,
            author_id,
            auto_classified: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Empty title or description is rejected.
    pub fn apply(&mut self, update: ActivityUpdate, now: jiff::Timestamp) -> Result<(), CoreError> {
        let title = update.title.map(|t| non_empty("title", t)).transpose()?;
        let description = update
            .description
            .map(|d| non_empty("description", d))
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(url) = update.external_url {
            self.external_url = Some(url);
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Input for creating an activity.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub category: ActivityCategory,
    #[serde(default)]
    pub status: Option<ActivityStatus>,
    #[serde(default)]
    pub external_url: Option<String>,
}

impl NewActivity {
    fn validated(mut self) -> Result<Self, CoreError> {
        self.title = non_empty("title", self.title)?;
        self.description = non_empty("description", self.description)?;
        Ok(self)
    }
}

/// Partial update for an existing activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ActivityUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<ActivityCategory>,
    #[serde(default)]
    pub status: Option<ActivityStatus>,
    #[serde(default)]
    pub external_url: Option<String>,
}

fn non_empty(field: &str, value: String) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::MissingField(field.to_string()));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ActivityCategory {
    Research,
    Project,
    Curriculum,
    Outreach,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 4] = [
        ActivityCategory::Research,
        ActivityCategory::Project,
        ActivityCategory::Curriculum,
        ActivityCategory::Outreach,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityCategory::Research => "research",
            ActivityCategory::Project => "project",
            ActivityCategory::Curriculum => "curriculum",
            ActivityCategory::Outreach => "outreach",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::OutOfRange {
                field: "category".to_string(),
                message: format!("unknown category '{s}'"),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ActivityStatus {
    #[default]
    Active,
    Completed,
    Published,
}

/// Supporting evidence attached to an activity.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvidenceDocument {
    pub filename: String,
    /// Object key of the stored document.
    pub key: String,
    pub content_type: Option<String>,
    pub size: u64,
}
