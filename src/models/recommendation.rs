use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::course::{Course, DEFAULT_DURATION, DEFAULT_ICON, DEFAULT_SUBJECT};

/// Sentinel prefix marking synthetic padding entries; never written to
/// storage and never a valid catalog identifier.
pub const PLACEHOLDER_ID_PREFIX: &str = "placeholder:";

/// Title shown for a padding entry
pub const PLACEHOLDER_TITLE: &str = "No Course Available";

/// Returns true if `id` names a synthetic padding entry
pub fn is_placeholder_id(id: &str) -> bool {
    id.starts_with(PLACEHOLDER_ID_PREFIX)
}

/// The cached daily recommendation output for one student
///
/// At most one non-expired set per student is ever read; superseded sets
/// stay in storage as an audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationSet {
    pub id: Uuid,
    pub student_id: Uuid,
    /// Genuine course identifiers only; placeholders are never persisted
    pub course_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A recommendation set about to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecommendationSet {
    pub student_id: Uuid,
    pub course_ids: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

/// One of the six slots in a daily result, before display resolution
///
/// Padding is explicit in the type: a slot either carries a genuine
/// catalog course or is a numbered placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationSlot {
    Course(Course),
    Placeholder { ordinal: usize },
}

impl RecommendationSlot {
    pub fn title(&self) -> &str {
        match self {
            RecommendationSlot::Course(course) => &course.title,
            RecommendationSlot::Placeholder { .. } => PLACEHOLDER_TITLE,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, RecommendationSlot::Placeholder { .. })
    }
}

/// A resolved, display-ready recommendation
///
/// Positions are assigned at read time after the final title sort; they
/// are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
    pub position: u8,
    pub course_id: String,
    pub title: String,
    pub difficulty: String,
    pub estimated_time: String,
    pub subject: String,
    pub icon: String,
    pub placeholder: bool,
}

impl RecommendationItem {
    /// Resolves a slot into its display form at the given position
    pub fn from_slot(position: u8, slot: &RecommendationSlot) -> Self {
        match slot {
            RecommendationSlot::Course(course) => RecommendationItem {
                position,
                course_id: course.id.clone(),
                title: course.title.clone(),
                // Difficulty is not derived yet; every pick reports Medium
                difficulty: "Medium".to_string(),
                estimated_time: course.duration_label(),
                subject: course.subject_label(),
                icon: course.icon_label(),
                placeholder: false,
            },
            RecommendationSlot::Placeholder { ordinal } => RecommendationItem {
                position,
                course_id: format!("{}{}", PLACEHOLDER_ID_PREFIX, ordinal),
                title: PLACEHOLDER_TITLE.to_string(),
                difficulty: "Medium".to_string(),
                estimated_time: DEFAULT_DURATION.to_string(),
                subject: DEFAULT_SUBJECT.to_string(),
                icon: DEFAULT_ICON.to_string(),
                placeholder: true,
            },
        }
    }
}
