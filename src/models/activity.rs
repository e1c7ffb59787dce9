use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One attempt by a student at a course
///
/// A student may hold any number of records per course (repeat attempts);
/// the per-course views the selection tiers consume are aggregations over
/// these rows, never a one-row-per-pair assumption.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: String,
    /// 0-100, absent until the attempt is completed
    pub score: Option<i32>,
    /// 0-3
    pub stars: i16,
    pub streak: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Per-course aggregate: the lowest score a student has ever recorded
///
/// Only courses with at least one scored attempt appear in this view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseScore {
    pub course_id: String,
    pub lowest_score: i32,
}

/// Per-course aggregate: the most recent completion timestamp
///
/// `None` means the student started the course but never completed any
/// attempt; such courses sort ahead of everything completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecency {
    pub course_id: String,
    pub last_completed_at: Option<DateTime<Utc>>,
}
