//! Storage ports consumed by the recommendation engine.
//!
//! The engine core depends only on these traits; `PgStore` is the
//! PostgreSQL adapter implementing all three against `sqlx`.

pub mod postgres;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Course, CourseRecency, CourseScore, NewRecommendationSet, RecommendationSet};

pub use postgres::PgStore;

/// Read access to the course catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All published courses for an organization, minus `exclude`.
    ///
    /// Ordering is not guaranteed here; callers apply the display order.
    async fn published_courses(
        &self,
        org_id: Uuid,
        exclude: &HashSet<String>,
    ) -> AppResult<Vec<Course>>;

    /// Published courses matching the given identifiers, for an
    /// organization. Identifiers that no longer resolve are silently
    /// absent from the result.
    async fn courses_by_ids(&self, org_id: Uuid, ids: &[String]) -> AppResult<Vec<Course>>;
}

/// Read access to a student's activity history, aggregated per course
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Courses where the student's lowest recorded score is below
    /// `threshold`, ordered by that score ascending (weakest first).
    async fn weakest_courses(
        &self,
        student_id: Uuid,
        threshold: i32,
    ) -> AppResult<Vec<CourseScore>>;

    /// Every course the student has attempted, ordered by most recent
    /// completion ascending with never-completed courses first.
    async fn courses_by_recency(&self, student_id: Uuid) -> AppResult<Vec<CourseRecency>>;

    /// Distinct identifiers of every course the student has ever started
    async fn attempted_course_ids(&self, student_id: Uuid) -> AppResult<HashSet<String>>;
}

/// Persistence for daily recommendation sets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// The most recently created set for the student whose expiration is
    /// strictly after `now`, if any.
    async fn latest_valid_set(
        &self,
        student_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<RecommendationSet>>;

    /// Inserts a freshly generated set and returns the stored row
    async fn insert_set(&self, set: NewRecommendationSet) -> AppResult<RecommendationSet>;

    /// Replaces the course-identifier list of an existing set without
    /// touching its expiration. Errors with `NotFound` if no such set.
    async fn replace_course_ids(&self, set_id: Uuid, course_ids: &[String]) -> AppResult<()>;
}
