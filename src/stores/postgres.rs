use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Course, CourseRecency, CourseScore, NewRecommendationSet, PublicationStatus,
    RecommendationSet,
};
use crate::stores::{ActivityStore, CatalogStore, RecommendationStore};

/// PostgreSQL adapter implementing every storage port on one pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CourseRecord {
    id: String,
    org_id: Uuid,
    title: String,
    subject: Option<String>,
    duration: Option<String>,
    age_group: Option<String>,
    status: String,
    icon: Option<String>,
}

impl CourseRecord {
    fn into_domain(self) -> Course {
        Course {
            id: self.id,
            org_id: self.org_id,
            title: self.title,
            subject: self.subject,
            duration: self.duration,
            age_group: self.age_group,
            status: PublicationStatus::from_db(&self.status),
            icon: self.icon,
        }
    }
}

#[derive(FromRow)]
struct CourseScoreRecord {
    course_id: String,
    lowest_score: i32,
}

#[derive(FromRow)]
struct CourseRecencyRecord {
    course_id: String,
    last_completed_at: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct RecommendationSetRecord {
    id: Uuid,
    student_id: Uuid,
    course_ids: Vec<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl RecommendationSetRecord {
    fn into_domain(self) -> RecommendationSet {
        RecommendationSet {
            id: self.id,
            student_id: self.student_id,
            course_ids: self.course_ids,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn published_courses(
        &self,
        org_id: Uuid,
        exclude: &HashSet<String>,
    ) -> AppResult<Vec<Course>> {
        let excluded: Vec<String> = exclude.iter().cloned().collect();

        let records = sqlx::query_as::<_, CourseRecord>(
            r#"
            SELECT id, org_id, title, subject, duration, age_group, status, icon
            FROM courses
            WHERE org_id = $1
              AND status = 'published'
              AND NOT (id = ANY($2))
            "#,
        )
        .bind(org_id)
        .bind(&excluded)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(CourseRecord::into_domain).collect())
    }

    async fn courses_by_ids(&self, org_id: Uuid, ids: &[String]) -> AppResult<Vec<Course>> {
        let records = sqlx::query_as::<_, CourseRecord>(
            r#"
            SELECT id, org_id, title, subject, duration, age_group, status, icon
            FROM courses
            WHERE org_id = $1
              AND status = 'published'
              AND id = ANY($2)
            "#,
        )
        .bind(org_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(CourseRecord::into_domain).collect())
    }
}

#[async_trait]
impl ActivityStore for PgStore {
    async fn weakest_courses(
        &self,
        student_id: Uuid,
        threshold: i32,
    ) -> AppResult<Vec<CourseScore>> {
        let records = sqlx::query_as::<_, CourseScoreRecord>(
            r#"
            SELECT course_id, MIN(score) AS lowest_score
            FROM activity_records
            WHERE student_id = $1 AND score IS NOT NULL
            GROUP BY course_id
            HAVING MIN(score) < $2
            ORDER BY MIN(score) ASC
            "#,
        )
        .bind(student_id)
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|r| CourseScore {
                course_id: r.course_id,
                lowest_score: r.lowest_score,
            })
            .collect())
    }

    async fn courses_by_recency(&self, student_id: Uuid) -> AppResult<Vec<CourseRecency>> {
        let records = sqlx::query_as::<_, CourseRecencyRecord>(
            r#"
            SELECT course_id, MAX(completed_at) AS last_completed_at
            FROM activity_records
            WHERE student_id = $1
            GROUP BY course_id
            ORDER BY MAX(completed_at) ASC NULLS FIRST
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|r| CourseRecency {
                course_id: r.course_id,
                last_completed_at: r.last_completed_at,
            })
            .collect())
    }

    async fn attempted_course_ids(&self, student_id: Uuid) -> AppResult<HashSet<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT course_id FROM activity_records WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }
}

#[async_trait]
impl RecommendationStore for PgStore {
    async fn latest_valid_set(
        &self,
        student_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<RecommendationSet>> {
        let record = sqlx::query_as::<_, RecommendationSetRecord>(
            r#"
            SELECT id, student_id, course_ids, created_at, expires_at
            FROM recommendation_sets
            WHERE student_id = $1 AND expires_at > $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(student_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(RecommendationSetRecord::into_domain))
    }

    /// A single INSERT is the whole transaction; the tier reads that
    /// produced `set` run outside it. Concurrent generation for the
    /// same student can therefore insert duplicate rows, which is
    /// tolerated: reads always take the newest non-expired row, so a
    /// loser of the race is never read again (see DESIGN.md).
    async fn insert_set(&self, set: NewRecommendationSet) -> AppResult<RecommendationSet> {
        let record = sqlx::query_as::<_, RecommendationSetRecord>(
            r#"
            INSERT INTO recommendation_sets (student_id, course_ids, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, student_id, course_ids, created_at, expires_at
            "#,
        )
        .bind(set.student_id)
        .bind(&set.course_ids)
        .bind(set.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into_domain())
    }

    async fn replace_course_ids(&self, set_id: Uuid, course_ids: &[String]) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE recommendation_sets SET course_ids = $2 WHERE id = $1")
                .bind(set_id)
                .bind(course_ids)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Recommendation set {} not found",
                set_id
            )));
        }

        Ok(())
    }
}
