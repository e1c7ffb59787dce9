use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Course;
use crate::services::catalog::CatalogQuery;
use crate::services::eligibility::AgeFilter;
use crate::stores::ActivityStore;

/// Number of courses a daily recommendation always contains
pub const TARGET_SLOTS: usize = 6;

/// Scores below this mark a course as remedial material
pub const PASSING_SCORE: i32 = 70;

/// Maximum picks contributed by the remedial tier
const REMEDIAL_CAP: usize = 2;

/// Maximum picks contributed by the stale-content tier
const STALE_CAP: usize = 2;

/// The tiered selection policy
///
/// Assembles up to six courses from four ordered tiers: remedial (weak
/// scores), stale (longest since completion), novel (never attempted),
/// and fallback (anything eligible). A `used` set threads through the
/// tiers so no course is ever picked twice; each tier is pure given its
/// inputs and the set accumulated so far.
pub struct TieredSelector {
    catalog: CatalogQuery,
    activity: Arc<dyn ActivityStore>,
}

impl TieredSelector {
    pub fn new(catalog: CatalogQuery, activity: Arc<dyn ActivityStore>) -> Self {
        Self { catalog, activity }
    }

    /// Selects up to six courses for the student
    ///
    /// Returns fewer than six when the eligible catalog is exhausted;
    /// padding is the caller's concern.
    pub async fn select(
        &self,
        student_id: Uuid,
        org_id: Uuid,
        filter: &AgeFilter,
    ) -> AppResult<Vec<Course>> {
        let mut picks: Vec<Course> = Vec::with_capacity(TARGET_SLOTS);
        let mut used: HashSet<String> = HashSet::new();

        let remedial = self.remedial_tier(student_id, org_id, filter, &used).await?;
        take_picks(&mut picks, &mut used, remedial);

        if picks.len() < TARGET_SLOTS {
            let stale = self.stale_tier(student_id, org_id, filter, &used).await?;
            take_picks(&mut picks, &mut used, stale);
        }

        if picks.len() < TARGET_SLOTS {
            let remaining = TARGET_SLOTS - picks.len();
            let novel = self
                .novel_tier(student_id, org_id, filter, &used, remaining)
                .await?;
            take_picks(&mut picks, &mut used, novel);
        }

        if picks.len() < TARGET_SLOTS {
            let remaining = TARGET_SLOTS - picks.len();
            let fallback = self
                .catalog
                .find_courses(org_id, filter, &used, remaining)
                .await?;
            take_picks(&mut picks, &mut used, fallback);
        }

        tracing::debug!(
            student_id = %student_id,
            selected = picks.len(),
            "Tiered selection finished"
        );

        Ok(picks)
    }

    /// Tier 1: courses the student scored below passing, weakest first
    async fn remedial_tier(
        &self,
        student_id: Uuid,
        org_id: Uuid,
        filter: &AgeFilter,
        used: &HashSet<String>,
    ) -> AppResult<Vec<Course>> {
        let weak = self
            .activity
            .weakest_courses(student_id, PASSING_SCORE)
            .await?;

        let ordered_ids: Vec<String> = weak.into_iter().map(|w| w.course_id).collect();
        self.resolve_ordered(org_id, filter, used, ordered_ids, REMEDIAL_CAP)
            .await
    }

    /// Tier 2: attempted courses by most recent completion, oldest first
    ///
    /// Never-completed attempts sort ahead of everything completed, so a
    /// course that was merely started ranks as maximally stale.
    async fn stale_tier(
        &self,
        student_id: Uuid,
        org_id: Uuid,
        filter: &AgeFilter,
        used: &HashSet<String>,
    ) -> AppResult<Vec<Course>> {
        let attempted = self.activity.courses_by_recency(student_id).await?;

        let ordered_ids: Vec<String> = attempted.into_iter().map(|a| a.course_id).collect();
        let cap = STALE_CAP.min(TARGET_SLOTS.saturating_sub(used.len()));
        self.resolve_ordered(org_id, filter, used, ordered_ids, cap)
            .await
    }

    /// Tier 3: courses the student has never attempted, title-ordered
    async fn novel_tier(
        &self,
        student_id: Uuid,
        org_id: Uuid,
        filter: &AgeFilter,
        used: &HashSet<String>,
        limit: usize,
    ) -> AppResult<Vec<Course>> {
        let attempted = self.activity.attempted_course_ids(student_id).await?;

        let mut exclude = used.clone();
        exclude.extend(attempted);

        self.catalog
            .find_courses(org_id, filter, &exclude, limit)
            .await
    }

    /// Resolves an ordered id list against the published catalog,
    /// dropping unpublished, ineligible, and already-used courses while
    /// preserving the incoming order.
    async fn resolve_ordered(
        &self,
        org_id: Uuid,
        filter: &AgeFilter,
        used: &HashSet<String>,
        ordered_ids: Vec<String>,
        cap: usize,
    ) -> AppResult<Vec<Course>> {
        let candidate_ids: Vec<String> = ordered_ids
            .iter()
            .filter(|id| !used.contains(*id))
            .cloned()
            .collect();

        if candidate_ids.is_empty() || cap == 0 {
            return Ok(Vec::new());
        }

        let resolved = self.catalog.find_by_ids(org_id, &candidate_ids).await?;
        let mut by_id: HashMap<String, Course> = resolved
            .into_iter()
            .map(|course| (course.id.clone(), course))
            .collect();

        let mut picks = Vec::with_capacity(cap);
        for id in candidate_ids {
            if picks.len() == cap {
                break;
            }
            if let Some(course) = by_id.remove(&id) {
                if filter.admits(&course) {
                    picks.push(course);
                }
            }
        }

        Ok(picks)
    }
}

fn take_picks(picks: &mut Vec<Course>, used: &mut HashSet<String>, tier: Vec<Course>) {
    for course in tier {
        if picks.len() == TARGET_SLOTS {
            break;
        }
        if used.insert(course.id.clone()) {
            picks.push(course);
        }
    }
}
