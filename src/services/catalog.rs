use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Course;
use crate::services::eligibility::AgeFilter;
use crate::services::ordering::compare_titles;
use crate::stores::CatalogStore;

/// Catalog query adapter
///
/// Wraps the raw catalog port with the policy every tier query shares:
/// published-only scope per organization, age eligibility, an exclusion
/// set, numeric-aware title ordering, and a limit. Returning fewer than
/// `limit` courses is normal, not an error.
#[derive(Clone)]
pub struct CatalogQuery {
    store: Arc<dyn CatalogStore>,
}

impl CatalogQuery {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Eligible published courses for an organization, title-ordered
    pub async fn find_courses(
        &self,
        org_id: Uuid,
        filter: &AgeFilter,
        exclude: &HashSet<String>,
        limit: usize,
    ) -> AppResult<Vec<Course>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut courses = self.store.published_courses(org_id, exclude).await?;
        courses.retain(|course| filter.admits(course));
        courses.sort_by(|a, b| compare_titles(&a.title, &b.title));
        courses.truncate(limit);

        Ok(courses)
    }

    /// Simple lookup by identifier, published-only and org-scoped
    ///
    /// Identifiers that no longer resolve are silently absent; callers
    /// treat the shortfall as a soft condition.
    pub async fn find_by_ids(&self, org_id: Uuid, ids: &[String]) -> AppResult<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.store.courses_by_ids(org_id, ids).await
    }
}
