use std::sync::Arc;

use chrono::{DateTime, Days, Local, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    is_placeholder_id, Course, NewRecommendationSet, RecommendationItem, RecommendationSlot,
};
use crate::services::catalog::CatalogQuery;
use crate::services::eligibility::AgeFilter;
use crate::services::ordering::compare_titles;
use crate::services::selection::{TieredSelector, TARGET_SLOTS};
use crate::stores::RecommendationStore;

/// The daily recommendation engine
///
/// Serves the cache-or-generate protocol: one non-expired recommendation
/// set per student per calendar day, generated lazily on the first read
/// and resolved back into display items on every read.
pub struct RecommendationService {
    selector: TieredSelector,
    catalog: CatalogQuery,
    sets: Arc<dyn RecommendationStore>,
}

impl RecommendationService {
    pub fn new(
        selector: TieredSelector,
        catalog: CatalogQuery,
        sets: Arc<dyn RecommendationStore>,
    ) -> Self {
        Self {
            selector,
            catalog,
            sets,
        }
    }

    /// Returns today's six recommendations for a student
    ///
    /// On a cache hit the stored identifiers are resolved against the
    /// catalog; identifiers that no longer resolve are dropped and the
    /// gap padded, without rewriting the stored row. On a miss the
    /// tiered selection runs and a new set is persisted with its
    /// expiration at the start of the next local calendar day.
    pub async fn daily_for_student(
        &self,
        student_id: Uuid,
        org_id: Uuid,
        age: i32,
    ) -> AppResult<Vec<RecommendationItem>> {
        let now = Utc::now();

        if let Some(set) = self.sets.latest_valid_set(student_id, now).await? {
            tracing::debug!(
                student_id = %student_id,
                set_id = %set.id,
                "Recommendation cache hit"
            );
            let mut courses = self.catalog.find_by_ids(org_id, &set.course_ids).await?;
            // A stored row never legitimately holds more than six ids,
            // but the returned list must be capped either way
            courses.sort_by(|a, b| compare_titles(&a.title, &b.title));
            courses.truncate(TARGET_SLOTS);
            return Ok(finalize(pad_to_target(courses)));
        }

        tracing::debug!(student_id = %student_id, "Recommendation cache miss; generating");

        let filter = AgeFilter::for_age(age);
        let picks = self.selector.select(student_id, org_id, &filter).await?;

        // Placeholders never reach storage; only genuine catalog ids do
        let course_ids: Vec<String> = picks.iter().map(|c| c.id.clone()).collect();
        let set = self
            .sets
            .insert_set(NewRecommendationSet {
                student_id,
                course_ids,
                expires_at: next_day_start(Local::now()),
            })
            .await?;

        tracing::info!(
            student_id = %student_id,
            set_id = %set.id,
            courses = set.course_ids.len(),
            "Generated daily recommendations"
        );

        Ok(finalize(pad_to_target(picks)))
    }

    /// Replaces the stored course list of an existing set
    ///
    /// Corrective administration only; the expiration is untouched.
    /// Placeholder identifiers are stripped before writing, and a list
    /// longer than six is rejected so a stored set never exceeds the
    /// daily cardinality.
    pub async fn replace_set_courses(
        &self,
        set_id: Uuid,
        course_ids: Vec<String>,
    ) -> AppResult<()> {
        let genuine: Vec<String> = course_ids
            .into_iter()
            .filter(|id| !is_placeholder_id(id))
            .collect();

        if genuine.len() > TARGET_SLOTS {
            return Err(AppError::InvalidInput(format!(
                "A recommendation set holds at most {} courses, got {}",
                TARGET_SLOTS,
                genuine.len()
            )));
        }

        self.sets.replace_course_ids(set_id, &genuine).await?;

        tracing::info!(set_id = %set_id, courses = genuine.len(), "Recommendation set replaced");
        Ok(())
    }
}

/// Pads a pick list with numbered placeholders up to the target length
pub fn pad_to_target(picks: Vec<Course>) -> Vec<RecommendationSlot> {
    let mut slots: Vec<RecommendationSlot> =
        picks.into_iter().map(RecommendationSlot::Course).collect();

    let mut ordinal = 1;
    while slots.len() < TARGET_SLOTS {
        slots.push(RecommendationSlot::Placeholder { ordinal });
        ordinal += 1;
    }

    slots
}

/// Applies the stable display order and assigns positions 1..6
///
/// Tier priority decides which courses are chosen; the returned list is
/// always alphabetical by title regardless of that priority.
pub fn finalize(mut slots: Vec<RecommendationSlot>) -> Vec<RecommendationItem> {
    slots.sort_by(|a, b| compare_titles(a.title(), b.title()));

    slots
        .iter()
        .enumerate()
        .map(|(i, slot)| RecommendationItem::from_slot(i as u8 + 1, slot))
        .collect()
}

/// Start of the calendar day after `now`, in the local timezone
///
/// Falls back to now-plus-24h on calendar edge cases rather than failing
/// generation.
fn next_day_start(now: DateTime<Local>) -> DateTime<Utc> {
    now.date_naive()
        .checked_add_days(Days::new(1))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| (now + chrono::Duration::days(1)).with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PublicationStatus, RecommendationSet, PLACEHOLDER_TITLE};
    use crate::stores::{
        MockActivityStore, MockCatalogStore, MockRecommendationStore,
    };
    use chrono::Timelike;
    use std::collections::HashSet;

    fn course(id: &str, title: &str) -> Course {
        Course {
            id: id.to_string(),
            org_id: Uuid::nil(),
            title: title.to_string(),
            subject: None,
            duration: None,
            age_group: None,
            status: PublicationStatus::Published,
            icon: None,
        }
    }

    fn catalog_mock(pool: Vec<Course>) -> MockCatalogStore {
        let mut mock = MockCatalogStore::new();
        let for_query = pool.clone();
        mock.expect_published_courses().returning(move |_, exclude| {
            Ok(for_query
                .iter()
                .filter(|c| !exclude.contains(&c.id))
                .cloned()
                .collect())
        });
        mock.expect_courses_by_ids().returning(move |_, ids| {
            Ok(pool
                .iter()
                .filter(|c| ids.contains(&c.id))
                .cloned()
                .collect())
        });
        mock
    }

    fn empty_activity_mock() -> MockActivityStore {
        let mut mock = MockActivityStore::new();
        mock.expect_weakest_courses().returning(|_, _| Ok(vec![]));
        mock.expect_courses_by_recency().returning(|_| Ok(vec![]));
        mock.expect_attempted_course_ids()
            .returning(|_| Ok(HashSet::new()));
        mock
    }

    fn service(
        pool: Vec<Course>,
        sets: MockRecommendationStore,
    ) -> RecommendationService {
        let catalog_store = Arc::new(catalog_mock(pool));
        RecommendationService::new(
            TieredSelector::new(
                CatalogQuery::new(catalog_store.clone()),
                Arc::new(empty_activity_mock()),
            ),
            CatalogQuery::new(catalog_store),
            Arc::new(sets),
        )
    }

    fn stored_set(course_ids: Vec<&str>) -> RecommendationSet {
        RecommendationSet {
            id: Uuid::new_v4(),
            student_id: Uuid::nil(),
            course_ids: course_ids.into_iter().map(str::to_string).collect(),
            created_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::hours(6),
        }
    }

    #[tokio::test]
    async fn test_cache_hit_resolves_without_persisting() {
        let mut sets = MockRecommendationStore::new();
        let set = stored_set(vec!["a", "b"]);
        sets.expect_latest_valid_set()
            .returning(move |_, _| Ok(Some(set.clone())));
        // No insert or replace expectation: any write would panic

        let service = service(vec![course("a", "Alpha"), course("b", "Beta")], sets);
        let items = service
            .daily_for_student(Uuid::nil(), Uuid::nil(), 8)
            .await
            .unwrap();

        assert_eq!(items.len(), 6);
        assert_eq!(items.iter().filter(|i| !i.placeholder).count(), 2);
    }

    #[tokio::test]
    async fn test_cache_hit_drops_dangling_ids_and_pads() {
        let mut sets = MockRecommendationStore::new();
        let set = stored_set(vec!["a", "vanished"]);
        sets.expect_latest_valid_set()
            .returning(move |_, _| Ok(Some(set.clone())));

        let service = service(vec![course("a", "Alpha")], sets);
        let items = service
            .daily_for_student(Uuid::nil(), Uuid::nil(), 8)
            .await
            .unwrap();

        assert_eq!(items.len(), 6);
        assert_eq!(items.iter().filter(|i| !i.placeholder).count(), 1);
        assert!(!items.iter().any(|i| i.course_id == "vanished"));
    }

    #[tokio::test]
    async fn test_cache_miss_persists_only_genuine_ids() {
        let mut sets = MockRecommendationStore::new();
        sets.expect_latest_valid_set().returning(|_, _| Ok(None));
        sets.expect_insert_set()
            .withf(|new: &NewRecommendationSet| {
                new.course_ids.len() == 2
                    && new.course_ids.iter().all(|id| !is_placeholder_id(id))
            })
            .returning(|new| {
                Ok(RecommendationSet {
                    id: Uuid::new_v4(),
                    student_id: new.student_id,
                    course_ids: new.course_ids,
                    created_at: Utc::now(),
                    expires_at: new.expires_at,
                })
            });

        // Only two courses exist, so four placeholders pad the result
        let service = service(vec![course("a", "Alpha"), course("b", "Beta")], sets);
        let items = service
            .daily_for_student(Uuid::nil(), Uuid::nil(), 8)
            .await
            .unwrap();

        assert_eq!(items.len(), 6);
        assert_eq!(items.iter().filter(|i| i.placeholder).count(), 4);
    }

    #[tokio::test]
    async fn test_replace_strips_placeholder_ids() {
        let mut sets = MockRecommendationStore::new();
        sets.expect_replace_course_ids()
            .withf(|_, ids: &[String]| ids == ["a".to_string(), "b".to_string()].as_slice())
            .returning(|_, _| Ok(()));

        let service = service(vec![], sets);
        service
            .replace_set_courses(
                Uuid::nil(),
                vec![
                    "a".to_string(),
                    "placeholder:1".to_string(),
                    "b".to_string(),
                ],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_replace_rejects_more_than_six_courses() {
        // No replace expectation: any write would panic
        let sets = MockRecommendationStore::new();
        let service = service(vec![], sets);

        let ids: Vec<String> = (1..=7).map(|i| format!("c{}", i)).collect();
        let result = service.replace_set_courses(Uuid::nil(), ids).await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_cache_hit_caps_oversized_stored_sets() {
        let mut sets = MockRecommendationStore::new();
        let set = stored_set(vec!["a", "b", "c", "d", "e", "f", "g"]);
        sets.expect_latest_valid_set()
            .returning(move |_, _| Ok(Some(set.clone())));

        let pool = vec![
            course("a", "Alpha"),
            course("b", "Bravo"),
            course("c", "Charlie"),
            course("d", "Delta"),
            course("e", "Echo"),
            course("f", "Foxtrot"),
            course("g", "Golf"),
        ];
        let service = service(pool, sets);
        let items = service
            .daily_for_student(Uuid::nil(), Uuid::nil(), 8)
            .await
            .unwrap();

        // The alphabetically first six survive; the seventh is dropped
        assert_eq!(items.len(), 6);
        assert!(items.iter().all(|i| !i.placeholder));
        assert!(!items.iter().any(|i| i.course_id == "g"));
    }

    #[test]
    fn test_pad_to_target_numbers_placeholders() {
        let slots = pad_to_target(vec![course("a", "Alpha")]);
        assert_eq!(slots.len(), TARGET_SLOTS);
        assert_eq!(
            slots
                .iter()
                .filter(|s| s.is_placeholder())
                .count(),
            5
        );

        let items = finalize(slots);
        let mut placeholder_ids: Vec<&str> = items
            .iter()
            .filter(|i| i.placeholder)
            .map(|i| i.course_id.as_str())
            .collect();
        let before = placeholder_ids.len();
        placeholder_ids.sort();
        placeholder_ids.dedup();
        assert_eq!(placeholder_ids.len(), before);
    }

    #[test]
    fn test_finalize_sorts_by_title_and_reindexes() {
        let slots = vec![
            RecommendationSlot::Course(course("g", "Geometry")),
            RecommendationSlot::Course(course("c10", "Course 10")),
            RecommendationSlot::Course(course("c2", "Course 2")),
        ];

        let items = finalize(slots);
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Course 2", "Course 10", "Geometry"]);
        let positions: Vec<u8> = items.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_finalize_sorts_placeholders_by_their_title() {
        let items = finalize(pad_to_target(vec![course("z", "Zebras")]));
        // "No Course Available" sorts ahead of "Zebras"
        assert_eq!(items[0].title, PLACEHOLDER_TITLE);
        assert_eq!(items[5].title, "Zebras");
    }

    #[test]
    fn test_next_day_start_is_local_midnight_tomorrow() {
        let now = Local::now();
        let expiry = next_day_start(now).with_timezone(&Local);

        assert!(expiry > now);
        assert_eq!(
            expiry.date_naive(),
            now.date_naive().checked_add_days(Days::new(1)).unwrap()
        );
        assert_eq!(expiry.hour(), 0);
        assert_eq!(expiry.minute(), 0);
        assert_eq!(expiry.second(), 0);
    }
}
