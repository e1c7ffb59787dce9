use crate::models::{Course, ParsedAgeRange};

/// Oldest age the filter accepts as plausible input
const MAX_PLAUSIBLE_AGE: i32 = 150;

/// Age eligibility filter applied to catalog candidates
///
/// Built once per request from the caller-supplied age. An implausible
/// age disables filtering entirely rather than failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeFilter {
    age: Option<u32>,
}

impl AgeFilter {
    /// Creates a filter for the given student age
    ///
    /// Ages outside 0..=150 disable the filter for the whole request and
    /// log a warning; every course is then admitted.
    pub fn for_age(age: i32) -> Self {
        if (0..=MAX_PLAUSIBLE_AGE).contains(&age) {
            Self {
                age: Some(age as u32),
            }
        } else {
            tracing::warn!(age, "Implausible student age; disabling age filter");
            Self { age: None }
        }
    }

    /// A filter that admits everything
    pub fn disabled() -> Self {
        Self { age: None }
    }

    /// Whether this course's age-group range admits the student
    ///
    /// Courses with no restriction or a malformed range are always
    /// admitted; a bad catalog value never excludes a course.
    pub fn admits(&self, course: &Course) -> bool {
        let Some(age) = self.age else {
            return true;
        };

        match course.age_range() {
            ParsedAgeRange::Range(range) => range.contains(age),
            ParsedAgeRange::Unrestricted | ParsedAgeRange::Malformed => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PublicationStatus;
    use uuid::Uuid;

    fn course_with_age_group(age_group: Option<&str>) -> Course {
        Course {
            id: "crs-1".to_string(),
            org_id: Uuid::new_v4(),
            title: "Counting".to_string(),
            subject: None,
            duration: None,
            age_group: age_group.map(str::to_string),
            status: PublicationStatus::Published,
            icon: None,
        }
    }

    #[test]
    fn test_in_range_age_is_admitted() {
        let filter = AgeFilter::for_age(7);
        assert!(filter.admits(&course_with_age_group(Some("6-9"))));
    }

    #[test]
    fn test_out_of_range_age_is_excluded() {
        let filter = AgeFilter::for_age(10);
        assert!(!filter.admits(&course_with_age_group(Some("6-9"))));
    }

    #[test]
    fn test_malformed_range_never_excludes() {
        let filter = AgeFilter::for_age(10);
        assert!(filter.admits(&course_with_age_group(Some("abc"))));
    }

    #[test]
    fn test_absent_range_admits_everyone() {
        let filter = AgeFilter::for_age(99);
        assert!(filter.admits(&course_with_age_group(None)));
    }

    #[test]
    fn test_implausible_age_disables_filter() {
        for age in [-1, 151, 9999] {
            let filter = AgeFilter::for_age(age);
            assert!(filter.admits(&course_with_age_group(Some("6-9"))));
        }
    }

    #[test]
    fn test_boundary_ages() {
        assert!(AgeFilter::for_age(0).admits(&course_with_age_group(Some("0-3"))));
        assert!(AgeFilter::for_age(150) == AgeFilter { age: Some(150) });
    }
}
