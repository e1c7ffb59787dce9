pub mod activity;
pub mod course;
pub mod recommendation;

pub use activity::{ActivityRecord, CourseRecency, CourseScore};
pub use course::{AgeRange, Course, ParsedAgeRange, PublicationStatus};
pub use recommendation::{
    is_placeholder_id, NewRecommendationSet, RecommendationItem, RecommendationSet,
    RecommendationSlot, PLACEHOLDER_ID_PREFIX, PLACEHOLDER_TITLE,
};
