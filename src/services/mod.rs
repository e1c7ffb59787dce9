pub mod catalog;
pub mod eligibility;
pub mod ordering;
pub mod recommendations;
pub mod selection;

pub use catalog::CatalogQuery;
pub use eligibility::AgeFilter;
pub use recommendations::RecommendationService;
pub use selection::TieredSelector;
