use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject shown when a course has none recorded
pub const DEFAULT_SUBJECT: &str = "General";

/// Duration estimate shown when a course has none recorded
pub const DEFAULT_DURATION: &str = "15 min";

/// Generic book glyph shown when a course has no icon
pub const DEFAULT_ICON: &str = "📖";

/// Publication status of a catalog course
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Draft,
    Published,
    Archived,
}

impl PublicationStatus {
    /// Parses the status as stored in the catalog, defaulting unknown
    /// values to `Draft` so they never surface as recommendable.
    pub fn from_db(raw: &str) -> Self {
        match raw {
            "published" => PublicationStatus::Published,
            "archived" => PublicationStatus::Archived,
            _ => PublicationStatus::Draft,
        }
    }
}

/// A learning activity in the catalog
///
/// Read-only from the engine's perspective; authoring lives elsewhere.
/// Course identifiers are opaque strings, stable across republication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: String,
    pub org_id: Uuid,
    pub title: String,
    pub subject: Option<String>,
    pub duration: Option<String>,
    /// Age-group range of the form "min-max", e.g. "6-9". Absent means
    /// no restriction.
    pub age_group: Option<String>,
    pub status: PublicationStatus,
    pub icon: Option<String>,
}

impl Course {
    pub fn subject_label(&self) -> String {
        self.subject
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string())
    }

    pub fn duration_label(&self) -> String {
        self.duration
            .clone()
            .unwrap_or_else(|| DEFAULT_DURATION.to_string())
    }

    pub fn icon_label(&self) -> String {
        self.icon.clone().unwrap_or_else(|| DEFAULT_ICON.to_string())
    }

    /// Parses this course's age-group string into a [`ParsedAgeRange`]
    pub fn age_range(&self) -> ParsedAgeRange {
        AgeRange::parse(self.age_group.as_deref())
    }
}

/// An inclusive age range parsed from a catalog "min-max" string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

/// Outcome of parsing a course's age-group attribute
///
/// Malformed catalog values are a distinct variant rather than an error:
/// the eligibility policy treats them as unrestricted, but callers decide
/// that explicitly instead of the parser defaulting silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedAgeRange {
    Range(AgeRange),
    Unrestricted,
    Malformed,
}

impl AgeRange {
    /// Parses an optional "min-max" string
    ///
    /// `None` parses to `Unrestricted`; anything that is not two integers
    /// separated by a hyphen parses to `Malformed`.
    pub fn parse(raw: Option<&str>) -> ParsedAgeRange {
        let Some(raw) = raw else {
            return ParsedAgeRange::Unrestricted;
        };

        let Some((lo, hi)) = raw.split_once('-') else {
            return ParsedAgeRange::Malformed;
        };

        match (lo.trim().parse::<u32>(), hi.trim().parse::<u32>()) {
            (Ok(min), Ok(max)) => ParsedAgeRange::Range(AgeRange { min, max }),
            _ => ParsedAgeRange::Malformed,
        }
    }

    /// Whether `age` falls inside this inclusive range
    pub fn contains(&self, age: u32) -> bool {
        age >= self.min && age <= self.max
    }
}
