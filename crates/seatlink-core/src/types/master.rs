//! Master registry entities: colleges and courses.

use serde::{Deserialize, Serialize};

use crate::normalize;

/// Stable identifier of a master college.
///
/// Ordering is lexicographic on the underlying string; every deterministic
/// tie-break in the engine leans on this.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollegeId(String);

impl CollegeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollegeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-level discipline partition used to narrow candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stream {
    Medical,
    Dental,
    Dnb,
}

impl Stream {
    pub fn all() -> &'static [Stream] {
        &[Self::Medical, Self::Dental, Self::Dnb]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Medical => "MEDICAL",
            Self::Dental => "DENTAL",
            Self::Dnb => "DNB",
        }
    }

    pub fn parse(value: &str) -> Option<Stream> {
        match value.trim().to_ascii_uppercase().as_str() {
            "MEDICAL" => Some(Self::Medical),
            "DENTAL" => Some(Self::Dental),
            "DNB" => Some(Self::Dnb),
            _ => None,
        }
    }

    /// Infer the stream a course belongs to from its name alone.
    ///
    /// Dental degrees (BDS/MDS) and anything explicitly dental map to
    /// DENTAL, DNB courses to DNB, everything else to MEDICAL. Diploma
    /// overlap courses are widened later by the candidate filter; this is
    /// only the single-stream starting point.
    pub fn infer_from_course(course: &str) -> Stream {
        let c = normalize::canonicalize(course);
        let has_word = |w: &str| c.split_whitespace().any(|t| t == w);
        if has_word("BDS") || has_word("MDS") || c.contains("DENTAL") {
            Self::Dental
        } else if has_word("DNB") || has_word("NBEMS") {
            Self::Dnb
        } else {
            Self::Medical
        }
    }
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Course level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseLevel {
    Ug,
    Pg,
    Diploma,
}

impl CourseLevel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ug => "UG",
            Self::Pg => "PG",
            Self::Diploma => "DIPLOMA",
        }
    }

    pub fn parse(value: &str) -> Option<CourseLevel> {
        match value.trim().to_ascii_uppercase().as_str() {
            "UG" => Some(Self::Ug),
            "PG" => Some(Self::Pg),
            "DIPLOMA" => Some(Self::Diploma),
            _ => None,
        }
    }
}

impl std::fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A college as registered in the master registry.
///
/// Immutable once a resolution run starts. `composite_key` is derived at
/// construction through the shared normalization module, so registry-side
/// and query-side keys can never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterCollege {
    pub id: CollegeId,
    pub name: String,
    pub address: String,
    pub state: String,
    pub stream: Stream,
    /// `None` when the registered name normalizes to empty; such an entry
    /// can never be exact-matched and is reported as a registry finding.
    pub composite_key: Option<String>,
}

impl MasterCollege {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        state: impl Into<String>,
        stream: Stream,
    ) -> Self {
        let name = name.into();
        let address = address.into();
        let composite_key = normalize::build_composite_key(&name, &address);
        Self {
            id: CollegeId::new(id),
            name,
            address,
            state: state.into(),
            stream,
            composite_key,
        }
    }
}

/// A course from the master catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterCourse {
    pub id: String,
    pub name: String,
    pub stream: Stream,
    pub level: CourseLevel,
}

impl MasterCourse {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        stream: Stream,
        level: CourseLevel,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stream,
            level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_inference_from_course_names() {
        assert_eq!(Stream::infer_from_course("MBBS"), Stream::Medical);
        assert_eq!(Stream::infer_from_course("M.D. (GENERAL MEDICINE)"), Stream::Medical);
        assert_eq!(Stream::infer_from_course("BDS"), Stream::Dental);
        assert_eq!(Stream::infer_from_course("MDS (ORTHODONTICS)"), Stream::Dental);
        assert_eq!(Stream::infer_from_course("DNB GENERAL SURGERY"), Stream::Dnb);
    }

    #[test]
    fn stream_inference_does_not_trip_on_substrings() {
        // "ACCIDENT" contains "DENT" but is not a dental course.
        assert_eq!(
            Stream::infer_from_course("ACCIDENT AND EMERGENCY MEDICINE"),
            Stream::Medical
        );
    }

    #[test]
    fn composite_key_is_none_for_empty_name() {
        let college = MasterCollege::new("C1", "   ", "SOME ROAD", "KERALA", Stream::Medical);
        assert!(college.composite_key.is_none());
    }

    #[test]
    fn college_ids_order_lexicographically() {
        let a = CollegeId::new("COL-001");
        let b = CollegeId::new("COL-002");
        assert!(a < b);
    }
}
