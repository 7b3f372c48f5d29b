//! Seat allotment records: the per-batch input.

/// One raw allotment row as delivered by a counselling authority.
///
/// Fields are already split by the upstream ETL; nothing here is parsed
/// further. Category, quota, round, year, and rank are carried through
/// untouched for downstream cutoff statistics and play no part in identity
/// matching.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatRecord {
    pub id: i64,
    pub raw_college_name: String,
    pub raw_address: String,
    pub raw_state: String,
    pub raw_course: String,
    pub category: String,
    pub quota: String,
    pub round: Option<u32>,
    pub year: Option<u16>,
    pub rank: Option<i64>,
}

impl SeatRecord {
    pub fn new(
        id: i64,
        raw_college_name: impl Into<String>,
        raw_address: impl Into<String>,
        raw_state: impl Into<String>,
        raw_course: impl Into<String>,
    ) -> Self {
        Self {
            id,
            raw_college_name: raw_college_name.into(),
            raw_address: raw_address.into(),
            raw_state: raw_state.into(),
            raw_course: raw_course.into(),
            category: String::new(),
            quota: String::new(),
            round: None,
            year: None,
            rank: None,
        }
    }
}
