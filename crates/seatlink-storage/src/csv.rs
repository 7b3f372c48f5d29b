//! CSV adapters. Reads are header-mapped because authority exports disagree
//! on column order and casing; values are passed through raw and normalized
//! downstream.

use std::path::Path;

use ::csv::{ReaderBuilder, StringRecord, WriterBuilder};
use seatlink_core::errors::StorageError;
use seatlink_core::types::{
    CollegeId, CourseLevel, MasterCollege, MasterCourse, MatchResult, SeatRecord, Stream,
};

use crate::store::EmbeddingRows;

fn csv_err(path: &Path, e: impl std::fmt::Display) -> StorageError {
    StorageError::Csv {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn bad_row(path: &Path, line: usize, message: impl std::fmt::Display) -> StorageError {
    StorageError::InvalidRow {
        table: path.display().to_string(),
        message: format!("line {line}: {message}"),
    }
}

/// Column lookup by lowercased header name.
struct HeaderMap {
    columns: Vec<String>,
}

impl HeaderMap {
    fn read(reader: &mut ::csv::Reader<std::fs::File>, path: &Path) -> Result<Self, StorageError> {
        let headers = reader.headers().map_err(|e| csv_err(path, e))?;
        Ok(Self {
            columns: headers
                .iter()
                .map(|h| h.trim().to_ascii_lowercase())
                .collect(),
        })
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require(&self, path: &Path, name: &str) -> Result<usize, StorageError> {
        self.find(name).ok_or_else(|| StorageError::MissingColumn {
            table: path.display().to_string(),
            column: name.to_string(),
        })
    }
}

fn field<'a>(record: &'a StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("")
}

fn optional_field<'a>(record: &'a StringRecord, idx: Option<usize>) -> &'a str {
    idx.map(|i| field(record, i)).unwrap_or("")
}

fn parse_optional<T: std::str::FromStr>(
    path: &Path,
    line: usize,
    column: &str,
    raw: &str,
) -> Result<Option<T>, StorageError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| bad_row(path, line, format!("{column} '{raw}' is not numeric")))
}

/// Registry colleges from `id,name,address,state,stream`.
pub fn read_colleges(path: &Path) -> Result<Vec<MasterCollege>, StorageError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;
    let map = HeaderMap::read(&mut reader, path)?;
    let col_id = map.require(path, "id")?;
    let col_name = map.require(path, "name")?;
    let col_address = map.require(path, "address")?;
    let col_state = map.require(path, "state")?;
    let col_stream = map.require(path, "stream")?;

    let mut colleges = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let line = row + 2;
        let record = result.map_err(|e| csv_err(path, format!("line {line}: {e}")))?;
        let raw_stream = field(&record, col_stream);
        let stream = Stream::parse(raw_stream)
            .ok_or_else(|| bad_row(path, line, format!("unknown stream '{raw_stream}'")))?;
        colleges.push(MasterCollege::new(
            field(&record, col_id),
            field(&record, col_name),
            field(&record, col_address),
            field(&record, col_state),
            stream,
        ));
    }
    Ok(colleges)
}

/// Course catalogue from `id,name,stream,level`.
pub fn read_courses(path: &Path) -> Result<Vec<MasterCourse>, StorageError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;
    let map = HeaderMap::read(&mut reader, path)?;
    let col_id = map.require(path, "id")?;
    let col_name = map.require(path, "name")?;
    let col_stream = map.require(path, "stream")?;
    let col_level = map.require(path, "level")?;

    let mut courses = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let line = row + 2;
        let record = result.map_err(|e| csv_err(path, format!("line {line}: {e}")))?;
        let raw_stream = field(&record, col_stream);
        let stream = Stream::parse(raw_stream)
            .ok_or_else(|| bad_row(path, line, format!("unknown stream '{raw_stream}'")))?;
        let raw_level = field(&record, col_level);
        let level = CourseLevel::parse(raw_level)
            .ok_or_else(|| bad_row(path, line, format!("unknown level '{raw_level}'")))?;
        courses.push(MasterCourse::new(
            field(&record, col_id),
            field(&record, col_name),
            stream,
            level,
        ));
    }
    Ok(courses)
}

/// Per-college course offerings from `college_id,course_name`.
pub fn read_offerings(path: &Path) -> Result<Vec<(CollegeId, String)>, StorageError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;
    let map = HeaderMap::read(&mut reader, path)?;
    let col_college = map.require(path, "college_id")?;
    let col_course = map.require(path, "course_name")?;

    let mut offerings = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let line = row + 2;
        let record = result.map_err(|e| csv_err(path, format!("line {line}: {e}")))?;
        offerings.push((
            CollegeId::new(field(&record, col_college)),
            field(&record, col_course).to_string(),
        ));
    }
    Ok(offerings)
}

/// Seat allotment rows. Requires `id,college_name,address,state,course`;
/// `category`, `quota`, `round`, `year`, and `rank` are optional columns.
pub fn read_seat_records(path: &Path) -> Result<Vec<SeatRecord>, StorageError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;
    let map = HeaderMap::read(&mut reader, path)?;
    let col_id = map.require(path, "id")?;
    let col_name = map.require(path, "college_name")?;
    let col_address = map.require(path, "address")?;
    let col_state = map.require(path, "state")?;
    let col_course = map.require(path, "course")?;
    let col_category = map.find("category");
    let col_quota = map.find("quota");
    let col_round = map.find("round");
    let col_year = map.find("year");
    let col_rank = map.find("rank");

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let line = row + 2;
        let record = result.map_err(|e| csv_err(path, format!("line {line}: {e}")))?;
        let raw_id = field(&record, col_id).trim();
        let id = raw_id
            .parse::<i64>()
            .map_err(|_| bad_row(path, line, format!("id '{raw_id}' is not an integer")))?;
        records.push(SeatRecord {
            id,
            raw_college_name: field(&record, col_name).to_string(),
            raw_address: field(&record, col_address).to_string(),
            raw_state: field(&record, col_state).to_string(),
            raw_course: field(&record, col_course).to_string(),
            category: optional_field(&record, col_category).to_string(),
            quota: optional_field(&record, col_quota).to_string(),
            round: parse_optional(path, line, "round", optional_field(&record, col_round))?,
            year: parse_optional(path, line, "year", optional_field(&record, col_year))?,
            rank: parse_optional(path, line, "rank", optional_field(&record, col_rank))?,
        });
    }
    Ok(records)
}

/// Embedding vectors from `kind,key,vector`, one row per entity with the
/// vector as space-separated floats.
pub fn read_embeddings(path: &Path) -> Result<EmbeddingRows, StorageError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;
    let map = HeaderMap::read(&mut reader, path)?;
    let col_kind = map.require(path, "kind")?;
    let col_key = map.require(path, "key")?;
    let col_vector = map.require(path, "vector")?;

    let mut out = EmbeddingRows::default();
    for (row, result) in reader.records().enumerate() {
        let line = row + 2;
        let record = result.map_err(|e| csv_err(path, format!("line {line}: {e}")))?;
        let mut vector = Vec::new();
        for part in field(&record, col_vector).split_whitespace() {
            let value = part
                .parse::<f32>()
                .map_err(|_| bad_row(path, line, format!("vector value '{part}' is not a float")))?;
            vector.push(value);
        }
        if vector.is_empty() {
            return Err(bad_row(path, line, "empty vector"));
        }
        let key = field(&record, col_key).trim();
        match field(&record, col_kind).trim().to_ascii_lowercase().as_str() {
            "college" => out.colleges.push((CollegeId::new(key), vector)),
            "record" => {
                let id = key.parse::<i64>().map_err(|_| {
                    bad_row(path, line, format!("record key '{key}' is not an integer"))
                })?;
                out.records.push((id, vector));
            }
            other => return Err(bad_row(path, line, format!("unknown kind '{other}'"))),
        }
    }
    Ok(out)
}

/// Write results for spreadsheet review. Ambiguous candidate ids are joined
/// with ';'; the tier trace is embedded as JSON.
pub fn write_results(path: &Path, results: &[MatchResult]) -> Result<(), StorageError> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;
    writer
        .write_record([
            "seat_record_id",
            "status",
            "college_id",
            "confidence",
            "method",
            "state_normalized",
            "candidates",
            "trace",
        ])
        .map_err(|e| csv_err(path, e))?;
    for result in results {
        let candidates = result
            .candidates
            .iter()
            .map(CollegeId::as_str)
            .collect::<Vec<_>>()
            .join(";");
        let trace = serde_json::to_string(&result.trace).map_err(|e| csv_err(path, e))?;
        writer
            .write_record([
                result.seat_record_id.to_string().as_str(),
                result.status.name(),
                result.college_id.as_ref().map_or("", |c| c.as_str()),
                format!("{:.4}", result.confidence).as_str(),
                result.method.map_or("", |m| m.name()),
                result.state_normalized.as_str(),
                candidates.as_str(),
                trace.as_str(),
            ])
            .map_err(|e| csv_err(path, e))?;
    }
    writer.flush().map_err(|e| csv_err(path, e))?;
    Ok(())
}
