//! Immutable registry index, built once per run and shared read-only
//! across partitions.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;
use seatlink_core::config::LinkConfig;
use seatlink_core::errors::{RegistryError, StorageError};
use seatlink_core::normalize::{self, StateNormalizer};
use seatlink_core::types::{CollegeId, CourseLevel, MasterCollege, MasterCourse, Stream};

/// Everything the matcher needs to know about the registry, precomputed.
///
/// Lookup structures are keyed on canonical forms produced by the shared
/// normalization module, so query-side keys land on registry-side entries
/// by construction. Ordered maps everywhere iteration order can reach the
/// output; hash maps where only point lookups happen.
#[derive(Debug)]
pub struct RegistryIndex {
    colleges: BTreeMap<CollegeId, MasterCollege>,
    by_state: BTreeMap<String, Vec<CollegeId>>,
    by_state_stream: BTreeMap<String, BTreeMap<Stream, Vec<CollegeId>>>,
    by_composite_key: FxHashMap<String, CollegeId>,
    duplicate_keys: BTreeMap<String, Vec<CollegeId>>,
    college_states: FxHashMap<CollegeId, String>,
    normalized_names: FxHashMap<CollegeId, String>,
    name_tokens: FxHashMap<CollegeId, BTreeSet<String>>,
    courses: FxHashMap<String, (Stream, CourseLevel)>,
    offerings: FxHashMap<CollegeId, BTreeSet<String>>,
    states: StateNormalizer,
}

impl RegistryIndex {
    /// Build the index from registry rows.
    ///
    /// `offerings` links colleges to the canonical courses they run; it may
    /// be empty, which disables the course filter stage. Duplicate college
    /// ids are fatal; duplicate composite keys are recorded for the
    /// validator but do not block the build.
    pub fn build(
        colleges: Vec<MasterCollege>,
        courses: Vec<MasterCourse>,
        offerings: Vec<(CollegeId, String)>,
        config: &LinkConfig,
    ) -> Result<Self, RegistryError> {
        if colleges.is_empty() {
            return Err(RegistryError::EmptyRegistry);
        }

        let mut states = StateNormalizer::new(
            &config.states.effective_aliases(),
            config.states.effective_fuzzy_floor(),
        );

        let mut index_colleges = BTreeMap::new();
        let mut by_state: BTreeMap<String, Vec<CollegeId>> = BTreeMap::new();
        let mut by_state_stream: BTreeMap<String, BTreeMap<Stream, Vec<CollegeId>>> =
            BTreeMap::new();
        let mut by_composite_key = FxHashMap::default();
        let mut duplicate_keys: BTreeMap<String, Vec<CollegeId>> = BTreeMap::new();
        let mut college_states = FxHashMap::default();
        let mut normalized_names = FxHashMap::default();
        let mut name_tokens = FxHashMap::default();

        for college in colleges {
            let id = college.id.clone();
            if index_colleges.contains_key(&id) {
                return Err(RegistryError::DuplicateCollegeId {
                    id: id.as_str().to_string(),
                });
            }

            let state = states.register_known(&college.state);
            by_state.entry(state.clone()).or_default().push(id.clone());
            by_state_stream
                .entry(state.clone())
                .or_default()
                .entry(college.stream)
                .or_default()
                .push(id.clone());
            college_states.insert(id.clone(), state);

            normalized_names.insert(id.clone(), normalize::canonicalize(&college.name));
            name_tokens.insert(id.clone(), normalize::tokens(&college.name));

            if let Some(key) = &college.composite_key {
                match by_composite_key.get(key) {
                    None => {
                        by_composite_key.insert(key.clone(), id.clone());
                    }
                    Some(first) => {
                        let entry = duplicate_keys
                            .entry(key.clone())
                            .or_insert_with(|| vec![first.clone()]);
                        entry.push(id.clone());
                    }
                }
            } else {
                tracing::warn!(college = %id, "registry entry has no usable name; exact tier cannot reach it");
            }

            index_colleges.insert(id, college);
        }

        // Candidate id lists are consulted in order; keep them sorted so
        // every downstream tie-break is lexicographic.
        for ids in by_state.values_mut() {
            ids.sort();
        }
        for streams in by_state_stream.values_mut() {
            for ids in streams.values_mut() {
                ids.sort();
            }
        }

        let courses = courses
            .into_iter()
            .map(|c| (normalize::canonicalize(&c.name), (c.stream, c.level)))
            .collect();

        let mut offering_sets: FxHashMap<CollegeId, BTreeSet<String>> = FxHashMap::default();
        for (college_id, course_name) in offerings {
            offering_sets
                .entry(college_id)
                .or_default()
                .insert(normalize::canonicalize(&course_name));
        }

        tracing::info!(
            colleges = index_colleges.len(),
            states = by_state.len(),
            duplicate_keys = duplicate_keys.len(),
            "registry index built"
        );

        Ok(Self {
            colleges: index_colleges,
            by_state,
            by_state_stream,
            by_composite_key,
            duplicate_keys,
            college_states,
            normalized_names,
            name_tokens,
            courses,
            offerings: offering_sets,
            states,
        })
    }

    pub fn len(&self) -> usize {
        self.colleges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colleges.is_empty()
    }

    pub fn college(&self, id: &CollegeId) -> Option<&MasterCollege> {
        self.colleges.get(id)
    }

    pub fn contains(&self, id: &CollegeId) -> bool {
        self.colleges.contains_key(id)
    }

    /// Canonical state of a registered college.
    pub fn college_state(&self, id: &CollegeId) -> Option<&str> {
        self.college_states.get(id).map(String::as_str)
    }

    /// Sorted ids of colleges in a canonical state.
    pub fn colleges_in_state(&self, state: &str) -> &[CollegeId] {
        self.by_state.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sorted ids of colleges in a canonical state running a stream.
    pub fn colleges_in_state_stream(&self, state: &str, stream: Stream) -> &[CollegeId] {
        self.by_state_stream
            .get(state)
            .and_then(|streams| streams.get(&stream))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Exact composite-key owner, if any.
    pub fn college_by_key(&self, key: &str) -> Option<&CollegeId> {
        self.by_composite_key.get(key)
    }

    /// Composite keys shared by more than one registry entry.
    pub fn duplicate_keys(&self) -> impl Iterator<Item = (&str, &[CollegeId])> {
        self.duplicate_keys
            .iter()
            .map(|(key, ids)| (key.as_str(), ids.as_slice()))
    }

    pub fn normalized_name(&self, id: &CollegeId) -> &str {
        self.normalized_names.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn name_tokens(&self, id: &CollegeId) -> Option<&BTreeSet<String>> {
        self.name_tokens.get(id)
    }

    /// Catalogue entry for a canonical course name.
    pub fn course(&self, canonical_name: &str) -> Option<(Stream, CourseLevel)> {
        self.courses.get(canonical_name).copied()
    }

    /// Canonical courses a college is known to run. `None` means the
    /// catalogue has no data for this college, which is different from an
    /// empty offering list.
    pub fn offerings(&self, id: &CollegeId) -> Option<&BTreeSet<String>> {
        self.offerings.get(id)
    }

    pub fn has_offerings(&self) -> bool {
        !self.offerings.is_empty()
    }

    pub fn states(&self) -> &StateNormalizer {
        &self.states
    }

    /// All colleges, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &MasterCollege> {
        self.colleges.values()
    }
}

/// Precomputed name embeddings, keyed by college id and seat record id.
///
/// Entirely optional: an empty store just disables the embedding tier. The
/// first inserted vector fixes the dimension; later mismatches are storage
/// errors, not silent zero scores.
#[derive(Debug, Default)]
pub struct EmbeddingStore {
    colleges: FxHashMap<CollegeId, Vec<f32>>,
    records: FxHashMap<i64, Vec<f32>>,
    dim: Option<usize>,
}

impl EmbeddingStore {
    pub fn insert_college(
        &mut self,
        id: CollegeId,
        vector: Vec<f32>,
    ) -> Result<(), StorageError> {
        self.check_dim(vector.len())?;
        self.colleges.insert(id, vector);
        Ok(())
    }

    pub fn insert_record(&mut self, id: i64, vector: Vec<f32>) -> Result<(), StorageError> {
        self.check_dim(vector.len())?;
        self.records.insert(id, vector);
        Ok(())
    }

    fn check_dim(&mut self, len: usize) -> Result<(), StorageError> {
        match self.dim {
            None => {
                self.dim = Some(len);
                Ok(())
            }
            Some(expected) if expected == len => Ok(()),
            Some(expected) => Err(StorageError::EmbeddingDimension { expected, got: len }),
        }
    }

    pub fn college_vector(&self, id: &CollegeId) -> Option<&[f32]> {
        self.colleges.get(id).map(Vec::as_slice)
    }

    pub fn record_vector(&self, record_id: i64) -> Option<&[f32]> {
        self.records.get(&record_id).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.colleges.is_empty() && self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn college(id: &str, name: &str, state: &str, stream: Stream) -> MasterCollege {
        MasterCollege::new(id, name, format!("{name} CAMPUS ROAD"), state, stream)
    }

    fn build(colleges: Vec<MasterCollege>) -> RegistryIndex {
        RegistryIndex::build(colleges, Vec::new(), Vec::new(), &LinkConfig::default()).unwrap()
    }

    #[test]
    fn duplicate_college_id_is_fatal() {
        let err = RegistryIndex::build(
            vec![
                college("C1", "ALPHA MEDICAL COLLEGE", "KERALA", Stream::Medical),
                college("C1", "BETA MEDICAL COLLEGE", "KERALA", Stream::Medical),
            ],
            Vec::new(),
            Vec::new(),
            &LinkConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCollegeId { .. }));
    }

    #[test]
    fn empty_registry_is_fatal() {
        let err =
            RegistryIndex::build(Vec::new(), Vec::new(), Vec::new(), &LinkConfig::default())
                .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyRegistry));
    }

    #[test]
    fn state_buckets_use_canonical_tokens() {
        let index = build(vec![
            college("C1", "SCB MEDICAL COLLEGE", "ORISSA", Stream::Medical),
            college("C2", "MKCG MEDICAL COLLEGE", "ODISHA", Stream::Medical),
        ]);
        let canonical = index.states().resolve("Orissa");
        assert_eq!(index.colleges_in_state(&canonical).len(), 2);
    }

    #[test]
    fn duplicate_composite_keys_are_recorded_not_fatal() {
        let index = build(vec![
            MasterCollege::new("C1", "DISTRICT HOSPITAL", "SAME ROAD", "GOA", Stream::Medical),
            MasterCollege::new("C2", "DISTRICT HOSPITAL", "SAME ROAD", "GOA", Stream::Medical),
        ]);
        let dupes: Vec<_> = index.duplicate_keys().collect();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].1.len(), 2);
    }

    #[test]
    fn embedding_store_rejects_dimension_drift() {
        let mut store = EmbeddingStore::default();
        store.insert_college(CollegeId::new("C1"), vec![0.1, 0.2]).unwrap();
        let err = store.insert_record(9, vec![0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(err, StorageError::EmbeddingDimension { expected: 2, got: 3 }));
    }
}
