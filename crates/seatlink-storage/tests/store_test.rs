//! SQLite store tests: restart survival, upsert overwrite semantics, JSON
//! round trips for candidates and traces, embedding blob storage.
//!
//! File-backed tests use tempdir so close + reopen cycles hit a real
//! database file, not just the page cache.

use seatlink_core::types::{
    CollegeId, CourseLevel, MasterCollege, MasterCourse, MatchMethod, MatchOutcome, MatchResult,
    MatchStatus, SeatRecord, Stream, TierAttempt, TierVerdict,
};
use seatlink_storage::{EmbeddingRows, LinkStore, RegistryRows};

fn college(id: &str, name: &str, address: &str, state: &str, stream: Stream) -> MasterCollege {
    MasterCollege::new(id, name, address, state, stream)
}

fn registry() -> RegistryRows {
    RegistryRows {
        colleges: vec![
            college(
                "AP-01",
                "KURNOOL MEDICAL COLLEGE",
                "KURNOOL",
                "ANDHRA PRADESH",
                Stream::Medical,
            ),
            college(
                "TG-01",
                "YASHODA HOSPITAL",
                "SOMAJIGUDA HYDERABAD",
                "TELANGANA",
                Stream::Dnb,
            ),
        ],
        courses: vec![
            MasterCourse::new("MBBS", "MBBS", Stream::Medical, CourseLevel::Ug),
            MasterCourse::new(
                "DIP-ANAES",
                "DIPLOMA IN ANAESTHESIA",
                Stream::Medical,
                CourseLevel::Diploma,
            ),
        ],
        offerings: vec![
            (CollegeId::new("AP-01"), "MBBS".to_string()),
            (CollegeId::new("AP-01"), "DIPLOMA IN ANAESTHESIA".to_string()),
        ],
    }
}

fn matched_result(id: i64, college: &str, state: &str) -> MatchResult {
    MatchResult::from_outcome(
        id,
        state.to_string(),
        MatchOutcome::Matched {
            college_id: CollegeId::new(college),
            confidence: 0.9913,
            method: MatchMethod::FuzzyName,
        },
        vec![
            TierAttempt::new(MatchMethod::ExactKey, None, TierVerdict::NoSignal),
            TierAttempt::new(MatchMethod::FuzzyName, Some(0.9913), TierVerdict::Accepted),
        ],
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// RESTART SURVIVAL: data persists across store close + reopen
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn registry_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("registry.db");
    let rows = registry();

    {
        let store = LinkStore::open(&db_path).unwrap();
        store.save_registry(&rows).unwrap();
    }

    {
        let store = LinkStore::open(&db_path).unwrap();
        let loaded = store.load_registry().unwrap();
        assert_eq!(loaded.colleges, rows.colleges);
        assert_eq!(loaded.courses, rows.courses);
        assert_eq!(loaded.offerings, rows.offerings);
        // Composite keys are rebuilt on load, never stored.
        assert!(loaded.colleges.iter().all(|c| c.composite_key.is_some()));
    }

    dir.close().unwrap();
}

#[test]
fn results_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("results.db");
    let result = matched_result(42, "AP-01", "ANDHRA PRADESH");

    {
        let store = LinkStore::open(&db_path).unwrap();
        store.save_results(std::slice::from_ref(&result)).unwrap();
    }

    {
        let store = LinkStore::open(&db_path).unwrap();
        let loaded = store.load_results().unwrap();
        assert_eq!(loaded, vec![result]);
    }

    dir.close().unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// UPSERT SEMANTICS: a second save replaces, never duplicates
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn college_upsert_overwrites_in_place() {
    let store = LinkStore::open_in_memory().unwrap();
    let mut rows = registry();
    store.save_registry(&rows).unwrap();

    rows.colleges[0] = college(
        "AP-01",
        "KURNOOL MEDICAL COLLEGE",
        "BUDHAWARPET KURNOOL",
        "ANDHRA PRADESH",
        Stream::Medical,
    );
    store.save_registry(&rows).unwrap();

    let loaded = store.load_registry().unwrap();
    assert_eq!(loaded.colleges.len(), 2);
    assert_eq!(loaded.colleges[0].address, "BUDHAWARPET KURNOOL");
    // Offerings are INSERT OR IGNORE; the duplicate save adds nothing.
    assert_eq!(loaded.offerings.len(), 2);
}

#[test]
fn result_upsert_replaces_previous_verdict() {
    let store = LinkStore::open_in_memory().unwrap();
    let first = MatchResult::from_outcome(
        7,
        "KERALA".to_string(),
        MatchOutcome::Unmatched,
        Vec::new(),
    );
    store.save_results(&[first]).unwrap();

    let second = matched_result(7, "KL-01", "KERALA");
    store.save_results(std::slice::from_ref(&second)).unwrap();

    let loaded = store.load_results().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].status, MatchStatus::Matched);
    assert_eq!(loaded[0].method, Some(MatchMethod::FuzzyName));
}

// ═══════════════════════════════════════════════════════════════════════════
// ROUND TRIPS: optionals, JSON columns, embedding blobs
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn seat_records_round_trip_with_blank_optionals() {
    let store = LinkStore::open_in_memory().unwrap();
    let bare = SeatRecord::new(1, "GOVT MEDICAL COLLEGE", "", "KERALA", "MBBS");
    let full = SeatRecord {
        id: 2,
        raw_college_name: "S.C.B. MEDICAL COLLEGE".to_string(),
        raw_address: "MANGALABAG, CUTTACK".to_string(),
        raw_state: "ODISHA".to_string(),
        raw_course: "MD GENERAL MEDICINE".to_string(),
        category: "OBC".to_string(),
        quota: "AIQ".to_string(),
        round: Some(2),
        year: Some(2024),
        rank: Some(18342),
    };
    store.save_seat_records(&[bare.clone(), full.clone()]).unwrap();

    let loaded = store.load_seat_records().unwrap();
    assert_eq!(loaded, vec![bare, full]);
}

#[test]
fn ambiguous_result_round_trips_candidates_and_trace() {
    let store = LinkStore::open_in_memory().unwrap();
    let result = MatchResult::from_outcome(
        3,
        "TELANGANA".to_string(),
        MatchOutcome::Ambiguous {
            candidates: vec![CollegeId::new("TG-01"), CollegeId::new("TG-02")],
        },
        vec![
            TierAttempt::new(MatchMethod::ExactKey, None, TierVerdict::NoSignal),
            TierAttempt::new(MatchMethod::FuzzyName, Some(0.9844), TierVerdict::Tied),
            TierAttempt::new(
                MatchMethod::AddressDisambiguated,
                None,
                TierVerdict::NoSignal,
            ),
        ],
    );
    store.save_results(std::slice::from_ref(&result)).unwrap();

    let loaded = store.load_results().unwrap();
    assert_eq!(loaded, vec![result]);
    assert_eq!(loaded[0].tiebreak_leader().unwrap().as_str(), "TG-01");
}

#[test]
fn results_load_in_state_then_id_order() {
    let store = LinkStore::open_in_memory().unwrap();
    let results = vec![
        matched_result(9, "TG-01", "TELANGANA"),
        matched_result(4, "KL-01", "KERALA"),
        matched_result(2, "TG-02", "TELANGANA"),
    ];
    store.save_results(&results).unwrap();

    let loaded = store.load_results().unwrap();
    let order: Vec<i64> = loaded.iter().map(|r| r.seat_record_id).collect();
    assert_eq!(order, vec![4, 2, 9]);
}

#[test]
fn embeddings_round_trip_as_le_blobs() {
    let store = LinkStore::open_in_memory().unwrap();
    let rows = EmbeddingRows {
        colleges: vec![
            (CollegeId::new("AP-01"), vec![0.25, -1.5, 3.0]),
            (CollegeId::new("TG-01"), vec![0.0, 0.5, -0.5]),
        ],
        records: vec![(1, vec![1.0, 0.0, 0.0]), (2, vec![0.0, 1.0, 0.0])],
    };
    store.save_embeddings(&rows).unwrap();

    let loaded = store.load_embeddings().unwrap();
    assert_eq!(loaded.colleges, rows.colleges);
    assert_eq!(loaded.records, rows.records);
}

#[test]
fn college_and_record_keys_never_collide() {
    // A college registered under id "7" and seat record 7 occupy separate
    // kind partitions.
    let store = LinkStore::open_in_memory().unwrap();
    let rows = EmbeddingRows {
        colleges: vec![(CollegeId::new("7"), vec![1.0, 0.0])],
        records: vec![(7, vec![0.0, 1.0])],
    };
    store.save_embeddings(&rows).unwrap();

    let loaded = store.load_embeddings().unwrap();
    assert_eq!(loaded.colleges, rows.colleges);
    assert_eq!(loaded.records, rows.records);
}

#[test]
fn empty_store_loads_empty_collections() {
    let store = LinkStore::open_in_memory().unwrap();
    assert!(store.load_registry().unwrap().colleges.is_empty());
    assert!(store.load_seat_records().unwrap().is_empty());
    assert!(store.load_results().unwrap().is_empty());
    assert!(store.load_embeddings().unwrap().is_empty());
}
