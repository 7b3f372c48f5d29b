//! Determinism guarantees: identical reruns, parallel/sequential
//! equivalence, canonical output ordering, and state isolation of
//! accepted links.

use seatlink_core::config::LinkConfig;
use seatlink_core::types::{MasterCollege, MatchStatus, SeatRecord, Stream};
use seatlink_engine::{
    render_report, validate_batch, BatchRunner, EmbeddingStore, RegistryIndex, RunMeta, RunOutput,
};

// ---------------------------------------------------------------------------
// Fixture: three states, generic namesakes, lookalikes, alias usage
// ---------------------------------------------------------------------------

fn registry() -> Vec<MasterCollege> {
    vec![
        MasterCollege::new(
            "KL-01",
            "GOVT MEDICAL COLLEGE",
            "MEDICAL COLLEGE PO KOZHIKODE",
            "KERALA",
            Stream::Medical,
        ),
        MasterCollege::new(
            "KL-02",
            "GOVT MEDICAL COLLEGE",
            "GANDHI NAGAR KOTTAYAM",
            "KERALA",
            Stream::Medical,
        ),
        MasterCollege::new(
            "KL-03",
            "AMRITA INSTITUTE OF MEDICAL SCIENCES",
            "PONEKKARA KOCHI",
            "KERALA",
            Stream::Medical,
        ),
        MasterCollege::new(
            "OD-01",
            "SCB MEDICAL COLLEGE",
            "MANGALABAG CUTTACK",
            "ODISHA",
            Stream::Medical,
        ),
        MasterCollege::new(
            "OD-02",
            "MKCG MEDICAL COLLEGE",
            "BERHAMPUR GANJAM",
            "ODISHA",
            Stream::Medical,
        ),
        MasterCollege::new(
            "TG-01",
            "MAHATMA GANDHI MEMORIAL HOSPITAL WARANGAL",
            "STATION ROAD",
            "TELANGANA",
            Stream::Medical,
        ),
        MasterCollege::new(
            "TG-02",
            "MAHATMA GANDHI MEMORIAL HOSPITAL WARANGUL",
            "POCHAMMA MAIDAN",
            "TELANGANA",
            Stream::Medical,
        ),
    ]
}

/// Batch covering every outcome: exact accept, fuzzy accept, generic-name
/// disambiguation, a tie, an unmatchable row, and an unknown state.
fn records() -> Vec<SeatRecord> {
    vec![
        SeatRecord::new(1, "SCB MEDICAL COLEGE", "CUTTACK", "ODISHA", "MBBS"),
        SeatRecord::new(2, "GOVT MEDICAL COLLEGE", "KOZHIKODE", "KERALA", "MBBS"),
        SeatRecord::new(
            3,
            "MAHATMA GANDHI MEMORIAL HOSPITAL WARANGAL",
            "",
            "TELANGANA",
            "MBBS",
        ),
        SeatRecord::new(4, " .. ", "SOMEWHERE", "KERALA", "MBBS"),
        SeatRecord::new(5, "MKCG MEDICAL COLLEGE", "BERHAMPUR GANJAM", "ORISSA", "MBBS"),
        SeatRecord::new(6, "SCB MEDICAL COLLEGE", "CUTTACK", "SOUTH VIDARBHA", "MBBS"),
    ]
}

fn run(parallel: bool) -> (RunOutput, RegistryIndex, LinkConfig) {
    let mut config = LinkConfig::default();
    config.runtime.parallel = Some(parallel);
    let index =
        RegistryIndex::build(registry(), Vec::new(), Vec::new(), &config).expect("registry");
    let embeddings = EmbeddingStore::default();
    let output = BatchRunner::new(&index, &embeddings, &config).run(&records());
    (output, index, config)
}

// ===========================================================================
// Reruns and parallel equivalence
// ===========================================================================

/// Two sequential runs over the same input produce identical result rows
/// and an identical rendered report.
#[test]
fn repeated_runs_return_identical_rows() {
    let (first, index, config) = run(false);
    let (second, _, _) = run(false);
    assert_eq!(first.results, second.results);

    let meta = RunMeta {
        registry_colleges: index.len(),
        parallel: false,
        duration_secs: 0.0,
        thresholds: config.matching.effective(),
    };
    let validation_a = validate_batch(&first.results, &index);
    let validation_b = validate_batch(&second.results, &index);
    assert_eq!(
        render_report(&first.stats, &validation_a, &meta),
        render_report(&second.stats, &validation_b, &meta)
    );
}

/// The parallel path partitions by state and merges in canonical order, so
/// it must agree with the sequential path row for row and count for count.
#[test]
fn parallel_and_sequential_runs_agree() {
    let (parallel, _, _) = run(true);
    let (sequential, _, _) = run(false);
    assert_eq!(parallel.results, sequential.results);
    assert_eq!(parallel.stats.total, sequential.stats.total);
    assert_eq!(parallel.stats.matched, sequential.stats.matched);
    assert_eq!(parallel.stats.unmatched, sequential.stats.unmatched);
    assert_eq!(parallel.stats.ambiguous, sequential.stats.ambiguous);
    assert_eq!(parallel.stats.unmatchable, sequential.stats.unmatchable);
    assert_eq!(parallel.stats.by_method, sequential.stats.by_method);
    assert_eq!(parallel.stats.by_state, sequential.stats.by_state);
}

// ===========================================================================
// Output ordering
// ===========================================================================

/// Rows come back grouped by canonical state in lexicographic order, input
/// order preserved inside each state, independent of thread scheduling.
#[test]
fn rows_follow_canonical_state_then_input_order() {
    let (output, _, _) = run(true);
    let ids: Vec<i64> = output.results.iter().map(|r| r.seat_record_id).collect();
    // KERALA [2, 4], ODISHA [1, 5], SOUTH VIDARBHA [6], TELANGANA [3].
    assert_eq!(ids, [2, 4, 1, 5, 6, 3]);
}

/// The batch covers each terminal outcome exactly as designed; counts and
/// method attribution line up with it.
#[test]
fn batch_counters_attribute_methods() {
    let (output, _, _) = run(false);
    assert_eq!(output.stats.total, 6);
    assert_eq!(output.stats.matched, 3);
    assert_eq!(output.stats.unmatched, 2);
    assert_eq!(output.stats.ambiguous, 1);
    assert_eq!(output.stats.unmatchable, 1);
    assert_eq!(output.stats.by_method.get("EXACT_KEY"), Some(&1));
    assert_eq!(output.stats.by_method.get("FUZZY_NAME"), Some(&1));
    assert_eq!(output.stats.by_method.get("ADDRESS_DISAMBIGUATED"), Some(&1));
}

// ===========================================================================
// State isolation and ambiguity shape
// ===========================================================================

/// Every accepted link points at a college registered in the record's own
/// canonical state.
#[test]
fn accepted_links_stay_inside_record_state() {
    let (output, index, _) = run(false);
    let mut accepted = 0;
    for result in &output.results {
        if result.status != MatchStatus::Matched {
            continue;
        }
        accepted += 1;
        let college_id = result.college_id.as_ref().unwrap();
        assert_eq!(
            index.college_state(college_id),
            Some(result.state_normalized.as_str()),
            "record {} crossed states",
            result.seat_record_id
        );
    }
    assert_eq!(accepted, 3);
}

/// Ambiguous rows list every surviving candidate in lexicographic order;
/// the first entry doubles as the deterministic tie-break leader.
#[test]
fn ambiguous_rows_expose_sorted_candidates() {
    let (output, _, _) = run(false);
    let tie = output
        .results
        .iter()
        .find(|r| r.status == MatchStatus::Ambiguous)
        .expect("batch contains a tie");
    assert_eq!(tie.seat_record_id, 3);
    let ids: Vec<&str> = tie.candidates.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, ["TG-01", "TG-02"]);
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert_eq!(tie.tiebreak_leader().unwrap().as_str(), "TG-01");
}
