//! Markdown rendering of the batch report, the single artifact a human
//! reviews to decide whether a run is acceptable for downstream use.

use seatlink_core::config::EffectiveThresholds;

use crate::stats::BatchStats;
use crate::validate::ValidationSummary;

/// Run-level facts quoted alongside the aggregates.
#[derive(Debug, Clone)]
pub struct RunMeta {
    pub registry_colleges: usize,
    pub parallel: bool,
    pub duration_secs: f64,
    pub thresholds: EffectiveThresholds,
}

pub fn render_report(
    stats: &BatchStats,
    validation: &ValidationSummary,
    meta: &RunMeta,
) -> String {
    let mut out = String::new();
    out.push_str("# Seat allotment reconciliation report\n\n");

    out.push_str("## Summary\n\n");
    out.push_str("| Metric | Value |\n|---|---|\n");
    out.push_str(&format!("| Records | {} |\n", stats.total));
    out.push_str(&format!(
        "| Matched | {} ({:.1}%) |\n",
        stats.matched,
        stats.match_rate() * 100.0
    ));
    out.push_str(&format!("| Unmatched | {} |\n", stats.unmatched));
    out.push_str(&format!("| Unmatchable input | {} |\n", stats.unmatchable));
    out.push_str(&format!("| Ambiguous | {} |\n", stats.ambiguous));
    out.push_str(&format!("| Registry colleges | {} |\n", meta.registry_colleges));
    out.push_str(&format!(
        "| Mode | {} |\n",
        if meta.parallel { "parallel" } else { "sequential" }
    ));
    out.push_str(&format!("| Duration | {:.2}s |\n\n", meta.duration_secs));

    out.push_str("## Matches by method\n\n");
    if stats.by_method.is_empty() {
        out.push_str("No accepted matches.\n\n");
    } else {
        out.push_str("| Method | Count |\n|---|---|\n");
        for (method, count) in &stats.by_method {
            out.push_str(&format!("| {method} | {count} |\n"));
        }
        out.push('\n');
    }

    out.push_str("## By state\n\n");
    out.push_str("| State | Records | Matched | Unmatched | Ambiguous | Match rate |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for (state, breakdown) in &stats.by_state {
        out.push_str(&format!(
            "| {state} | {} | {} | {} | {} | {:.1}% |\n",
            breakdown.total,
            breakdown.matched,
            breakdown.unmatched,
            breakdown.ambiguous,
            breakdown.match_rate() * 100.0
        ));
    }
    out.push('\n');

    out.push_str("## Integrity findings\n\n");
    if validation.is_clean() {
        out.push_str("All integrity checks passed.\n\n");
    } else {
        for finding in &validation.findings {
            out.push_str(&format!("- {finding}\n"));
        }
        out.push_str(&format!(
            "\n{} result(s) blocked from promotion pending registry repair.\n\n",
            validation.demoted.len()
        ));
    }

    out.push_str("## Low-confidence accepts\n\n");
    if stats.low_confidence.is_empty() {
        out.push_str("None sampled.\n\n");
    } else {
        out.push_str("| Record | College | Method | Confidence |\n|---|---|---|---|\n");
        for entry in &stats.low_confidence {
            out.push_str(&format!(
                "| {} | {} | {} | {:.3} |\n",
                entry.seat_record_id,
                entry.college_id,
                entry.method,
                entry.confidence
            ));
        }
        out.push('\n');
    }

    out.push_str("## Effective thresholds\n\n");
    out.push_str("| Threshold | Value |\n|---|---|\n");
    let t = &meta.thresholds;
    out.push_str(&format!("| fuzzy_accept | {:.2} |\n", t.fuzzy_accept));
    out.push_str(&format!("| fuzzy_margin | {:.2} |\n", t.fuzzy_margin));
    out.push_str(&format!("| token_set_accept | {:.2} |\n", t.token_set_accept));
    out.push_str(&format!("| embedding_floor | {:.2} |\n", t.embedding_floor));
    out.push_str(&format!("| phonetic_accept | {:.2} |\n", t.phonetic_accept));
    out.push_str(&format!("| tie_epsilon | {:.2} |\n", t.tie_epsilon));
    out.push_str(&format!(
        "| disambiguation_confidence | {:.2} |\n",
        t.disambiguation_confidence
    ));

    out
}
