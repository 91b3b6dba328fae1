//! The check run mode: diff current documents against committed
//! snapshots and enforce policy. Never writes snapshots.

use std::time::Instant;

use serde_json::Value;
use specgate_core::classify::{classify_all, ClassifiedChange};
use specgate_core::diff::compute_diff;
use specgate_core::errors::GateError;
use specgate_core::model::SchemaModel;
use specgate_core::policy::{enforce, AggregationMode, PolicyConfig, Verdict};
use specgate_core::report::render_human_summary;
use specgate_core::{log_op_end, log_op_error, log_op_start};
use specgate_store::{SnapshotKind, SnapshotStore};

use crate::inputs::RunInputs;
use crate::status::ExitStatus;

/// Per-kind diff and classification result
#[derive(Debug)]
pub struct KindReport {
    pub kind: SnapshotKind,
    /// No committed baseline existed; the kind passes vacuously
    pub baseline_missing: bool,
    pub classified: Vec<ClassifiedChange>,
    /// Fatal error for this kind; siblings still run
    pub error: Option<GateError>,
}

/// What a verdict covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictScope {
    Aggregate,
    Kind(SnapshotKind),
}

#[derive(Debug)]
pub struct ScopedVerdict {
    pub scope: VerdictScope,
    pub verdict: Verdict,
}

/// Full outcome of one check run
#[derive(Debug)]
pub struct CheckOutcome {
    pub kind_reports: Vec<KindReport>,
    pub verdicts: Vec<ScopedVerdict>,
    /// Run-level fatal error (invalid override token)
    pub fatal: Option<GateError>,
    pub status: ExitStatus,
}

impl CheckOutcome {
    /// Render the whole outcome as Markdown for CI logs
    pub fn render_human(&self) -> String {
        let mut out = String::new();
        for report in &self.kind_reports {
            if let Some(err) = &report.error {
                out.push_str(&format!("## {} — ERROR\n\n{}\n\n", report.kind, err));
            } else if report.baseline_missing {
                out.push_str(&format!(
                    "## {} — no committed baseline, nothing to compare\n\n",
                    report.kind
                ));
            }
        }
        if let Some(err) = &self.fatal {
            out.push_str(&format!("## Enforcement error\n\n{}\n\n", err));
        }
        for scoped in &self.verdicts {
            if let VerdictScope::Kind(kind) = scoped.scope {
                out.push_str(&format!("# Kind: {}\n\n", kind));
            }
            out.push_str(&render_human_summary(&scoped.verdict));
            out.push('\n');
        }
        out
    }
}

/// Run the gate in check mode.
///
/// Each requested kind is processed to completion even when a sibling
/// fails, so a run with one malformed document still reports the diffs of
/// the healthy kinds. Overall status is never better than its worst kind.
pub fn run_check(
    inputs: &RunInputs,
    store: &dyn SnapshotStore,
    policy: &PolicyConfig,
) -> CheckOutcome {
    let started = Instant::now();
    log_op_start!("check");

    let mut kind_reports = Vec::new();
    for (kind, document) in inputs.iter() {
        kind_reports.push(check_kind(kind, document, store));
    }

    let mut verdicts = Vec::new();
    let mut fatal = None;
    match policy.aggregation {
        AggregationMode::Aggregate => {
            let merged: Vec<ClassifiedChange> = kind_reports
                .iter()
                .flat_map(|report| report.classified.iter().cloned())
                .collect();
            match enforce(&merged, policy) {
                Ok(verdict) => verdicts.push(ScopedVerdict {
                    scope: VerdictScope::Aggregate,
                    verdict,
                }),
                Err(err) => fatal = Some(err),
            }
        }
        AggregationMode::PerKind => {
            for report in &kind_reports {
                match enforce(&report.classified, policy) {
                    Ok(verdict) => verdicts.push(ScopedVerdict {
                        scope: VerdictScope::Kind(report.kind),
                        verdict,
                    }),
                    Err(err) => {
                        // Token validity does not depend on the kind; one
                        // failure covers the run.
                        fatal = Some(err);
                        break;
                    }
                }
            }
        }
    }

    let any_kind_error = kind_reports.iter().any(|report| report.error.is_some());
    let status = if fatal.is_some() || any_kind_error {
        ExitStatus::InputError
    } else if verdicts.iter().all(|scoped| scoped.verdict.passed) {
        ExitStatus::Pass
    } else {
        ExitStatus::PolicyFail
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    match &fatal {
        Some(err) => {
            log_op_error!("check", err.clone(), duration_ms = duration_ms);
        }
        None => {
            let change_count: usize = kind_reports.iter().map(|r| r.classified.len()).sum();
            log_op_end!(
                "check",
                duration_ms = duration_ms,
                change_count = change_count,
                exit_code = status.code()
            );
        }
    }

    CheckOutcome {
        kind_reports,
        verdicts,
        fatal,
        status,
    }
}

fn check_kind(kind: SnapshotKind, document: &Value, store: &dyn SnapshotStore) -> KindReport {
    let started = Instant::now();
    log_op_start!("check_kind", snapshot_kind = %kind);

    let report = match diff_kind(kind, document, store) {
        Ok((baseline_missing, classified)) => KindReport {
            kind,
            baseline_missing,
            classified,
            error: None,
        },
        Err(err) => KindReport {
            kind,
            baseline_missing: false,
            classified: Vec::new(),
            error: Some(err),
        },
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    match &report.error {
        Some(err) => {
            log_op_error!("check_kind", err.clone(), duration_ms = duration_ms);
        }
        None => {
            log_op_end!(
                "check_kind",
                duration_ms = duration_ms,
                change_count = report.classified.len()
            );
        }
    }
    report
}

fn diff_kind(
    kind: SnapshotKind,
    document: &Value,
    store: &dyn SnapshotStore,
) -> Result<(bool, Vec<ClassifiedChange>), GateError> {
    // Parse the current side first: a malformed working document is an
    // input error even when no baseline exists yet.
    let new_model = SchemaModel::parse(kind.document_kind(), document)?;

    let Some(artifact) = store.load(kind)? else {
        return Ok((true, Vec::new()));
    };

    let old_model = SchemaModel::parse(kind.document_kind(), &artifact.document)?;
    let changes = compute_diff(&old_model, &new_model)?;
    Ok((false, classify_all(&changes)))
}
