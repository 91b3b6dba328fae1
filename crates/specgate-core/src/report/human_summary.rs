//! Human-readable summary renderer for enforcement verdicts.

use crate::classify::CompatClass;
use crate::policy::Verdict;

/// Render a human-readable Markdown summary of a [`Verdict`].
///
/// The summary is intended for CI logs and review displays. It is
/// informational only; the structured verdict is the source of truth.
pub fn render_human_summary(verdict: &Verdict) -> String {
    let mut out = String::new();

    out.push_str("## Contract Check\n\n");

    let outcome = if verdict.passed { "PASS" } else { "FAIL" };
    out.push_str(&format!("**Outcome**: {outcome}\n\n"));

    out.push_str(&format!(
        "| Breaking | Additive | Informational | Exempted |\n\
         |---|---|---|---|\n\
         | {} | {} | {} | {} |\n\n",
        verdict.breaking_count,
        verdict.additive_count,
        verdict.informational_count,
        verdict.exempted_count,
    ));

    if verdict.override_applied {
        out.push_str(
            "> Breaking changes accepted under an override token. \
             They are listed below and remain breaking for consumers.\n\n",
        );
    }

    if verdict.report.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    out.push_str("### Changes\n\n");
    out.push_str("| Location | Class | Rule | Rationale | Exempted |\n");
    out.push_str("|---|---|---|---|---|\n");
    for entry in &verdict.report {
        let class_label = match entry.classified.class {
            CompatClass::Breaking => "Breaking",
            CompatClass::Additive => "Additive",
            CompatClass::Informational => "Informational",
        };
        out.push_str(&format!(
            "| `{}` | {} | `{}` | {} | {} |\n",
            entry.classified.change.location,
            class_label,
            entry.classified.rule_id,
            entry.classified.rationale,
            if entry.exempted { "yes" } else { "" },
        ));
    }
    out.push('\n');

    out
}
