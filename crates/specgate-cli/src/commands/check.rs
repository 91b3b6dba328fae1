//! The check subcommand.

use std::path::PathBuf;

use clap::Args;
use serde_json::json;
use specgate_pipeline::{run_check, CheckOutcome, ExitStatus, GateConfigFile, VerdictScope};
use specgate_store::FsSnapshotStore;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Gate configuration YAML
    #[arg(long)]
    pub config: PathBuf,

    /// Directory holding committed snapshots
    #[arg(long, default_value = ".specgate/snapshots")]
    pub snapshots: PathBuf,

    /// Current interface description (JSON)
    #[arg(long)]
    pub interface: Option<PathBuf>,

    /// Current event envelope schema (JSON)
    #[arg(long)]
    pub event_envelope: Option<PathBuf>,

    /// Current event payload schema (JSON)
    #[arg(long)]
    pub event_payload: Option<PathBuf>,

    /// Print the structured verdict as JSON instead of Markdown
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: CheckArgs) -> i32 {
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitStatus::InputError.code()
        }
    }
}

fn run(args: CheckArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = GateConfigFile::load(&args.config)?;
    let policy = config.resolve(|name| std::env::var(name).ok());
    let inputs = super::load_inputs(
        args.interface.as_ref(),
        args.event_envelope.as_ref(),
        args.event_payload.as_ref(),
    )?;
    let store = FsSnapshotStore::new(&args.snapshots);

    let outcome = run_check(&inputs, &store, &policy);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_payload(&outcome))?);
    } else {
        print!("{}", outcome.render_human());
    }
    Ok(outcome.status.code())
}

fn json_payload(outcome: &CheckOutcome) -> serde_json::Value {
    let kinds: Vec<_> = outcome
        .kind_reports
        .iter()
        .map(|report| {
            json!({
                "kind": report.kind.name(),
                "baseline_missing": report.baseline_missing,
                "error": report.error.as_ref().map(|e| e.to_string()),
            })
        })
        .collect();
    let verdicts: Vec<_> = outcome
        .verdicts
        .iter()
        .map(|scoped| {
            let scope = match scoped.scope {
                VerdictScope::Aggregate => "aggregate".to_string(),
                VerdictScope::Kind(kind) => kind.name().to_string(),
            };
            json!({ "scope": scope, "verdict": scoped.verdict })
        })
        .collect();
    json!({
        "exit_code": outcome.status.code(),
        "kinds": kinds,
        "verdicts": verdicts,
        "fatal": outcome.fatal.as_ref().map(|e| e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use specgate_core::policy::PolicyConfig;
    use specgate_pipeline::RunInputs;
    use specgate_store::{MemorySnapshotStore, SnapshotKind};

    #[test]
    fn test_json_payload_shape() {
        let inputs = RunInputs::new().with_document(
            SnapshotKind::Interface,
            serde_json::json!({ "kind": "interface", "operations": [] }),
        );
        let outcome = run_check(
            &inputs,
            &MemorySnapshotStore::new(),
            &PolicyConfig::default(),
        );
        let payload = json_payload(&outcome);
        assert_eq!(payload["exit_code"], 0);
        assert_eq!(payload["kinds"][0]["kind"], "interface");
        assert_eq!(payload["kinds"][0]["baseline_missing"], true);
        assert!(payload["verdicts"][0]["verdict"]["passed"].as_bool().unwrap());
    }
}
