//! The generate subcommand.

use std::path::PathBuf;

use clap::Args;
use specgate_pipeline::{run_generate, ExitStatus};
use specgate_store::FsSnapshotStore;

#[derive(Debug, Args)]
pub struct GenerateArgs {
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
}

pub fn execute(args: GenerateArgs) -> i32 {
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitStatus::InputError.code()
        }
    }
}

fn run(args: GenerateArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let inputs = super::load_inputs(
        args.interface.as_ref(),
        args.event_envelope.as_ref(),
        args.event_payload.as_ref(),
    )?;
    let store = FsSnapshotStore::new(&args.snapshots);

    let outcome = run_generate(&inputs, &store);
    for kind in &outcome.stored {
        println!("committed {} snapshot", kind);
    }
    for (kind, err) in &outcome.errors {
        eprintln!("{}: {}", kind, err);
    }
    Ok(outcome.status.code())
}
