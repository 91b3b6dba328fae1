//! CLI subcommands.

pub mod check;
pub mod generate;

use std::path::PathBuf;

use serde_json::Value;
use specgate_pipeline::RunInputs;
use specgate_store::SnapshotKind;

/// Read the supplied document files into run inputs.
///
/// At least one input flag must be given; a run over nothing would pass
/// vacuously and hide a misconfigured CI job.
pub(crate) fn load_inputs(
    interface: Option<&PathBuf>,
    event_envelope: Option<&PathBuf>,
    event_payload: Option<&PathBuf>,
) -> Result<RunInputs, Box<dyn std::error::Error>> {
    let mut inputs = RunInputs::new();
    let flags = [
        (SnapshotKind::Interface, interface),
        (SnapshotKind::EventEnvelope, event_envelope),
        (SnapshotKind::EventPayload, event_payload),
    ];
    for (kind, path) in flags {
        let Some(path) = path else { continue };
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        let document: Value = serde_json::from_str(&text)
            .map_err(|e| format!("{} is not valid JSON: {}", path.display(), e))?;
        inputs = inputs.with_document(kind, document);
    }
    if inputs.is_empty() {
        return Err(
            "no input documents; pass at least one of --interface, --event-envelope, \
             --event-payload"
                .into(),
        );
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_load_inputs_requires_at_least_one_flag() {
        assert!(load_inputs(None, None, None).is_err());
    }

    #[test]
    fn test_load_inputs_reads_json_documents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"kind\": \"interface\", \"operations\": []}}").unwrap();
        let path = file.path().to_path_buf();

        let inputs = load_inputs(Some(&path), None, None).unwrap();
        let kinds: Vec<_> = inputs.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![SnapshotKind::Interface]);
    }

    #[test]
    fn test_load_inputs_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let path = file.path().to_path_buf();

        assert!(load_inputs(Some(&path), None, None).is_err());
    }
}
