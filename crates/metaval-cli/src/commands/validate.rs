//! `metaval validate`: check JSON documents against a class's rules.

use std::io::Read as _;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use metaval_adapters::{InMemoryUniqueIndex, JsonSubject};
use metaval_core::domain::{ValidationOutcome, Violation};

use crate::{
    cli::ValidateArgs,
    commands::{rules_path, service_for},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Per-document result in `--output-format json`.
#[derive(Debug, Serialize)]
struct DocumentReport<'a> {
    index: usize,
    valid: bool,
    violations: &'a [Violation],
}

#[instrument(skip_all, fields(class = %args.class, data = %args.data.display()))]
pub fn execute(args: ValidateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = service_for(&rules_path(args.rules.clone(), &config))?;

    // Fail on an unknown class before touching the data.
    service.validator_for(&args.class)?;

    let document = read_json(&args.data)?;
    let mut subjects = JsonSubject::from_document(&args.class, document)?;

    // Without --existing every value is unique against an empty index.
    let index = match &args.existing {
        Some(path) => InMemoryUniqueIndex::from_json(read_json(path)?)?,
        None => InMemoryUniqueIndex::new(),
    };
    debug!(records = index.len(), "existing records");
    subjects = subjects
        .into_iter()
        .map(|s| s.with_unique_index(index.clone()))
        .collect();
    if let Some(is_new) = args.new_record() {
        subjects = subjects
            .into_iter()
            .map(|s| s.with_new_record(is_new))
            .collect();
    }

    let outcomes = subjects
        .iter()
        .map(|subject| service.validate(subject))
        .collect::<Result<Vec<_>, _>>()?;

    report(&args.class, &outcomes, &output)?;

    let invalid = outcomes.iter().filter(|o| !o.is_valid()).count();
    if invalid > 0 {
        return Err(CliError::DataInvalid {
            invalid,
            total: outcomes.len(),
        });
    }
    Ok(())
}

fn report(class: &str, outcomes: &[ValidationOutcome], output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        let reports: Vec<_> = outcomes
            .iter()
            .enumerate()
            .map(|(index, outcome)| DocumentReport {
                index,
                valid: outcome.is_valid(),
                violations: outcome.violations(),
            })
            .collect();
        output.json(&reports)?;
        return Ok(());
    }

    let many = outcomes.len() > 1;
    for (index, outcome) in outcomes.iter().enumerate() {
        let label = if many {
            format!("{class} #{index}")
        } else {
            class.to_owned()
        };

        if outcome.is_valid() {
            output.success(&format!("{label} is valid"))?;
            continue;
        }

        output.header(&format!("{label}: {} violation(s)", outcome.len()))?;
        for violation in outcome {
            output.error(&format!("  {violation}"))?;
        }
    }
    Ok(())
}

/// Read and parse a JSON file, or stdin when `path` is `-`.
fn read_json(path: &Path) -> CliResult<serde_json::Value> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .with_cli_context(|| "Failed to read data from stdin")?;
        buf
    } else {
        if !path.exists() {
            return Err(CliError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?
    };

    serde_json::from_str(&raw).with_cli_context(|| format!("'{}' is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_json_missing_file_is_not_found() {
        let err = read_json(Path::new("/no/such/data.json")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn read_json_rejects_malformed_input() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");
        std::fs::write(&path, "{\"email\": ").unwrap();

        let err = read_json(&path).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn read_json_parses_object() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");
        std::fs::write(&path, r#"{"email": "a@b.co"}"#).unwrap();

        let value = read_json(&path).unwrap();
        assert_eq!(value["email"], "a@b.co");
    }

    #[test]
    fn document_report_serializes_violations() {
        let mut outcome = ValidationOutcome::new();
        outcome.add_error(Violation::new(
            "email",
            metaval_core::domain::ViolationKind::Required,
        ));
        let report = DocumentReport {
            index: 0,
            valid: outcome.is_valid(),
            violations: outcome.violations(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["violations"][0]["property"], "email");
    }
}
