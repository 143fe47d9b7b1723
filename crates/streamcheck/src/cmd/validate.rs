use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use streamcheck_schema::{
    Nonconformance, Record, RegistryConfig, SchemaRegistry, StreamSchemaValidator,
    ValidationOutcome,
};

use crate::cmd::ValidateArgs;
use crate::exit::{io_error, schema_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_nonconformance, OutputFormat};

const RECORD_MESSAGE: &str = "RECORD";

/// One line of connector output. Only `RECORD` messages carry data.
#[derive(Deserialize)]
struct Message {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    record: Option<Record>,
}

pub fn run(args: ValidateArgs, format: OutputFormat) -> CliResult<i32> {
    let config = RegistryConfig {
        strict_mode: args.strict,
        ..RegistryConfig::default()
    };
    let registry = SchemaRegistry::from_catalog_file(&args.catalog, config)
        .map_err(|err| schema_error(&format!("catalog {}", args.catalog.display()), err))?;
    tracing::info!(
        streams = registry.len(),
        strict = args.strict,
        "loaded configured catalog"
    );
    let validator = StreamSchemaValidator::new(Arc::new(registry));

    let reader = open_records(args.records.as_deref())?;
    let all_conform = check_records(reader, &validator, args.fail_fast, |line, failure| {
        print_nonconformance(line, failure, format)
    })?;

    if all_conform {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}

fn open_records(path: Option<&Path>) -> CliResult<Box<dyn BufRead>> {
    match path {
        None => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(path) if path == Path::new("-") => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Validate every record message in `reader`, reporting each nonconforming
/// one. Returns whether all records conformed.
fn check_records<R, F>(
    reader: R,
    validator: &StreamSchemaValidator,
    fail_fast: bool,
    mut report: F,
) -> CliResult<bool>
where
    R: BufRead,
    F: FnMut(usize, &Nonconformance),
{
    let mut all_conform = true;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|err| io_error("failed reading records", err))?;
        if line.trim().is_empty() {
            continue;
        }

        let message: Message = serde_json::from_str(&line).map_err(|err| {
            CliError::new(
                DATA_INVALID,
                format!("line {line_number}: invalid message: {err}"),
            )
        })?;
        if message.kind != RECORD_MESSAGE {
            tracing::trace!(line = line_number, kind = %message.kind, "skipping message");
            continue;
        }
        let record = message.record.ok_or_else(|| {
            CliError::new(
                DATA_INVALID,
                format!("line {line_number}: RECORD message without record"),
            )
        })?;

        let outcome = validator
            .validate(&record)
            .map_err(|err| schema_error(&format!("line {line_number}"), err))?;
        match outcome {
            ValidationOutcome::Conforms => {
                tracing::debug!(line = line_number, stream = %record.key(), "record conforms");
            }
            ValidationOutcome::Nonconforms(failure) => {
                tracing::warn!(line = line_number, stream = %failure.stream, "record nonconforming");
                report(line_number, &failure);
                all_conform = false;
                if fail_fast {
                    break;
                }
            }
        }
    }

    Ok(all_conform)
}
