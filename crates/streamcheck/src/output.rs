use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use streamcheck_schema::{Nonconformance, StreamKey};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct NonconformanceOutput<'a> {
    line: usize,
    stream: &'a str,
    message: &'a str,
    violations: Vec<ViolationOutput<'a>>,
}

#[derive(Serialize)]
struct ViolationOutput<'a> {
    path: String,
    expected: &'a str,
}

pub fn print_nonconformance(line: usize, failure: &Nonconformance, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = NonconformanceOutput {
                line,
                stream: &failure.stream,
                message: &failure.message,
                violations: failure
                    .violations
                    .iter()
                    .map(|v| ViolationOutput {
                        path: v.path_display(),
                        expected: &v.expected,
                    })
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["LINE", "STREAM", "PATH", "EXPECTED"]);
            for violation in &failure.violations {
                table.add_row(vec![
                    line.to_string(),
                    failure.stream.clone(),
                    violation.path_display(),
                    violation.expected.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("line {line}: {}", failure.message.trim_end());
        }
    }
}

#[derive(Serialize)]
struct StreamOutput<'a> {
    key: String,
    label: String,
    namespace: Option<&'a str>,
    name: &'a str,
}

pub fn print_streams(streams: &[&StreamKey], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<StreamOutput<'_>> = streams
                .iter()
                .map(|stream| StreamOutput {
                    key: stream.lookup_key(),
                    label: stream.display_label(),
                    namespace: stream.namespace(),
                    name: stream.name(),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KEY", "NAMESPACE", "NAME"]);
            for stream in streams {
                table.add_row(vec![
                    stream.lookup_key(),
                    stream.namespace().unwrap_or("-").to_string(),
                    stream.name().to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for stream in streams {
                println!("{} ({})", stream.display_label(), stream.lookup_key());
            }
        }
    }
}
