//! Report sink
//!
//! A write-only, streaming consumer of outcome rows used for progress
//! display. The engine works headless without one; nothing here affects
//! correctness of the orchestration.

use std::collections::BTreeMap;
use std::io;

use serde_json::Value;

use crate::types::{ActionArtifact, ActionOutcome, OutcomeStatus, StrictAction};

/// One formatted report row per executed action.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub contract_name: String,
    /// Argument / library / function lines describing the action.
    pub detail: Vec<String>,
    /// Outcome column: artifact summary or error with captured output.
    pub response: String,
    pub failed: bool,
}

impl ReportRow {
    /// Build a row from a strict action and its outcome.
    pub fn from_outcome(action: &StrictAction, outcome: &ActionOutcome) -> Self {
        let detail = match action {
            StrictAction::Deploy(a) => {
                let mut lines = format_args(&a.args, &a.arg_names, &a.arg_types);
                lines.extend(format_libraries(&a.libraries));
                lines
            }
            StrictAction::Initialize(a) => {
                let mut lines = vec![format!("  {} ({})", a.function_name, a.address)];
                lines.extend(format_args(&a.args, &a.arg_names, &a.arg_types));
                lines
            }
            StrictAction::Verify(a) => {
                let mut lines = vec![format!("  ({})", a.address)];
                lines.extend(format_args(&a.args, &[], &[]));
                lines.extend(format_libraries(&a.libraries));
                lines
            }
        };

        let (response, failed) = match &outcome.status {
            OutcomeStatus::Succeeded { artifact } => (format_artifact(artifact), false),
            OutcomeStatus::Failed { error } => {
                let mut text = error.clone();
                if !outcome.log_lines.is_empty() {
                    text.push(' ');
                    text.push_str(&outcome.log_lines.join(" "));
                }
                (text, true)
            }
        };

        Self {
            contract_name: outcome.contract_name.clone(),
            detail,
            response,
            failed,
        }
    }
}

/// Format argument lines as `  name(type): value`, tolerating missing
/// display metadata.
pub fn format_args(args: &[Value], names: &[String], types: &[String]) -> Vec<String> {
    args.iter()
        .enumerate()
        .map(|(i, value)| {
            let name = names.get(i).map(String::as_str).unwrap_or("");
            let type_suffix = types
                .get(i)
                .map(|t| format!("({t})"))
                .unwrap_or_default();
            format!("  {name}{type_suffix}: {value}")
        })
        .collect()
}

/// Format library lines as `  name: address`.
pub fn format_libraries(libraries: &BTreeMap<String, String>) -> Vec<String> {
    libraries
        .iter()
        .map(|(name, address)| format!("  {name}: {address}"))
        .collect()
}

fn format_artifact(artifact: &ActionArtifact) -> String {
    match artifact {
        ActionArtifact::Deployed {
            address,
            transaction_hash,
        } => {
            if transaction_hash.is_empty() {
                format!("deployed at {address}")
            } else {
                format!("deployed at {address} (tx {transaction_hash})")
            }
        }
        ActionArtifact::Called {
            transaction_hash, ..
        } => format!("call confirmed (tx {transaction_hash})"),
        ActionArtifact::Verified => "verified".to_string(),
    }
}

/// Streaming consumer of report rows.
///
/// Driven strictly in action-list order since the engine is sequential;
/// `close` is called once after the last row.
pub trait ReportSink: Send {
    fn write(&mut self, row: ReportRow, index: usize);
    fn close(&mut self);
}

/// Collects rows in memory. Used by tests and callers that render later.
#[derive(Debug, Default)]
pub struct BufferedReportSink {
    pub rows: Vec<(usize, ReportRow)>,
    pub closed: bool,
}

impl BufferedReportSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for BufferedReportSink {
    fn write(&mut self, row: ReportRow, index: usize) {
        self.rows.push((index, row));
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// Writes plain-text rows to any writer, one block per action.
pub struct TextReportSink<W: io::Write + Send> {
    out: W,
}

impl<W: io::Write + Send> TextReportSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: io::Write + Send> ReportSink for TextReportSink<W> {
    fn write(&mut self, row: ReportRow, index: usize) {
        let marker = if row.failed { "FAIL" } else { " ok " };
        let _ = writeln!(self.out, "[{marker}] #{index} {}", row.contract_name);
        for line in &row.detail {
            let _ = writeln!(self.out, "       {line}");
        }
        let _ = writeln!(self.out, "       -> {}", row.response);
    }

    fn close(&mut self) {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::types::{ActionKind, DeployAction};

    fn deploy_action() -> StrictAction {
        StrictAction::Deploy(DeployAction {
            contract_name: "Token".to_string(),
            source_path: "contracts/Token.sol".to_string(),
            qualified_name: "contracts/Token.sol:Token".to_string(),
            args: vec![json!("0xB"), json!(18)],
            arg_names: vec!["owner".to_string(), "decimals".to_string()],
            arg_types: vec!["address".to_string(), "uint8".to_string()],
            libraries: BTreeMap::new(),
            interface_definition: Value::Null,
        })
    }

    #[test]
    fn test_row_for_successful_deploy() {
        let outcome = ActionOutcome {
            index: 0,
            contract_name: "Token".to_string(),
            kind: ActionKind::Deploy,
            status: OutcomeStatus::Succeeded {
                artifact: ActionArtifact::Deployed {
                    address: "0xA".to_string(),
                    transaction_hash: "0xT".to_string(),
                },
            },
            log_lines: Vec::new(),
        };
        let row = ReportRow::from_outcome(&deploy_action(), &outcome);
        assert!(!row.failed);
        assert_eq!(row.response, "deployed at 0xA (tx 0xT)");
        assert_eq!(row.detail[0], "  owner(address): \"0xB\"");
        assert_eq!(row.detail[1], "  decimals(uint8): 18");
    }

    #[test]
    fn test_row_for_failure_appends_captured_output() {
        let outcome = ActionOutcome {
            index: 1,
            contract_name: "Token".to_string(),
            kind: ActionKind::Deploy,
            status: OutcomeStatus::Failed {
                error: "transaction reverted: out of gas".to_string(),
            },
            log_lines: vec!["gas estimate failed".to_string()],
        };
        let row = ReportRow::from_outcome(&deploy_action(), &outcome);
        assert!(row.failed);
        assert_eq!(
            row.response,
            "transaction reverted: out of gas gas estimate failed"
        );
    }

    #[test]
    fn test_buffered_sink_preserves_order_and_close() {
        let mut sink = BufferedReportSink::new();
        let outcome = ActionOutcome {
            index: 0,
            contract_name: "Token".to_string(),
            kind: ActionKind::Deploy,
            status: OutcomeStatus::Succeeded {
                artifact: ActionArtifact::Deployed {
                    address: "0xA".to_string(),
                    transaction_hash: "0xT".to_string(),
                },
            },
            log_lines: Vec::new(),
        };
        sink.write(ReportRow::from_outcome(&deploy_action(), &outcome), 0);
        sink.close();
        assert_eq!(sink.rows.len(), 1);
        assert!(sink.closed);
    }
}
