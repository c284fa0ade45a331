//! Plain-text output for the terminal. Every function returns the text so
//! callers decide where it goes.

use std::fmt::Write;

use khitan_core::ContextBlock;
use khitan_history::HistoryRecord;

use crate::events::analyze::Analysis;
use crate::status::StatusReport;

const LABEL_CHARS: usize = 20;

pub fn analysis(analysis: &Analysis) -> String {
    let record = &analysis.record;
    let mut out = String::new();

    let _ = writeln!(out, "== {} [{}] ==", record.query, record.mode.describe());
    let _ = writeln!(out, "{}", record.result.trim_end());
    let _ = writeln!(out);
    let _ = write!(
        out,
        "Record {} ({} context entries)",
        record.id, analysis.context.match_count
    );
    out
}

pub fn context(block: &ContextBlock) -> String {
    if block.is_empty() {
        return format!("0 matching entries\n{}", block.text);
    }

    let mut out = format!("{} matching entries", block.match_count);
    if !block.matched_tokens.is_empty() {
        let _ = write!(out, " (tokens: {})", block.matched_tokens.join(", "));
    }
    for line in block.lines() {
        let _ = write!(out, "\n  {line}");
    }
    out
}

pub fn history_list(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return "History is empty".to_string();
    }

    records
        .iter()
        .map(|r| format!("{}  {}  [{}]  {}", r.id, r.timestamp, r.mode, r.label(LABEL_CHARS)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn record(record: &HistoryRecord) -> String {
    format!(
        "== {} [{}] ==\n{}  {}  {} context entries\n\n{}",
        record.query,
        record.mode.describe(),
        record.id,
        record.timestamp,
        record.context_count,
        record.result.trim_end()
    )
}

pub fn evidence(record: &HistoryRecord, block: &ContextBlock) -> String {
    if block.is_empty() {
        return format!(
            "No glossary entry matched '{}'; this analysis was based on pure reasoning.",
            record.query
        );
    }

    let mut out = format!("Evidence for '{}' ({}):\n", record.query, record.mode);
    out.push_str(&context(block));
    out
}

pub fn status(report: &StatusReport) -> String {
    let meta = &report.glossary;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} [{}]: {} entries ({} glyph, {} phonetic)",
        meta.name, meta.language, meta.entry_count, meta.glyph_count, meta.phonetic_count
    );
    for line in &report.diagnostics {
        let _ = writeln!(out, "  {line}");
    }
    let _ = writeln!(out, "Direction: {} ({})", report.direction, report.direction.describe());
    let _ = writeln!(
        out,
        "Completion: {} / {} (credential {})",
        report.provider,
        report.model,
        if report.has_credential { "set" } else { "missing" }
    );
    let _ = write!(
        out,
        "History: {} records in {}",
        report.history_len,
        report.history_path.display()
    );
    if let Some(id) = &report.active_record {
        let _ = write!(out, "\nActive record: {id}");
    }
    out
}
