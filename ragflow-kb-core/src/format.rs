//! # format: renderings of document and knowledge-base listings
//!
//! Turns fetched records into text (an aligned table, pretty JSON, or RFC 4180 CSV)
//! and writes that text to stdout or a file. Rendering and writing are separate steps
//! so a formatting failure is never confused with an I/O failure.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use comfy_table::presets::NOTHING;
use comfy_table::{ColumnConstraint, ContentArrangement, Table, Width};
use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use tracing::{error, info};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::contract::{DocumentRecord, KnowledgeBase};
use crate::error::{KbError, KbResult};

const TABLE_WIDTH: usize = 120;

const DOCUMENT_COLUMNS: [(&str, u16); 6] = [
    ("#", 6),
    ("Document ID", 30),
    ("Name", 40),
    ("Chunks", 10),
    ("Status", 15),
    ("Size", 12),
];

const KNOWLEDGE_BASE_COLUMNS: [(&str, u16); 5] = [
    ("#", 6),
    ("Knowledge Base ID", 40),
    ("Name", 40),
    ("Documents", 10),
    ("Chunks", 10),
];

/// Field order matches `DocumentRecord`'s serialized form.
const DOCUMENT_CSV_HEADER: [&str; 5] = ["document_id", "name", "chunk_count", "status", "size"];

/// Field order matches `KnowledgeBase`'s serialized form.
const KNOWLEDGE_BASE_CSV_HEADER: [&str; 4] = ["id", "name", "document_count", "chunk_count"];

/// Output format selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown format {other:?} (expected table, json or csv)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        })
    }
}

/// Where a rendering ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

pub fn render_documents(docs: &[DocumentRecord], format: OutputFormat) -> KbResult<String> {
    match format {
        OutputFormat::Table => Ok(document_table(docs)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(docs)?)),
        OutputFormat::Csv => to_csv(&DOCUMENT_CSV_HEADER, docs),
    }
}

pub fn render_knowledge_bases(kbs: &[KnowledgeBase], format: OutputFormat) -> KbResult<String> {
    match format {
        OutputFormat::Table => Ok(knowledge_base_table(kbs)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(kbs)?)),
        OutputFormat::Csv => to_csv(&KNOWLEDGE_BASE_CSV_HEADER, kbs),
    }
}

/// Document names only, one per line.
pub fn render_brief(docs: &[DocumentRecord]) -> String {
    docs.iter().map(|d| format!("{}\n", d.name)).collect()
}

/// Write `rendered` to `destination`, creating or truncating a target file.
pub fn write_output(rendered: &str, destination: &Destination) -> KbResult<()> {
    match destination {
        Destination::Stdout => {
            let mut out = std::io::stdout().lock();
            out.write_all(rendered.as_bytes())
                .and_then(|_| out.flush())
                .map_err(|source| KbError::Io {
                    path: PathBuf::from("<stdout>"),
                    source,
                })
        }
        Destination::File(path) => {
            fs::write(path, rendered).map_err(|e| {
                error!(error = ?e, path = %path.display(), "Failed to write output file");
                KbError::Io {
                    path: path.clone(),
                    source: e,
                }
            })?;
            info!(path = %path.display(), bytes = rendered.len(), "Output written");
            Ok(())
        }
    }
}

/// Human-readable size in megabytes, `-` for empty documents.
pub fn human_size(bytes: u64) -> String {
    if bytes == 0 {
        "-".to_string()
    } else {
        format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
    }
}

/// Cut `s` to `width - 2` display columns plus `..` when it does not fit in `width`.
fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let budget = width.saturating_sub(2);
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("..");
    out
}

/// Borderless fixed-width table; returns the header line followed by one line per row.
fn fixed_table(columns: &[(&str, u16)], rows: Vec<Vec<String>>) -> Vec<String> {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(columns.iter().map(|(title, _)| *title).collect::<Vec<_>>());
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(columns)
            .map(|(value, (_, width))| truncate(value, usize::from(*width)))
            .collect();
        table.add_row(cells);
    }
    for (column, (_, width)) in table.column_iter_mut().zip(columns) {
        column.set_padding((0, 1));
        column.set_constraint(ColumnConstraint::Absolute(Width::Fixed(*width + 1)));
    }
    table
        .to_string()
        .lines()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn document_table(docs: &[DocumentRecord]) -> String {
    let rows = docs
        .iter()
        .enumerate()
        .map(|(idx, doc)| {
            vec![
                (idx + 1).to_string(),
                doc.document_id.clone(),
                doc.name.clone(),
                doc.chunk_count.to_string(),
                format!("{} {}", doc.status.marker(), doc.status),
                human_size(doc.size),
            ]
        })
        .collect();
    let lines = fixed_table(&DOCUMENT_COLUMNS, rows);
    let rule = "=".repeat(TABLE_WIDTH);

    let mut out = format!("{rule}\n");
    let mut lines = lines.into_iter();
    if let Some(header) = lines.next() {
        out.push_str(&format!("{header}\n{rule}\n"));
    }
    for line in lines {
        out.push_str(&format!("{line}\n"));
    }
    out.push_str(&format!("{rule}\nTotal: {} documents\n", docs.len()));
    out
}

fn knowledge_base_table(kbs: &[KnowledgeBase]) -> String {
    let rows = kbs
        .iter()
        .enumerate()
        .map(|(idx, kb)| {
            vec![
                (idx + 1).to_string(),
                kb.id.clone(),
                kb.name.clone(),
                kb.document_count.to_string(),
                kb.chunk_count.to_string(),
            ]
        })
        .collect();
    let mut lines = fixed_table(&KNOWLEDGE_BASE_COLUMNS, rows).into_iter();

    let mut out = String::new();
    if let Some(header) = lines.next() {
        out.push_str(&format!("{header}\n{}\n", "-".repeat(TABLE_WIDTH)));
    }
    for line in lines {
        out.push_str(&format!("{line}\n"));
    }
    out.push_str(&format!("\nTotal: {} knowledge bases\n", kbs.len()));
    out
}

/// Header row plus one serialized record per row, quoted where needed.
fn to_csv<T: Serialize>(header: &[&str], rows: &[T]) -> KbResult<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| KbError::Format(format!("failed to flush CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| KbError::Format(e.to_string()))
}
