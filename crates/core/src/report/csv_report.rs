//! CSV rendering of per-file turn tables and the cross-file summary.
//!
//! Absent values are written as empty fields so that "no data" stays
//! distinguishable from a measured zero.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::latency::domain::file_summary::FileSummary;
use crate::latency::domain::turn::Turn;
use crate::shared::constants::{SUMMARY_REPORT_FILENAME, TURN_REPORT_SUFFIX};

pub const TURN_COLUMNS: &[&str] = &[
    "file",
    "turn_index",
    "speaker",
    "start_ms",
    "end_ms",
    "duration_ms",
    "text",
    "next_speaker",
    "next_start_ms",
    "gap_to_next_ms",
    "speaker_change",
];

pub const SUMMARY_COLUMNS: &[&str] = &[
    "file",
    "turns",
    "speaker_changes",
    "avg_gap_ms",
    "median_gap_ms",
    "p95_gap_ms",
    "overlap_rate",
    "avg_positive_gap_ms",
];

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to create output folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes one row per turn, in turn order, preceded by a header.
pub fn write_turns<W: Write>(out: &mut W, file_id: &str, turns: &[Turn]) -> io::Result<()> {
    write_row(out, TURN_COLUMNS.iter().copied())?;
    for turn in turns {
        let row = [
            file_id.to_string(),
            turn.turn_index.to_string(),
            turn.speaker.clone(),
            turn.start_ms.to_string(),
            turn.end_ms.to_string(),
            turn.duration_ms.to_string(),
            turn.text.clone(),
            turn.next_speaker.clone().unwrap_or_default(),
            optional_int(turn.next_start_ms),
            optional_int(turn.gap_to_next_ms),
            turn.speaker_change.to_string(),
        ];
        write_row(out, row.iter().map(String::as_str))?;
    }
    Ok(())
}

/// Writes one row per summary, in the given order, preceded by a header.
///
/// `overlap_rate` is rendered as a percentage.
pub fn write_summaries<W: Write>(out: &mut W, summaries: &[FileSummary]) -> io::Result<()> {
    write_row(out, SUMMARY_COLUMNS.iter().copied())?;
    for summary in summaries {
        let row = [
            summary.file_id.clone(),
            summary.turns.to_string(),
            summary.speaker_changes.to_string(),
            optional_stat(summary.avg_gap_ms),
            optional_stat(summary.median_gap_ms),
            optional_stat(summary.p95_gap_ms),
            optional_stat(summary.overlap_rate.map(|rate| rate * 100.0)),
            optional_stat(summary.avg_positive_gap_ms),
        ];
        write_row(out, row.iter().map(String::as_str))?;
    }
    Ok(())
}

/// Assigns every input of a batch a distinct turn-table file name.
///
/// Names are `<stem>_turns.csv`. Inputs sharing a stem (`call.mp3`,
/// `call.wav`) keep their extension, `call.mp3_turns.csv`, and any name that
/// is still taken gets a numeric suffix.
pub fn turn_report_names<'a>(file_ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let ids: Vec<&str> = file_ids.into_iter().collect();
    let mut stem_counts: HashMap<String, usize> = HashMap::new();
    for id in &ids {
        *stem_counts.entry(file_stem(id)).or_default() += 1;
    }

    let mut taken = HashSet::new();
    ids.iter()
        .map(|id| {
            let stem = file_stem(id);
            let base = if stem_counts[&stem] > 1 {
                id.to_string()
            } else {
                stem
            };
            let mut name = format!("{base}{TURN_REPORT_SUFFIX}");
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{base}_{n}{TURN_REPORT_SUFFIX}");
                n += 1;
            }
            name
        })
        .collect()
}

fn file_stem(file_id: &str) -> String {
    Path::new(file_id)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_id.to_string())
}

/// Writes report files into an output folder, creating it on first use.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of a turn table named by [`turn_report_names`].
    pub fn turn_report_path(&self, report_name: &str) -> PathBuf {
        self.output_dir.join(report_name)
    }

    pub fn summary_report_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_REPORT_FILENAME)
    }

    pub fn write_turn_report(
        &self,
        report_name: &str,
        file_id: &str,
        turns: &[Turn],
    ) -> Result<PathBuf, ReportError> {
        let path = self.turn_report_path(report_name);
        self.write_file(&path, |out| write_turns(out, file_id, turns))?;
        Ok(path)
    }

    pub fn write_summary_report(
        &self,
        summaries: &[FileSummary],
    ) -> Result<PathBuf, ReportError> {
        let path = self.summary_report_path();
        self.write_file(&path, |out| write_summaries(out, summaries))?;
        Ok(path)
    }

    fn write_file(
        &self,
        path: &Path,
        render: impl FnOnce(&mut BufWriter<fs::File>) -> io::Result<()>,
    ) -> Result<(), ReportError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| ReportError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;
        let write_err = |source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = fs::File::create(path).map_err(write_err)?;
        let mut out = BufWriter::new(file);
        render(&mut out).map_err(write_err)?;
        out.flush().map_err(write_err)?;
        Ok(())
    }
}

fn write_row<'a, W: Write>(
    out: &mut W,
    fields: impl Iterator<Item = &'a str>,
) -> io::Result<()> {
    let line: Vec<String> = fields.map(escape_field).collect();
    out.write_all(line.join(",").as_bytes())?;
    out.write_all(b"\r\n")
}

/// Quotes a field when it contains a delimiter, quote, or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn optional_int(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn optional_stat(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}
