//! End-of-run profile report
//!
//! Aggregates the counter tables per source line and renders an annotated
//! listing: each line of each profiled file with the seconds and fetch
//! count attributed to it. Instructions without line info fall back to a
//! per-unit section keyed by bytecode offset, so stripped units still
//! show up instead of vanishing from the totals.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::clock::Clock;
use crate::interp::{CodeUnit, Interpreter};
use crate::profiler::Profiler;
use crate::source;

/// Seconds and fetch count attributed to one source line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineStats {
    pub hits: u64,
    pub time: f64,
}

/// Per-line aggregation for one source file.
#[derive(Debug, Default)]
pub struct FileStats {
    /// Line number to accumulated stats. Multiple instruction offsets on
    /// the same line sum here.
    pub lines: BTreeMap<u32, LineStats>,
}

impl FileStats {
    pub fn total_time(&self) -> f64 {
        self.lines.values().map(|s| s.time).sum()
    }

    pub fn total_hits(&self) -> u64 {
        self.lines.values().map(|s| s.hits).sum()
    }
}

/// An executed instruction with no source line to charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnattributedStats {
    pub unit: usize,
    pub offset: usize,
    pub stats: LineStats,
}

/// Everything the renderer needs, walkable by hosts that want their own
/// output format.
#[derive(Debug, Default)]
pub struct ProfileReport {
    pub files: BTreeMap<String, FileStats>,
    pub unattributed: Vec<UnattributedStats>,
    pub unit_count: usize,
    pub total_hits: u64,
    pub total_time: f64,
}

/// Aggregate the collected counters per (file, line).
pub fn collect<C: Clock, I: Interpreter>(profiler: &Profiler<C>, interp: &I) -> ProfileReport {
    let mut report = ProfileReport {
        unit_count: profiler.unit_count(),
        ..Default::default()
    };

    for (unit_index, table) in profiler.registry().iter().enumerate() {
        let unit = interp.unit(unit_index);
        for (offset, counter) in table.counters().iter().enumerate() {
            report.total_hits += counter.hits;
            report.total_time += counter.time;
            if counter.hits == 0 && counter.time == 0.0 {
                continue;
            }

            match (unit.source_file(), unit.source_line(offset)) {
                (Some(file), Some(line)) => {
                    let entry = report
                        .files
                        .entry(file.to_string())
                        .or_default()
                        .lines
                        .entry(line)
                        .or_default();
                    entry.hits += counter.hits;
                    entry.time += counter.time;
                }
                _ => report.unattributed.push(UnattributedStats {
                    unit: unit_index,
                    offset,
                    stats: LineStats {
                        hits: counter.hits,
                        time: counter.time,
                    },
                }),
            }
        }
    }

    report
}

/// Render the annotated listing. Files are ordered hottest first.
pub fn render(report: &ProfileReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "╔════════════════════════════════════════════════════════════╗"
    );
    let _ = writeln!(
        out,
        "║  Instruction Profile (per source line)                     ║"
    );
    let _ = writeln!(
        out,
        "╚════════════════════════════════════════════════════════════╝"
    );

    let mut files: Vec<(&String, &FileStats)> = report.files.iter().collect();
    files.sort_by(|a, b| {
        b.1.total_time()
            .partial_cmp(&a.1.total_time())
            .unwrap_or(Ordering::Equal)
    });

    for (path, stats) in files {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}  ({:.6}s, {} fetches)",
            path,
            stats.total_time(),
            stats.total_hits()
        );
        let _ = writeln!(out, "{:>12} {:>10}  {:>5}  Source", "Time(s)", "Hits", "Line");

        match source::read_lines(path) {
            Some(lines) => {
                for (i, text) in lines.iter().enumerate() {
                    let line_no = (i + 1) as u32;
                    match stats.lines.get(&line_no) {
                        Some(s) => {
                            let _ = writeln!(
                                out,
                                "{:>12.6} {:>10}  {:>5} | {}",
                                s.time, s.hits, line_no, text
                            );
                        }
                        None => {
                            let _ =
                                writeln!(out, "{:>12} {:>10}  {:>5} | {}", "", "", line_no, text);
                        }
                    }
                }
                // Stats past the end of the file as read now, e.g. the
                // source changed since it was compiled.
                for (&line_no, s) in stats.lines.range((lines.len() as u32 + 1)..) {
                    let _ = writeln!(
                        out,
                        "{:>12.6} {:>10}  {:>5} | <line not in file>",
                        s.time, s.hits, line_no
                    );
                }
            }
            None => {
                for (&line_no, s) in &stats.lines {
                    let _ = writeln!(out, "{:>12.6} {:>10}  {:>5} |", s.time, s.hits, line_no);
                }
            }
        }
    }

    if !report.unattributed.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No line info:");
        let _ = writeln!(out, "{:>12} {:>10}  {:>5}  {:>6}", "Time(s)", "Hits", "Unit", "Offset");
        for entry in &report.unattributed {
            let _ = writeln!(
                out,
                "{:>12.6} {:>10}  {:>5}  {:>6}",
                entry.stats.time, entry.stats.hits, entry.unit, entry.offset
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Totals: {} units, {} counted fetches, {:.6}s attributed",
        report.unit_count, report.total_hits, report.total_time
    );

    out
}

/// Collect and print the report to stderr.
pub fn print_report<C: Clock, I: Interpreter>(profiler: &Profiler<C>, interp: &I) {
    eprint!("{}", render(&collect(profiler, interp)));
}
