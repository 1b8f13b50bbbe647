//! Line-buffered source file reader used by the report annotator.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// All lines of `path` in order, without trailing newlines.
///
/// An unopenable or unreadable target yields `None`; callers annotate
/// nothing for that file instead of failing the report.
pub fn read_lines(path: impl AsRef<Path>) -> Option<Vec<String>> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "source file unavailable");
            return None;
        }
    };

    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        match line {
            Ok(line) => lines.push(line),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "source file unreadable");
                return None;
            }
        }
    }
    Some(lines)
}
