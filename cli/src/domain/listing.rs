//! Filtering of `systemctl list-units` output down to units this tool manages.
//!
//! Pure functions only; no I/O, no async.

use serde::Serialize;

use crate::domain::project::NAMESPACE_PREFIX;

/// Glyph systemd prints in front of units that no longer exist (or failed).
pub const NOT_FOUND_MARKER: char = '●';

/// Load state of units that still exist on the remote system.
pub const LOADED: &str = "loaded";

/// Marker that replaces the original indentation on display lines.
pub const BULLET: &str = "• ";

/// One data row of a unit listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRecord {
    #[serde(skip)]
    pub raw_line: String,
    pub namespaced_name: String,
    pub load_state: String,
    pub display_name: String,
    /// Columns after the load state (active, sub, description), whitespace-normalised.
    pub detail: String,
}

/// Parse a single data row.
///
/// Returns `None` for rows carrying the not-found marker and rows without
/// both a name and a load-state token.
#[must_use]
pub fn parse_row(line: &str) -> Option<ServiceRecord> {
    if line.starts_with(NOT_FOUND_MARKER) {
        return None;
    }
    let rest = line.trim_start_matches([' ', '\t']);
    let (name, rest) = next_token(rest)?;
    let (load_state, rest) = next_token(rest.trim_start_matches([' ', '\t']))?;
    let display_name = name.strip_prefix(NAMESPACE_PREFIX).unwrap_or(name);
    Some(ServiceRecord {
        raw_line: line.to_string(),
        namespaced_name: name.to_string(),
        load_state: load_state.to_string(),
        display_name: display_name.to_string(),
        detail: rest.split_whitespace().collect::<Vec<_>>().join(" "),
    })
}

fn next_token(s: &str) -> Option<(&str, &str)> {
    if s.is_empty() {
        return None;
    }
    let end = s.find([' ', '\t']).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

/// A row survives when it is namespaced and still loaded.
#[must_use]
pub fn is_managed(record: &ServiceRecord) -> bool {
    record.namespaced_name.starts_with(NAMESPACE_PREFIX) && record.load_state == LOADED
}

/// Split a listing into `(header, data rows)`.
///
/// The first line is the header and the last line is the manager's summary;
/// interior blank lines are discarded. Inputs with fewer than three lines
/// have no data rows.
#[must_use]
pub fn split_listing(raw: &str) -> (&str, Vec<&str>) {
    let lines: Vec<&str> = raw.trim_end_matches('\n').split('\n').collect();
    let header = lines.first().copied().unwrap_or_default();
    let rows = if lines.len() > 2 {
        lines[1..lines.len() - 1]
            .iter()
            .copied()
            .filter(|l| !l.trim().is_empty())
            .collect()
    } else {
        Vec::new()
    };
    (header, rows)
}

/// Managed, loaded units of a listing.
#[must_use]
pub fn managed_records(raw: &str) -> Vec<ServiceRecord> {
    let (_, rows) = split_listing(raw);
    rows.into_iter()
        .filter_map(parse_row)
        .filter(is_managed)
        .collect()
}

/// Display line: bullet instead of indentation, prefix stripped from the name.
#[must_use]
pub fn display_line(record: &ServiceRecord) -> String {
    let body = record.raw_line.trim_start_matches([' ', '\t']);
    let after_name = &body[record.namespaced_name.len()..];
    format!("{BULLET}{}{after_name}", record.display_name)
}

/// Header, then one display line per managed unit, then a trailing newline.
#[must_use]
pub fn filter_listing(raw: &str) -> String {
    let (header, _) = split_listing(raw);
    let mut out = header.to_string();
    out.push('\n');
    for record in managed_records(raw) {
        out.push_str(&display_line(&record));
        out.push('\n');
    }
    out
}
