//! Date resolution for round records.
//!
//! Data files in the wild mix ISO dates, "21 May 2023" style dates and slash dates
//! from spreadsheet exports. We accept a fixed, ordered list of formats and keep
//! parsing deterministic: the first matching format wins and there is no
//! best-guess fallback.

use chrono::NaiveDate;

/// How a format separates its fields and where the year sits.
#[derive(Debug, Clone, Copy)]
enum Layout {
    /// `YYYY-MM-DD`, year first.
    Dashed,
    /// `D MMM YYYY`, whitespace separated, year last.
    Spaced,
    /// `M/D/YYYY` or `D/M/YYYY`, year last.
    Slashed,
}

/// Accepted date formats, in priority order.
///
/// - `%Y-%m-%d`: ISO dates (`2023-05-21`)
/// - `%d %b %Y` / `%d %B %Y`: English month names (`21 May 2023`, `1 September 2023`)
/// - `%m/%d/%Y` then `%d/%m/%Y`: slash dates; month-first is tried first, so
///   `04/05/2025` is April 5 while `21/05/2023` can only be day-first
///
/// Day and month fields accept one or two digits, which also covers `DD/MM/YYYY`.
/// Chrono is looser than these patterns in two ways (`%Y` takes any number of
/// digits and a format space matches zero or more whitespace), so every match is
/// also checked against `Layout`: three fields and a four-digit year.
const FMTS: [(&str, Layout); 5] = [
    ("%Y-%m-%d", Layout::Dashed),
    ("%d %b %Y", Layout::Spaced),
    ("%d %B %Y", Layout::Spaced),
    ("%m/%d/%Y", Layout::Slashed),
    ("%d/%m/%Y", Layout::Slashed),
];

fn has_layout(s: &str, layout: Layout) -> bool {
    let fields: Vec<&str> = match layout {
        Layout::Dashed => s.split('-').collect(),
        Layout::Spaced => s.split_whitespace().collect(),
        Layout::Slashed => s.split('/').collect(),
    };
    if fields.len() != 3 {
        return false;
    }
    let year = match layout {
        Layout::Dashed => fields[0],
        Layout::Spaced | Layout::Slashed => fields[2],
    };
    year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a date token using the accepted formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    FMTS.iter().find_map(|&(fmt, layout)| {
        let date = NaiveDate::parse_from_str(s, fmt).ok()?;
        has_layout(s, layout).then_some(date)
    })
}

/// Resolve a date token to whole days elapsed since `reference`.
///
/// Negative results mean the date is before the reference date.
pub fn resolve_elapsed_days(s: &str, reference: NaiveDate) -> Option<i64> {
    let date = parse_date(s)?;
    Some(date.signed_duration_since(reference).num_days())
}
