//! Display helpers for engine-reported datatype strings.
//!
//! Nested types such as `STRUCT(a INTEGER, b MAP(VARCHAR, INTEGER[]))` are
//! unreadable on one line inside a diagram node, so front ends either break
//! them up with [`format_datatype`] or cut them short with
//! [`truncate_datatype`].

use std::borrow::Cow;

const INDENT: usize = 2;

/// Break a nested datatype across lines, indenting each nesting level.
///
/// A line break follows every non-empty opening bracket and every comma, and
/// precedes every closing bracket of a non-empty group. Whitespace after a
/// comma is dropped in favour of the break.
///
/// This deliberately differs from the browser renderer's formatter, which
/// keeps `, ` inline with a doubled space. Every field sits on its own line
/// here; a port of the renderer should not restore the inline form.
pub fn format_datatype(datatype: &str) -> String {
    let chars: Vec<char> = datatype.chars().collect();
    let mut out = String::with_capacity(datatype.len() * 2);
    let mut level = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let prev = if i > 0 { Some(chars[i - 1]) } else { None };
        let next = chars.get(i + 1).copied();

        match c {
            '(' | '[' => {
                out.push(c);
                if next.is_some_and(|n| !is_close(n)) {
                    level += 1;
                    newline(&mut out, level);
                }
            }
            ')' | ']' => {
                if level > 0 && !prev.is_some_and(is_open) {
                    level -= 1;
                    newline(&mut out, level);
                }
                out.push(c);
            }
            ',' => {
                out.push(c);
                let mut j = i + 1;
                while chars.get(j).is_some_and(|n| *n == ' ') {
                    j += 1;
                }
                match chars.get(j) {
                    Some(n) if !is_close(*n) => {
                        newline(&mut out, level);
                        i = j;
                        continue;
                    }
                    _ => {}
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }

    out
}

/// Shorten `datatype` to at most `max` characters followed by an ellipsis.
///
/// `max == 0` disables truncation.
pub fn truncate_datatype(datatype: &str, max: usize) -> Cow<'_, str> {
    if max == 0 {
        return Cow::Borrowed(datatype);
    }
    match datatype.char_indices().nth(max) {
        Some((cut, _)) => Cow::Owned(format!("{}…", &datatype[..cut])),
        None => Cow::Borrowed(datatype),
    }
}

fn is_open(c: char) -> bool {
    c == '(' || c == '['
}

fn is_close(c: char) -> bool {
    c == ')' || c == ']'
}

fn newline(out: &mut String, level: usize) {
    out.push('\n');
    out.extend(std::iter::repeat(' ').take(level * INDENT));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_types_untouched() {
        assert_eq!(format_datatype("INTEGER"), "INTEGER");
        assert_eq!(format_datatype("VARCHAR"), "VARCHAR");
    }

    #[test]
    fn test_empty_groups_stay_inline() {
        assert_eq!(format_datatype("INTEGER[]"), "INTEGER[]");
        assert_eq!(format_datatype("f()"), "f()");
    }

    #[test]
    fn test_struct_broken_across_lines() {
        assert_eq!(
            format_datatype("STRUCT(a INTEGER, b VARCHAR)"),
            "STRUCT(\n  a INTEGER,\n  b VARCHAR\n)"
        );
    }

    #[test]
    fn test_nested_indentation() {
        assert_eq!(
            format_datatype("STRUCT(a MAP(VARCHAR,INTEGER[]))"),
            "STRUCT(\n  a MAP(\n    VARCHAR,\n    INTEGER[]\n  )\n)"
        );
    }

    #[test]
    fn test_decimal_params() {
        assert_eq!(format_datatype("DECIMAL(18,3)"), "DECIMAL(\n  18,\n  3\n)");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_datatype("VARCHAR", 10), "VARCHAR");
        assert_eq!(truncate_datatype("VARCHAR", 7), "VARCHAR");
        assert_eq!(truncate_datatype("VARCHAR", 3), "VAR…");
        assert_eq!(truncate_datatype("VARCHAR", 0), "VARCHAR");
        assert_eq!(truncate_datatype("ÄÖÜß", 2), "ÄÖ…");
    }
}
