//! Header-based delimiter detection.

use std::fmt;

/// Locate the header: the first line with non-whitespace content.
///
/// Returns the byte offset where that line starts together with its text
/// (without the line terminator). Both delimiter detection and header
/// parsing go through this, so a line skipped by one is skipped by the
/// other.
pub fn header_line(text: &str) -> Option<(usize, &str)> {
    let mut offset = 0;

    for raw in text.split_inclusive('\n') {
        let line = raw.trim_end_matches(&['\r', '\n'][..]);
        if !line.trim().is_empty() {
            return Some((offset, line));
        }
        offset += raw.len();
    }

    None
}

/// Field separator of a topic sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// `,`
    #[default]
    Comma,
    /// `\t`
    Tab,
}

impl Delimiter {
    /// Detect the delimiter from the [`header_line`].
    ///
    /// A tab anywhere on that line selects [`Delimiter::Tab`] for the whole
    /// input; anything else (including an empty input) selects
    /// [`Delimiter::Comma`]. Later lines are never consulted.
    pub fn detect(text: &str) -> Self {
        let header = header_line(text).map_or("", |(_, line)| line);

        if header.contains('\t') {
            Delimiter::Tab
        } else {
            Delimiter::Comma
        }
    }

    /// Byte value handed to the record reader
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Tab => write!(f, "tab"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_in_header_selects_tab() {
        assert_eq!(Delimiter::detect("A\tB\nx\ty\n"), Delimiter::Tab);
    }

    #[test]
    fn test_header_without_tab_selects_comma() {
        assert_eq!(Delimiter::detect("A,B\nx,y\n"), Delimiter::Comma);
        assert_eq!(Delimiter::detect("Single\n"), Delimiter::Comma);
    }

    #[test]
    fn test_only_header_line_is_consulted() {
        // Data rows using tabs do not override a comma header.
        assert_eq!(Delimiter::detect("A,B\nx\ty\n"), Delimiter::Comma);
    }

    #[test]
    fn test_leading_blank_lines_are_skipped() {
        assert_eq!(Delimiter::detect("\n   \n\t\nA\tB\n"), Delimiter::Tab);
    }

    #[test]
    fn test_empty_input_defaults_to_comma() {
        assert_eq!(Delimiter::detect(""), Delimiter::Comma);
        assert_eq!(Delimiter::detect("\n\n"), Delimiter::Comma);
    }

    #[test]
    fn test_header_line_offsets() {
        assert_eq!(header_line("A,B\n"), Some((0, "A,B")));
        assert_eq!(header_line("\r\n \t \nA\tB\r\nx\ty"), Some((6, "A\tB")));
        assert_eq!(header_line("\"\"\nA,B\n"), Some((0, "\"\"")));
        assert_eq!(header_line(" \n\t\n"), None);
        assert_eq!(header_line(""), None);
    }

    #[test]
    fn test_byte_and_display() {
        assert_eq!(Delimiter::Comma.as_byte(), b',');
        assert_eq!(Delimiter::Tab.as_byte(), b'\t');
        assert_eq!(Delimiter::Tab.to_string(), "tab");
    }
}
