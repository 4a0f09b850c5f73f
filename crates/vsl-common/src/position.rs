//! Position and line-map utilities.
//!
//! The editor hands the engine plain byte offsets, while several of the
//! completion heuristics need line-level context ("does the current line end
//! with a dot"). This module provides the offset <-> line/column conversion.

use crate::span::Span;

/// A position in a source file (0-indexed line and column).
/// Columns are counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Line map for efficient offset <-> position conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (line_starts[0] is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text. Lines are `\n`-terminated; a
    /// preceding `\r` is treated as part of the terminator when slicing.
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for nl in memchr::memchr_iter(b'\n', source.as_bytes()) {
            line_starts.push((nl + 1) as u32);
        }
        LineMap { line_starts }
    }

    /// The 0-indexed line containing `offset`.
    pub fn line_at(&self, offset: u32) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact as u32,
            Err(insert_point) => insert_point.saturating_sub(1) as u32,
        }
    }

    /// Convert a byte offset to a Position (line, column).
    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let line = self.line_at(offset);
        let line_start = self.line_start(line).unwrap_or(0);
        let clamped_end = (offset as usize).min(source.len());
        let start = (line_start as usize).min(clamped_end);
        let slice = source.get(start..clamped_end).unwrap_or("");
        Position {
            line,
            column: slice.chars().count() as u32,
        }
    }

    /// Convert a Position (line, column) to a byte offset.
    pub fn position_to_offset(&self, position: Position, source: &str) -> Option<u32> {
        let span = self.line_span(position.line, source)?;
        let slice = span.text(source);
        let mut byte_count = 0u32;
        let mut column = 0u32;
        for ch in slice.chars() {
            if column == position.column {
                break;
            }
            byte_count += ch.len_utf8() as u32;
            column += 1;
        }
        if column < position.column {
            return None;
        }
        Some(span.start + byte_count)
    }

    /// Span of a line's text, excluding the trailing `\r\n` or `\n`.
    pub fn line_span(&self, line: u32, source: &str) -> Option<Span> {
        let start = self.line_start(line)?;
        let end = match self.line_start(line + 1) {
            Some(next_start) => {
                let mut end = next_start.saturating_sub(1);
                if source.as_bytes().get(end.saturating_sub(1) as usize) == Some(&b'\r') {
                    end = end.saturating_sub(1);
                }
                end
            }
            None => source.len() as u32,
        };
        Some(Span::new(start, end))
    }

    /// The text of the line containing `offset`, up to but excluding the
    /// line terminator.
    pub fn line_text<'a>(&self, offset: u32, source: &'a str) -> &'a str {
        match self.line_span(self.line_at(offset), source) {
            Some(span) => span.text(source),
            None => "",
        }
    }

    /// Get the number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the starting offset of a line.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get(line as usize).copied()
    }
}

#[cfg(test)]
mod position_tests {
    use super::*;

    #[test]
    fn test_line_map_simple() {
        let source = "line1\nline2\nline3";
        let map = LineMap::build(source);

        assert_eq!(map.line_count(), 3);
        assert_eq!(map.offset_to_position(0, source), Position::new(0, 0));
        assert_eq!(map.offset_to_position(4, source), Position::new(0, 4));
        assert_eq!(map.offset_to_position(6, source), Position::new(1, 0));
        assert_eq!(map.offset_to_position(12, source), Position::new(2, 0));
    }

    #[test]
    fn test_line_text_excludes_terminator() {
        let source = "osc(30)\n.rotate(0.1)\n";
        let map = LineMap::build(source);

        assert_eq!(map.line_text(3, source), "osc(30)");
        assert_eq!(map.line_text(9, source), ".rotate(0.1)");
    }

    #[test]
    fn test_line_text_windows_line_endings() {
        let source = "osc(30)\r\n.out()";
        let map = LineMap::build(source);

        assert_eq!(map.line_text(0, source), "osc(30)");
        assert_eq!(map.line_text(10, source), ".out()");
    }

    #[test]
    fn test_position_to_offset_roundtrip() {
        let source = "osc(30,0.1)\n.color(1,0,0)\n.out()";
        let map = LineMap::build(source);

        for offset in 0..source.len() as u32 {
            let pos = map.offset_to_position(offset, source);
            let back = map.position_to_offset(pos, source).unwrap();
            assert_eq!(offset, back, "roundtrip failed for offset {}", offset);
        }
    }

    #[test]
    fn test_line_at_end_of_text() {
        let source = "osc()";
        let map = LineMap::build(source);

        assert_eq!(map.line_at(5), 0);
        assert_eq!(map.line_text(5, source), "osc()");
    }
}
