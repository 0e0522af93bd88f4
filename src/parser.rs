//! Edge-stream and vertex-list parsing (spec.md §6).
//!
//! No direct teacher counterpart exists (`g-raph`'s streams are built
//! in-memory via `random_graph`'s distributions, never read from text);
//! grounded instead on the line formats `original_source/src/read.cpp`
//! and the generators under `original_source/src/graphs/` both produce
//! and consume: `"<u> <v>"` for insertion-only, `"I <u> <v>"` /
//! `"D <u> <v>"` for insertion-deletion, one ASCII space between fields.

use std::io::BufRead;

use tracing::warn;

use crate::error::ParseError;
use crate::graph::edge::EdgeUpdate;
use crate::vertex::VertexId;

fn parse_vertex_field(field: &str, line: usize) -> Result<VertexId, ParseError> {
    field.parse::<VertexId>().map_err(|_| ParseError::NotAnInteger {
        line,
        value: field.to_owned(),
    })
}

/// Parse a single edge-stream record. `line` is the record's 1-based
/// position, used only for error messages.
pub fn parse_edge_line(record: &str, line: usize) -> Result<EdgeUpdate, ParseError> {
    let fields: Vec<&str> = record.split(' ').collect();
    match fields.as_slice() {
        [u, v] if !u.is_empty() && !v.is_empty() => {
            let u = parse_vertex_field(u, line)?;
            let v = parse_vertex_field(v, line)?;
            Ok(EdgeUpdate::insertion(u, v))
        }
        [sign, u, v] if !sign.is_empty() => {
            let u = parse_vertex_field(u, line)?;
            let v = parse_vertex_field(v, line)?;
            match *sign {
                "I" => Ok(EdgeUpdate::insertion(u, v)),
                "D" => Ok(EdgeUpdate::deletion(u, v)),
                other => Err(ParseError::UnknownSignPrefix {
                    line,
                    prefix: other.to_owned(),
                }),
            }
        }
        other => Err(ParseError::WrongFieldCount {
            line,
            found: other.len(),
        }),
    }
}

/// Streams [`EdgeUpdate`]s out of a `BufRead`, skipping malformed lines
/// with a logged warning and a running count rather than failing the
/// whole run (spec.md §7: parse errors are recovered locally).
pub struct EdgeStreamParser<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
    malformed: usize,
}

impl<R: BufRead> EdgeStreamParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            malformed: 0,
        }
    }

    /// Count of lines skipped so far because they were malformed.
    pub fn malformed_count(&self) -> usize {
        self.malformed
    }
}

impl<R: BufRead> Iterator for EdgeStreamParser<R> {
    type Item = EdgeUpdate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = self.lines.next()?;
            self.line_no += 1;
            let raw = match raw {
                Ok(line) => line,
                Err(err) => {
                    warn!(line = self.line_no, %err, "failed to read stream line");
                    self.malformed += 1;
                    continue;
                }
            };
            if raw.is_empty() {
                continue;
            }
            match parse_edge_line(&raw, self.line_no) {
                Ok(edge) => return Some(edge),
                Err(err) => {
                    warn!(line = self.line_no, %err, "skipping malformed edge record");
                    self.malformed += 1;
                    continue;
                }
            }
        }
    }
}

/// Parse one vertex-list record: `"<vertex>[,<ignored>]"`.
pub fn parse_vertex_line(record: &str, line: usize) -> Result<VertexId, ParseError> {
    let field = record.split(',').next().unwrap_or(record);
    parse_vertex_field(field, line)
}

/// Streams [`VertexId`]s out of a vertex-list file, used by the IDEngine
/// to pre-enumerate the vertex set it samples from.
pub struct VertexListParser<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
    malformed: usize,
}

impl<R: BufRead> VertexListParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            malformed: 0,
        }
    }

    pub fn malformed_count(&self) -> usize {
        self.malformed
    }
}

impl<R: BufRead> Iterator for VertexListParser<R> {
    type Item = VertexId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = self.lines.next()?;
            self.line_no += 1;
            let raw = match raw {
                Ok(line) => line,
                Err(err) => {
                    warn!(line = self.line_no, %err, "failed to read vertex line");
                    self.malformed += 1;
                    continue;
                }
            };
            if raw.is_empty() {
                continue;
            }
            match parse_vertex_line(&raw, self.line_no) {
                Ok(vertex) => return Some(vertex),
                Err(err) => {
                    warn!(line = self.line_no, %err, "skipping malformed vertex record");
                    self.malformed += 1;
                    continue;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_insertion_only_line() {
        let edge = parse_edge_line("3 4", 1).unwrap();
        assert_eq!(edge, EdgeUpdate::insertion(3, 4));
    }

    #[test]
    fn parses_insertion_deletion_lines() {
        assert_eq!(parse_edge_line("I 3 4", 1).unwrap(), EdgeUpdate::insertion(3, 4));
        assert_eq!(parse_edge_line("D 3 4", 1).unwrap(), EdgeUpdate::deletion(3, 4));
    }

    #[test]
    fn rejects_unknown_prefix() {
        let err = parse_edge_line("X 3 4", 5).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownSignPrefix {
                line: 5,
                prefix: "X".to_owned()
            }
        );
    }

    #[test]
    fn rejects_double_space() {
        let err = parse_edge_line("3  4", 2).unwrap_err();
        assert_eq!(err, ParseError::WrongFieldCount { line: 2, found: 3 });
    }

    #[test]
    fn rejects_non_integer_field() {
        let err = parse_edge_line("3 four", 9).unwrap_err();
        assert_eq!(
            err,
            ParseError::NotAnInteger {
                line: 9,
                value: "four".to_owned()
            }
        );
    }

    #[test]
    fn stream_parser_skips_malformed_lines_and_counts_them() {
        let data = "0 1\nI 0 2\nbroken\nD 0 2\n";
        let mut parser = EdgeStreamParser::new(Cursor::new(data));
        let edges: Vec<EdgeUpdate> = (&mut parser).collect();
        assert_eq!(
            edges,
            vec![
                EdgeUpdate::insertion(0, 1),
                EdgeUpdate::insertion(0, 2),
                EdgeUpdate::deletion(0, 2),
            ]
        );
        assert_eq!(parser.malformed_count(), 1);
    }

    #[test]
    fn vertex_list_parser_ignores_trailing_field() {
        let data = "0,5\n1,2\nnotavertex\n2\n";
        let mut parser = VertexListParser::new(Cursor::new(data));
        let vertices: Vec<VertexId> = (&mut parser).collect();
        assert_eq!(vertices, vec![0, 1, 2]);
        assert_eq!(parser.malformed_count(), 1);
    }
}
