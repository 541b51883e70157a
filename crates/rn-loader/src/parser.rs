//! Map-description parser.
//!
//! # Format
//!
//! Line-oriented, whitespace-separated tokens:
//!
//! ```text
//! #coordinates          ← mode directive; anything else selects reference vectors
//! Romania (partial)     ← map name, free text
//! 3                     ← node count N
//! Arad 91 492           ← N lines: id x y   |   id distance bearing°
//! Sibiu 207 457
//! Zerind 108 531
//! 2                     ← road count M
//! Arad Sibiu 140        ← M lines: id id weight
//! Arad Zerind 75
//! ```
//!
//! Every road is installed in both directions.  Roads may only name nodes
//! declared above them.  Anything after the last road line is ignored.
//!
//! The parser populates a [`RoadNetworkBuilder`] and never publishes a
//! partial network: on any error the builder is dropped.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use rn_network::{BuildMode, RoadNetwork, RoadNetworkBuilder};

use crate::{LoadError, LoadResult};

/// Directive selecting [`BuildMode::Coordinates`].
pub const COORDINATES_DIRECTIVE: &str = "#coordinates";

/// Decode the mode directive on the first line.
pub fn build_mode(directive: &str) -> BuildMode {
    if directive.trim() == COORDINATES_DIRECTIVE {
        BuildMode::Coordinates
    } else {
        BuildMode::ReferenceVector
    }
}

/// Header and counts of a parsed description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSummary {
    pub mode:  BuildMode,
    pub name:  String,
    pub nodes: usize,
    pub roads: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse a map description into a new network.
///
/// `seed`, when given, is extended instead of starting from an empty
/// builder.  Its nodes may be referenced by road lines.
pub fn load_map_reader<R: BufRead>(
    reader: R,
    seed: Option<RoadNetworkBuilder>,
) -> LoadResult<RoadNetwork> {
    let mut builder = seed.unwrap_or_default();
    parse_into(reader, &mut builder)?;
    Ok(builder.build())
}

/// Like [`load_map_reader`] but over an in-memory description.
pub fn load_map_str(text: &str) -> LoadResult<RoadNetwork> {
    load_map_reader(text.as_bytes(), None)
}

/// Open `path` and parse it into a new network.
pub fn load_map_file(path: &Path) -> LoadResult<RoadNetwork> {
    let file = std::fs::File::open(path)
        .map_err(|e| LoadError::unavailable(&path.display().to_string(), e))?;
    load_map_reader(std::io::BufReader::new(file), None)
}

/// Run the build procedure against `builder`.
///
/// On error the builder may hold some of the declarations; callers that
/// need atomicity (everything in this crate) discard it.
pub fn parse_into<R: BufRead>(
    reader: R,
    builder: &mut RoadNetworkBuilder,
) -> LoadResult<MapSummary> {
    let mut lines = LineReader::new(reader);

    // ── Header ────────────────────────────────────────────────────────────
    let (line, directive) = lines.next_line("mode directive")?;
    let mode = build_mode(directive);
    builder
        .declare_mode(mode)
        .map_err(|e| LoadError::from_network(e, line, directive))?;

    let (_, name) = lines.next_line("map name")?;
    let name = name.to_owned();
    builder.set_name(name.clone());

    // ── Nodes ─────────────────────────────────────────────────────────────
    let node_count = lines.next_count("node count")?;
    for _ in 0..node_count {
        let (line, content) = lines.next_line("node line")?;
        let Some([id, a, b]) = split3(content) else {
            return Err(malformed_node(line, content, "expected `id v1 v2`"));
        };
        let (Some(a), Some(b)) = (parse_finite(a), parse_finite(b)) else {
            return Err(malformed_node(line, content, "node values must be finite numbers"));
        };
        builder
            .add_node(mode, id, a, b)
            .map_err(|e| LoadError::from_network(e, line, content))?;
        trace!(line, id, a, b, "node");
    }

    // ── Roads ─────────────────────────────────────────────────────────────
    let road_count = lines.next_count("road count")?;
    for _ in 0..road_count {
        let (line, content) = lines.next_line("road line")?;
        let Some([from, to, weight]) = split3(content) else {
            return Err(malformed_edge(line, content, "expected `id id weight`"));
        };
        let Some(weight) = parse_finite(weight).filter(|w| *w >= 0.0) else {
            return Err(malformed_edge(
                line,
                content,
                "weight must be a finite non-negative number",
            ));
        };
        builder
            .add_bidirectional_edge(from, to, weight)
            .map_err(|e| LoadError::from_network(e, line, content))?;
        trace!(line, from, to, weight, "road");
    }

    debug!(
        name = %name,
        ?mode,
        nodes = node_count,
        roads = road_count,
        "parsed map description"
    );

    Ok(MapSummary { mode, name, nodes: node_count, roads: road_count })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Reads one line at a time, tracking 1-based line numbers.
struct LineReader<R> {
    inner:   R,
    line_no: usize,
    buf:     String,
}

impl<R: BufRead> LineReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, line_no: 0, buf: String::new() }
    }

    /// Next line without its terminator, or `UnexpectedEof`.
    fn next_line(&mut self, expected: &'static str) -> LoadResult<(usize, &str)> {
        self.buf.clear();
        self.line_no += 1;
        let read = self.inner.read_line(&mut self.buf).map_err(|e| LoadError::Read {
            line: self.line_no,
            source: Arc::new(e),
        })?;
        if read == 0 {
            return Err(LoadError::UnexpectedEof { line: self.line_no, expected });
        }
        Ok((self.line_no, self.buf.trim_end_matches(['\n', '\r'])))
    }

    fn next_count(&mut self, field: &'static str) -> LoadResult<usize> {
        let (line, text) = self.next_line(field)?;
        text.trim().parse::<usize>().map_err(|_| LoadError::MalformedHeader {
            line,
            field,
            found: text.to_owned(),
        })
    }
}

/// Split into exactly three whitespace-separated tokens.
fn split3(content: &str) -> Option<[&str; 3]> {
    let mut tokens = content.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(a), Some(b), Some(c), None) => Some([a, b, c]),
        _ => None,
    }
}

fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn malformed_node(line: usize, content: &str, reason: &'static str) -> LoadError {
    LoadError::MalformedNodeLine { line, content: content.to_owned(), reason }
}

fn malformed_edge(line: usize, content: &str, reason: &'static str) -> LoadError {
    LoadError::MalformedEdgeLine { line, content: content.to_owned(), reason }
}
