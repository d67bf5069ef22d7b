//! Path pattern compilation and matching.
//!
//! Patterns select materialized paths recorded in a path index. The
//! grammar is deliberately small:
//!
//! - `/a/b`: child steps from the document root
//! - `//b`: descendant axis, `b` at any depth from that point on
//! - `*`: a single step of any name
//!
//! Several patterns can be combined with `;`, matching with OR semantics.
//! An absent or empty expression compiles to a filter that matches every
//! path. Malformed input is a compilation error, never silently ignored.

use std::sync::Arc;

use sylva_common::{Result, error::Error};
use sylva_store::node::NodePath;

/// How a pattern step relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// `/step`: exactly one level below.
    Child,
    /// `//step`: at any depth below the previous step.
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StepName {
    /// `*`, any single step name.
    Any,
    Name(Arc<str>),
}

impl StepName {
    fn matches(&self, segment: &str) -> bool {
        match self {
            StepName::Any => true,
            StepName::Name(name) => name.as_ref() == segment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PatternStep {
    axis: Axis,
    name: StepName,
}

/// One compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    steps: Vec<PatternStep>,
    text: String,
}

impl PathPattern {
    /// Compiles a single pattern.
    pub fn parse(text: &str) -> Result<PathPattern> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::filter_compilation(text, "empty pattern"));
        }
        let mut steps = Vec::new();
        let mut rest = trimmed;
        while !rest.is_empty() {
            let axis = if let Some(tail) = rest.strip_prefix("//") {
                rest = tail;
                Axis::Descendant
            } else if let Some(tail) = rest.strip_prefix('/') {
                rest = tail;
                Axis::Child
            } else {
                return Err(Error::filter_compilation(
                    trimmed,
                    "every step must start with '/' or '//'",
                ));
            };
            let end = rest.find('/').unwrap_or(rest.len());
            let name = &rest[..end];
            rest = &rest[end..];
            if name.is_empty() {
                return Err(Error::filter_compilation(trimmed, "empty step name"));
            }
            if name.chars().any(char::is_whitespace) {
                return Err(Error::filter_compilation(
                    trimmed,
                    format!("step name contains whitespace: '{name}'"),
                ));
            }
            let name = if name == "*" {
                StepName::Any
            } else if name.contains('*') {
                return Err(Error::filter_compilation(
                    trimmed,
                    format!("wildcard must stand alone as a step: '{name}'"),
                ));
            } else {
                StepName::Name(Arc::from(name))
            };
            steps.push(PatternStep { axis, name });
        }
        Ok(PathPattern {
            steps,
            text: trimmed.to_string(),
        })
    }

    /// The pattern as written, trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether `path` matches this pattern in full.
    pub fn matches(&self, path: &NodePath) -> bool {
        match_steps(&self.steps, path.segments())
    }
}

fn match_steps(steps: &[PatternStep], segments: &[Arc<str>]) -> bool {
    let Some((step, remaining_steps)) = steps.split_first() else {
        // A pattern matches the whole path, not a prefix of it.
        return segments.is_empty();
    };
    match step.axis {
        Axis::Child => {
            let Some((segment, remaining_segments)) = segments.split_first() else {
                return false;
            };
            step.name.matches(segment) && match_steps(remaining_steps, remaining_segments)
        }
        Axis::Descendant => (0..segments.len()).any(|depth| {
            step.name.matches(&segments[depth])
                && match_steps(remaining_steps, &segments[depth + 1..])
        }),
    }
}

/// A compiled, stateless predicate over materialized paths.
///
/// The filter is immutable for the lifetime of the scan that owns it and
/// is safely reusable across pulls.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    patterns: Vec<PathPattern>,
}

impl PathFilter {
    /// A filter that matches every path.
    pub fn match_all() -> PathFilter {
        PathFilter::default()
    }

    /// Compiles an optional semicolon-delimited pattern list.
    ///
    /// `None`, an empty string, and a string containing only separators
    /// and whitespace all compile to [`PathFilter::match_all`]. Any
    /// non-empty piece must parse; a malformed piece fails the whole
    /// compilation.
    pub fn compile(expressions: Option<&str>) -> Result<PathFilter> {
        let Some(expressions) = expressions else {
            return Ok(PathFilter::match_all());
        };
        let mut patterns = Vec::new();
        for piece in expressions.split(';') {
            if piece.trim().is_empty() {
                continue;
            }
            patterns.push(PathPattern::parse(piece)?);
        }
        Ok(PathFilter { patterns })
    }

    /// Whether this filter admits every path.
    pub fn is_match_all(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `path` matches at least one pattern (OR semantics), or the
    /// filter is match-all.
    pub fn matches(&self, path: &NodePath) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|pattern| pattern.matches(path))
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }
}
