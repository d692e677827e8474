//! Route pattern parsing.
//!
//! A pattern such as `archive/:year/:month/:day` or `hi/*file` is split into
//! an ordered list of [`Segment`]s: literal text, named dynamic parts
//! (`:name` or `:(name)`), and at most one greedy glob (`*name`). The
//! segment list is what both the matcher and the generator walk; the
//! regular expression used for matching is derived from it when the
//! mapper's table is compiled.

use std::collections::HashSet;

use routes_rs_core::PatternError;

/// Characters that naturally separate the parts of a URL.
pub const SPLIT_CHARS: [char; 5] = ['/', ',', ';', '.', '#'];

/// Returns `true` if `c` separates URL parts.
pub fn is_split_char(c: char) -> bool {
    SPLIT_CHARS.contains(&c)
}

/// One element of a parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text that must match exactly.
    Static(String),
    /// A named part matching a single path component.
    Dynamic {
        /// The parameter name.
        name: String,
        /// A regular expression the value must match, if any.
        requirement: Option<String>,
    },
    /// A named part matching the rest of the path, slashes included.
    Glob(String),
}

impl Segment {
    /// Returns the parameter name for dynamic and glob segments.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Static(_) => None,
            Self::Dynamic { name, .. } | Self::Glob(name) => Some(name),
        }
    }

    /// Returns `true` for a static segment whose text is exactly one split character.
    pub(crate) fn is_split_char(&self) -> bool {
        match self {
            Self::Static(text) => {
                let mut chars = text.chars();
                matches!((chars.next(), chars.next()), (Some(c), None) if is_split_char(c))
            }
            _ => false,
        }
    }

    /// Returns `true` for a static segment ending in a split character.
    pub(crate) fn ends_with_split_char(&self) -> bool {
        match self {
            Self::Static(text) => text.chars().last().is_some_and(is_split_char),
            _ => false,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VarKind {
    Dynamic,
    Glob,
}

/// Parses a route pattern into its segments.
///
/// A single leading `/` is ignored. A name introduced by `:` or `*` ends at
/// the next split character or `-`, unless it is parenthesized, in which case
/// it ends at `)`. A split character that ends a name becomes a static segment
/// of its own; a `-` starts the following static text.
///
/// # Errors
///
/// Returns a [`PatternError`] for an unterminated `:(`, an empty or invalid
/// parameter name, a repeated parameter name, or a second glob.
///
/// # Examples
///
/// ```
/// use routes_rs_http::urls::pattern::{compile, Segment};
///
/// let segments = compile("archive/:year/:(month).html").unwrap();
/// assert_eq!(segments[0], Segment::Static("archive/".into()));
/// assert_eq!(segments[1].name(), Some("year"));
/// assert_eq!(segments[2], Segment::Static("/".into()));
/// assert_eq!(segments[3].name(), Some("month"));
/// assert_eq!(segments[4], Segment::Static(".html".into()));
/// ```
pub fn compile(pattern: &str) -> Result<Vec<Segment>, PatternError> {
    let body = pattern.strip_prefix('/').unwrap_or(pattern);

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut collecting: Option<VarKind> = None;
    let mut just_started = false;
    let mut parenthesized = false;

    for c in body.chars() {
        let Some(kind) = collecting else {
            if c == ':' || c == '*' {
                if !current.is_empty() {
                    segments.push(Segment::Static(std::mem::take(&mut current)));
                }
                collecting = Some(if c == ':' {
                    VarKind::Dynamic
                } else {
                    VarKind::Glob
                });
                just_started = true;
                parenthesized = false;
            } else {
                current.push(c);
            }
            continue;
        };

        if just_started {
            just_started = false;
            if c == '(' {
                parenthesized = true;
                continue;
            }
        }

        let terminates = if parenthesized {
            c == ')'
        } else {
            is_split_char(c) || c == '-'
        };

        if !terminates {
            current.push(c);
            continue;
        }

        collecting = None;
        segments.push(variable(pattern, kind, std::mem::take(&mut current))?);
        if is_split_char(c) {
            segments.push(Segment::Static(c.to_string()));
        } else if c == '-' {
            current.push(c);
        }
    }

    if let Some(kind) = collecting {
        if parenthesized {
            return Err(PatternError::Unterminated {
                pattern: pattern.to_string(),
                name: current,
            });
        }
        segments.push(variable(pattern, kind, current)?);
    } else if !current.is_empty() {
        segments.push(Segment::Static(current));
    }

    validate(pattern, &segments)?;
    Ok(segments)
}

fn variable(pattern: &str, kind: VarKind, name: String) -> Result<Segment, PatternError> {
    if name.is_empty() {
        return Err(PatternError::EmptyParameter {
            pattern: pattern.to_string(),
        });
    }
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(PatternError::InvalidParameter {
            pattern: pattern.to_string(),
            name,
        });
    }
    Ok(match kind {
        VarKind::Dynamic => Segment::Dynamic {
            name,
            requirement: None,
        },
        VarKind::Glob => Segment::Glob(name),
    })
}

fn validate(pattern: &str, segments: &[Segment]) -> Result<(), PatternError> {
    let mut seen = HashSet::new();
    let mut globs = 0;
    for segment in segments {
        if matches!(segment, Segment::Glob(_)) {
            globs += 1;
            if globs > 1 {
                return Err(PatternError::MultipleGlobs {
                    pattern: pattern.to_string(),
                });
            }
        }
        if let Some(name) = segment.name() {
            if !seen.insert(name) {
                return Err(PatternError::DuplicateParameter {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }
        }
    }
    Ok(())
}
