/// A position in the source stream.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Mark {
    /// The byte offset into the stream.
    pub index: u64,
    /// The zero-based line.
    pub line: u64,
    /// The zero-based column.
    pub column: u64,
}

impl Mark {
    /// Create a mark from its raw coordinates.
    pub fn new(index: u64, line: u64, column: u64) -> Mark {
        Mark {
            index,
            line,
            column,
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Errors reported by a [`TokenSource`](crate::TokenSource).
///
/// The parser never inspects these; they propagate unchanged through
/// [`ParserError::Scanner`].
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("no more tokens")]
    UnexpectedEof,
    #[error("{}:{}: {} {} ({}:{})", problem_mark.line, problem_mark.column, problem, context, context_mark.line, context_mark.column)]
    Problem {
        context: &'static str,
        context_mark: Mark,
        problem: &'static str,
        problem_mark: Mark,
    },
}

/// Errors produced while parsing the token stream into events.
///
/// All of these are fatal: the first error ends the event stream.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// The grammar expected one token inside a collection and the scanner
    /// produced another. `context_mark` points at the opening of the
    /// enclosing collection or node, `mark` at the offending token.
    #[error("{}:{}: while parsing {} (started at {}:{}): expected {}, but found {}", mark.line, mark.column, context, context_mark.line, context_mark.column, expected, found)]
    Syntax {
        context: &'static str,
        context_mark: Mark,
        expected: &'static str,
        found: &'static str,
        mark: Mark,
    },
    /// A stream- or document-level token was missing.
    #[error("{}:{}: expected {}, but found {}", mark.line, mark.column, expected, found)]
    Unexpected {
        expected: &'static str,
        found: &'static str,
        mark: Mark,
    },
    #[error("{}:{}: duplicate %YAML directive", mark.line, mark.column)]
    DuplicateYamlDirective { mark: Mark },
    #[error("{}:{}: duplicate tag handle: {}", mark.line, mark.column, handle)]
    DuplicateTagHandle { handle: String, mark: Mark },
    #[error("{}:{}: incompatible document (version 1.x is required, found {})", mark.line, mark.column, version)]
    IncompatibleVersion { version: String, mark: Mark },
    /// A node used a tag handle that no `%TAG` directive (or default)
    /// defines in the current document.
    #[error("{}:{}: found undefined tag handle: {} (while parsing a node started at {}:{})", mark.line, mark.column, handle, context_mark.line, context_mark.column)]
    UndefinedTagHandle {
        handle: String,
        context_mark: Mark,
        mark: Mark,
    },
    #[error(transparent)]
    Scanner(#[from] ScannerError),
}
