//! # Error and Result for this crate
//!
//! This crate defines a common [Error] structure that's used across this crate, or that certain
//! utilities convert their errors to.
//!
//! Parsing errors are raised as [`ErrorType::Syntax`] errors. The grammar itself only knows the
//! byte offset at which matching stopped; [`get_location`] and [`print_span`] are the utilities
//! that turn such an offset into a line/column [Location] and a source snippet.

use std::ops::Range;
use std::{error, fmt, result};

/// A byte range into a source text.
pub type Span = Range<usize>;

/// This crate's result type using the [Error] structure.
pub type Result<T> = result::Result<T, Error>;

/// This crate's error structure which internal errors are converted into.
///
/// The error is split into a general message and a context string. For parsing, for instance, the
/// context string is populated with a snippet of the source text.
///
/// The Error implements both the [`fmt::Display`] and [`fmt::Debug`] traits. It also implements
/// [`error::Error`] so that it can be used with existing patterns for error handling.
#[derive(PartialEq, Eq, Clone)]
pub struct Error {
    pub(crate) message: String,
    pub(crate) location: Option<Location>,
    pub(crate) context: Option<String>,
    pub(crate) error_type: ErrorType,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorType {
    GraphQL,
    Syntax,
}

impl Error {
    /// Create a new Error with only a main message from an input string.
    pub fn new<S: Into<String>>(message: S, error_type: Option<ErrorType>) -> Self {
        Self {
            message: message.into(),
            location: None,
            context: None,
            error_type: error_type.unwrap_or(ErrorType::GraphQL),
        }
    }

    /// Create a new Error with a main message and a context string from two input strings.
    pub fn new_with_context<S: Into<String>>(
        message: S,
        location: Option<Location>,
        context: S,
        error_type: Option<ErrorType>,
    ) -> Self {
        Self {
            message: message.into(),
            location,
            context: Some(context.into()),
            error_type: error_type.unwrap_or(ErrorType::GraphQL),
        }
    }

    /// Returns the message of the current error. The context is discarded.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Returns the location of the current error.
    pub fn location(&self) -> &Option<Location> {
        &self.location
    }

    /// Returns the kind of error this is.
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Formats this error, with the option to include the context information as well,
    /// which will cause the string to be multi-line.
    pub fn print(&self, include_ctx: bool) -> String {
        let formatted = match self.error_type {
            ErrorType::GraphQL => {
                format!("GraphQL Error: {}", self.message)
            }
            ErrorType::Syntax => {
                format!("Syntax Error: {}", self.message)
            }
        };

        match self.context {
            Some(ref context) if include_ctx => format!("{}\n{}", formatted, context),
            _ => formatted,
        }
    }
}

/// Creates the span of the single character at `offset`, or an empty span at the end of input.
pub fn span_at(source: &str, offset: usize) -> Span {
    let start = offset.min(source.len());
    let end = source[start..]
        .chars()
        .next()
        .map_or(start, |c| start + c.len_utf8());
    start..end
}

/// Prints the lines of `source` surrounding `span` with line numbers, and marks the span with
/// carets when it's on a single line.
pub fn print_span(source: &str, span: Span) -> String {
    let mut out = String::new();
    let start_line = source[..span.start].matches('\n').count() + 1;

    // include one line of context before the span's line
    let (start, first_line) = match source[..span.start].rfind('\n') {
        Some(idx) => match source[..idx].rfind('\n') {
            Some(before) => (before + 1, start_line - 1),
            None => (0, start_line - 1),
        },
        None => (0, start_line),
    };

    let end = source[span.end..]
        .find('\n')
        .map_or(source.len(), |idx| idx + span.end);

    let snippet = &source[start..end];
    let last_line = first_line + snippet.lines().count().max(1) - 1;
    let line_num_pad = last_line.to_string().len();
    for (index, line) in snippet.lines().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let line_num = (first_line + index).to_string();
        out.push_str(&" ".repeat(line_num_pad - line_num.len() + 1));
        out.push_str(&line_num);
        out.push_str(" | ");
        out.push_str(line);
    }
    if !source[span.start..span.end].contains('\n') {
        let line_start = source[..span.start].rfind('\n').map_or(0, |idx| idx + 1);
        out.push('\n');
        out.push_str(&" ".repeat(line_num_pad + 1));
        out.push_str(" | ");
        out.push_str(&" ".repeat(source[line_start..span.start].chars().count()));
        out.push_str(&"^".repeat(source[span.start..span.end].chars().count().max(1)));
    };

    out
}

/// A line (starting at `1`) and column (starting at `0`) in a source text.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// Converts a byte offset into `source` to a [Location].
pub fn get_location(source: &str, offset: usize) -> Location {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before, |idx| &before[idx + 1..])
        .chars()
        .count();
    Location { line, column }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print(true))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}\n", self)
    }
}

impl error::Error for Error {}
