use std::fmt;

/// Byte range within the input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering the whole of `input`.
    pub fn whole(input: &str) -> Self {
        Self::new(0, input.len())
    }
}

/// All errors produced by local-crontab.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The expression does not have the expected shape, or a field cannot be
    /// expanded within its domain.
    #[error("{message}")]
    Malformed {
        message: String,
        span: Span,
        input: String,
    },

    /// The timezone identifier is not in the timezone database.
    #[error("unknown timezone '{name}': {message}")]
    UnknownTimezone { name: String, message: String },

    /// The reference instant used to sample an offset could not be built.
    #[error("{message}")]
    Offset { message: String },
}

impl ConvertError {
    pub fn malformed(message: impl Into<String>, span: Span, input: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            span,
            input: input.into(),
        }
    }

    pub fn unknown_timezone(name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::UnknownTimezone {
            name: name.into(),
            message: message.to_string(),
        }
    }

    pub fn offset(message: impl Into<String>) -> Self {
        Self::Offset {
            message: message.into(),
        }
    }

    /// Format a rich error with the offending part of the input underlined.
    pub fn display_rich(&self) -> String {
        match self {
            Self::Malformed {
                message,
                span,
                input,
            } => format_span_error("error", message, span, input),
            other => format!("error: {other}"),
        }
    }
}

fn format_span_error(prefix: &str, message: &str, span: &Span, input: &str) -> String {
    let mut out = format!("{prefix}: {message}\n");
    out.push_str(&format!("  {input}\n"));
    let padding = " ".repeat(span.start + 2);
    let underline = "^".repeat(span.end.saturating_sub(span.start).max(1));
    out.push_str(&padding);
    out.push_str(&underline);
    out
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Split `input` on whitespace, keeping the byte span of every token.
pub(crate) fn tokens_with_spans(input: &str) -> Vec<(&str, Span)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in input.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                tokens.push((&input[s..i], Span::new(s, i)));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push((&input[s..], Span::new(s, input.len())));
    }
    tokens
}
