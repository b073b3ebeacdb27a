//! Unified, `miette`-based diagnostics for stanza-probe.
//!
//! Every failure the crate can surface is a [`ProbeError`]. Derivation itself never
//! fails (bad configuration degrades to fewer or emptier parameters); errors come
//! from loading files, reading YAML configuration, and the search collaborator.
//!
//! # Error Construction Macros
//!
//! - `err_msg!(Config, "Unknown fixture {}", name)` for message-only errors.
//! - `err_src!(Parse, "Unexpected token", source, span)` for errors with a
//!   pre-built `NamedSource` and span.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

pub type SourceArc = Arc<NamedSource<String>>;

/// Byte range into a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Type-safe error classification that mirrors the [`ProbeError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Reading a file or walking a directory failed
    Io,
    /// A `.conf` file is not syntactically valid
    Parse,
    /// The YAML configuration or a command-line value is invalid
    Config,
    /// The query-execution collaborator failed
    Search,
    Internal,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Io => "Io",
            ErrorType::Parse => "Parse",
            ErrorType::Config => "Config",
            ErrorType::Search => "Search",
            ErrorType::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The primary source for this error (if any).
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }
}

/// Unified error type for all stanza-probe failure modes.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Search error: {message}")]
    Search {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl ProbeError {
    fn parts(&self) -> (&str, &ErrorContext) {
        match self {
            ProbeError::Io { message, ctx, .. }
            | ProbeError::Parse { message, ctx, .. }
            | ProbeError::Config { message, ctx, .. }
            | ProbeError::Search { message, ctx, .. }
            | ProbeError::Internal { message, ctx, .. } => (message, ctx),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            ProbeError::Io { .. } => ErrorType::Io,
            ProbeError::Parse { .. } => ErrorType::Parse,
            ProbeError::Config { .. } => ErrorType::Config,
            ProbeError::Search { .. } => ErrorType::Search,
            ProbeError::Internal { .. } => ErrorType::Internal,
        }
    }

    /// Attaches the underlying cause, keeping message and context.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let slot = match &mut self {
            ProbeError::Io { source, .. }
            | ProbeError::Parse { source, .. }
            | ProbeError::Config { source, .. }
            | ProbeError::Search { source, .. }
            | ProbeError::Internal { source, .. } => source,
        };
        *slot = Some(Box::new(cause));
        self
    }

    /// Attaches a help message shown under the rendered diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        let ctx = match &mut self {
            ProbeError::Io { ctx, .. }
            | ProbeError::Parse { ctx, .. }
            | ProbeError::Config { ctx, .. }
            | ProbeError::Search { ctx, .. }
            | ProbeError::Internal { ctx, .. } => ctx,
        };
        ctx.help = Some(help.into());
        self
    }
}

impl Diagnostic for ProbeError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = format!("stanza_probe::{}", self.error_type().as_str().to_lowercase());
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.parts()
            .1
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.parts()
            .1
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let (message, ctx) = self.parts();
        let span = ctx.span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(message.to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Converts a file name and its text into a shareable `NamedSource`.
pub fn to_error_source(name: impl AsRef<str>, text: impl Into<String>) -> SourceArc {
    Arc::new(NamedSource::new(name.as_ref(), text.into()))
}

/// Constructs a ProbeError variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:expr, $($arg:expr),+ $(,)?) => {
        $crate::ProbeError::$variant {
            message: format!($msg, $($arg),+),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::ProbeError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a ProbeError variant with a pre-built `NamedSource` and span.
#[macro_export]
macro_rules! err_src {
    ($variant:ident, $msg:expr, $source:expr, $span:expr) => {
        $crate::ProbeError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_source_and_span(
                std::sync::Arc::clone($source),
                $span,
            ),
            source: None,
        }
    };
}
