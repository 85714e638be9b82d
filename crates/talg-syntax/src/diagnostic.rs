//! Diagnostics with source highlighting.
//!
//! ```
//! use talg_syntax::diagnostic::{DiagnosticBuilder, DiagnosticLevel, Emitter};
//! use talg_syntax::span::Span;
//!
//! let diagnostic = DiagnosticBuilder::new(
//!     DiagnosticLevel::Error,
//!     "unknown name 'Q'".to_string(),
//!     Span::new(4, 5, 1, 5, 1, 6),
//! )
//! .build();
//!
//! let text = Emitter::new(false).render(&diagnostic, "f : Q");
//! assert!(text.contains("   1 | f : Q"));
//! ```

use crate::error::LangError;
use crate::span::Span;
use std::fmt::{self, Write};
use talg_types::Catalogue;

/// A diagnostic message.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Diagnostic level
    pub level: DiagnosticLevel,
    /// Error code (e.g., "E0004")
    pub code: Option<String>,
    /// Primary message
    pub message: String,
    /// Source span
    pub span: Span,
    /// Suggestions
    pub suggestions: Vec<String>,
    /// Related notes
    pub notes: Vec<DiagnosticNote>,
}

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// The text cannot be typed
    Error,
    /// Suspicious but accepted
    Warning,
    /// Additional information
    Note,
    /// Suggestion for fixing the issue
    Help,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Note => write!(f, "note"),
            Self::Help => write!(f, "help"),
        }
    }
}

impl DiagnosticLevel {
    /// Returns the ANSI color code for this level.
    #[must_use]
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
            Self::Note => "\x1b[36m",
            Self::Help => "\x1b[32m",
        }
    }

    /// Returns the reset ANSI code.
    #[must_use]
    pub const fn reset_code() -> &'static str {
        "\x1b[0m"
    }

    /// Formats this level with colors if enabled.
    #[must_use]
    pub fn format_colored(&self, use_colors: bool) -> String {
        if use_colors {
            format!("{}{}{}", self.color_code(), self, Self::reset_code())
        } else {
            self.to_string()
        }
    }
}

/// A note attached to a diagnostic.
#[derive(Debug, Clone)]
pub struct DiagnosticNote {
    /// Note message
    pub message: String,
    /// Source span
    pub span: Span,
}

/// Builder for creating diagnostics.
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    /// Creates a new diagnostic builder.
    #[must_use]
    pub fn new(level: DiagnosticLevel, message: String, span: Span) -> Self {
        Self {
            diagnostic: Diagnostic {
                level,
                code: None,
                message,
                span,
                suggestions: Vec::new(),
                notes: Vec::new(),
            },
        }
    }

    /// Adds an error code to the diagnostic.
    #[must_use]
    pub fn code(mut self, code: String) -> Self {
        self.diagnostic.code = Some(code);
        self
    }

    /// Adds a suggestion to the diagnostic.
    #[must_use]
    pub fn suggest(mut self, suggestion: String) -> Self {
        self.diagnostic.suggestions.push(suggestion);
        self
    }

    /// Adds a note to the diagnostic.
    #[must_use]
    pub fn note(mut self, message: String, span: Span) -> Self {
        self.diagnostic.notes.push(DiagnosticNote { message, span });
        self
    }

    /// Builds the diagnostic.
    #[must_use]
    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

impl LangError {
    /// Converts the error to a diagnostic. Errors without a span point at
    /// the start of the text.
    #[must_use]
    pub fn to_diagnostic(&self, cat: &Catalogue) -> Diagnostic {
        let code = match self {
            Self::Lexer(_) => "E0001",
            Self::Parser(_) => "E0002",
            Self::Decl { .. } => "E0003",
            Self::Type { .. } => "E0004",
        };
        let span = self.span().unwrap_or(Span::point(0, 1, 1));

        let mut builder =
            DiagnosticBuilder::new(DiagnosticLevel::Error, self.render(cat), span)
                .code(code.to_string());
        if let Self::Parser(crate::error::ParserError::DanglingTypeList { .. }) = self {
            builder = builder.suggest("write `(A, B) ** C` or a product `A * B`".to_string());
        }
        builder.build()
    }
}

/// Formats diagnostics with source highlighting.
pub struct Emitter {
    /// Use colors in output
    use_colors: bool,
}

impl Emitter {
    /// Creates a new diagnostic emitter.
    #[must_use]
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Prints a diagnostic to stderr.
    pub fn emit(&self, diagnostic: &Diagnostic, source: &str) {
        eprint!("{}", self.render(diagnostic, source));
    }

    /// Prints a language error to stderr.
    pub fn emit_lang_error(&self, error: &LangError, cat: &Catalogue, source: &str) {
        self.emit(&error.to_diagnostic(cat), source);
    }

    /// Renders a diagnostic with the highlighted source lines.
    #[must_use]
    pub fn render(&self, diagnostic: &Diagnostic, source: &str) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write(&mut out, diagnostic, source);
        out
    }

    fn write(&self, out: &mut String, diagnostic: &Diagnostic, source: &str) -> fmt::Result {
        let span = diagnostic.span;
        let level = diagnostic.level.format_colored(self.use_colors);
        writeln!(
            out,
            "{}:{}:{}: {}",
            span.start_line, span.start_col, level, diagnostic.message
        )?;

        if let Some(code) = &diagnostic.code {
            writeln!(out, "   [{code}]")?;
        }

        self.write_highlight(out, diagnostic.level, span, source)?;

        for suggestion in &diagnostic.suggestions {
            let help = DiagnosticLevel::Help.format_colored(self.use_colors);
            writeln!(out, "   {help}: {suggestion}")?;
        }

        for note in &diagnostic.notes {
            let prefix = DiagnosticLevel::Note.format_colored(self.use_colors);
            writeln!(
                out,
                "   {} at {}:{}: {}",
                prefix, note.span.start_line, note.span.start_col, note.message
            )?;
        }
        Ok(())
    }

    fn write_highlight(
        &self,
        out: &mut String,
        level: DiagnosticLevel,
        span: Span,
        source: &str,
    ) -> fmt::Result {
        let lines: Vec<&str> = source.lines().collect();
        if lines.is_empty() {
            return Ok(());
        }

        let start_line = span.start_line.saturating_sub(1).min(lines.len() - 1);
        let end_line = span.end_line.saturating_sub(1).min(lines.len() - 1);

        for (line_idx, line) in lines.iter().enumerate().take(end_line + 1).skip(start_line) {
            writeln!(out, "{:4} | {line}", line_idx + 1)?;

            let from = if line_idx == start_line { span.start_col } else { 1 };
            let to = if line_idx == end_line {
                span.end_col
            } else {
                line.len() + 1
            };

            let indent = " ".repeat(from.saturating_sub(1));
            let width = to.saturating_sub(from).max(1);
            let marks = "^".repeat(width);
            if self.use_colors {
                writeln!(
                    out,
                    "     | {indent}{}{marks}{}",
                    level.color_code(),
                    DiagnosticLevel::reset_code()
                )?;
            } else {
                writeln!(out, "     | {indent}{marks}")?;
            }
        }
        Ok(())
    }
}
