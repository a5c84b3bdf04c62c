pub mod ansi;
pub mod json;
pub mod registry;

use crate::binchunk::FormatError;
use crate::state::VmError;

/// Byte range within a chunk file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub message: String,
    pub label: Option<Label>,
    pub notes: Vec<String>,
    pub suggestion: Option<String>,
    /// Chunk bytes the label points into.
    pub source: Option<Vec<u8>>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            label: None,
            notes: Vec::new(),
            suggestion: None,
            source: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic { severity: Severity::Warning, ..Diagnostic::error(message) }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_span(mut self, span: Span, label: impl Into<String>) -> Self {
        self.label = Some(Label { span, message: label.into() });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_source(mut self, source: &[u8]) -> Self {
        self.source = Some(source.to_vec());
        self
    }
}

// ── From impls for the core error types ─────────────────────────────

impl From<&FormatError> for Diagnostic {
    fn from(e: &FormatError) -> Self {
        let start = e.offset();
        let (width, label) = match e {
            FormatError::NotAChunk { .. } => (4, "expected \\x1bLua"),
            FormatError::Corrupted { .. } => (6, "expected 19 93 0d 0a 1a 0a"),
            FormatError::EndiannessMismatch { .. } => (8, "expected 0x5678"),
            FormatError::FloatFormatMismatch { .. } => (8, "expected 370.5"),
            FormatError::Truncated { .. } => (0, "chunk ends here"),
            _ => (1, "here"),
        };
        let d = Diagnostic::error(e.to_string())
            .with_code(e.code())
            .with_span(Span { start, end: start + width }, label);

        match e {
            FormatError::NotAChunk { .. } => {
                d.with_suggestion("pass a file produced by `luac -o`, not Lua source")
            }
            FormatError::VersionMismatch { .. } | FormatError::FormatMismatch { .. } => {
                d.with_suggestion("recompile the source with luac 5.3")
            }
            FormatError::Corrupted { .. } => {
                d.with_note("line endings were probably converted when the file was copied")
            }
            FormatError::SizeMismatch { .. } | FormatError::EndiannessMismatch { .. } => {
                d.with_note("the chunk was compiled for a platform with different integer sizes or byte order")
            }
            FormatError::Truncated { needed, .. } => {
                d.with_note(format!("{needed} more byte(s) were expected"))
            }
            _ => d,
        }
    }
}

impl From<&VmError> for Diagnostic {
    fn from(e: &VmError) -> Self {
        Diagnostic::error(e.to_string()).with_code(e.code())
    }
}
