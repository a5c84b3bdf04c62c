use super::{Diagnostic, Severity};

const ROW: usize = 16;

pub struct AnsiRenderer {
    pub use_color: bool,
}

impl AnsiRenderer {
    fn bold(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[1m{s}\x1b[0m") } else { s.to_string() }
    }

    fn bold_red(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[1;31m{s}\x1b[0m") } else { s.to_string() }
    }

    fn bold_yellow(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[1;33m{s}\x1b[0m") } else { s.to_string() }
    }

    fn cyan(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[36m{s}\x1b[0m") } else { s.to_string() }
    }

    fn dim(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[2m{s}\x1b[0m") } else { s.to_string() }
    }

    pub fn render(&self, d: &Diagnostic) -> String {
        let mut out = String::new();

        // "error[LVM-F002]: message"
        let severity = match d.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let head = match d.code {
            Some(code) => format!("{severity}[{code}]"),
            None => severity.to_string(),
        };
        let head = match d.severity {
            Severity::Error => self.bold_red(&head),
            Severity::Warning => self.bold_yellow(&head),
        };
        out.push_str(&format!("{}: {}\n", head, self.bold(&d.message)));

        if let Some(label) = &d.label {
            let start = label.span.start;
            out.push_str(&format!("  {} byte {} ({:#x})\n", self.cyan("-->"), start, start));

            if let Some(source) = d.source.as_deref().filter(|s| !s.is_empty()) {
                // the row holding the span start, or the last row when the
                // span starts at end of input
                let row_start = start.min(source.len() - 1) / ROW * ROW;
                let row_end = (row_start + ROW).min(source.len());
                let row: Vec<String> =
                    source[row_start..row_end].iter().map(|b| format!("{b:02x}")).collect();

                let gutter = format!("{row_start:08x}");
                let pad = " ".repeat(gutter.len());
                let pipe = self.cyan("|");

                out.push_str(&format!("{pad} {pipe}\n"));
                out.push_str(&format!("{} {pipe} {}\n", self.cyan(&gutter), row.join(" ")));

                let col = start - row_start;
                let width = label.span.end.saturating_sub(start).clamp(1, ROW - col.min(ROW - 1));
                let indent = " ".repeat(col * 3);
                let carets = self.bold_red(&"^".repeat(width * 3 - 1));
                if label.message.is_empty() {
                    out.push_str(&format!("{pad} {pipe} {indent}{carets}\n"));
                } else {
                    out.push_str(&format!(
                        "{pad} {pipe} {indent}{carets} {}\n",
                        self.bold_red(&label.message)
                    ));
                }
                out.push_str(&format!("{pad} {pipe}\n"));
            }
        }

        for note in &d.notes {
            out.push_str(&format!("  {} note: {}\n", self.dim("="), note));
        }

        if let Some(suggestion) = &d.suggestion {
            out.push_str(&format!("  {} suggestion: {}\n", self.dim("="), suggestion));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::super::Span;
    use super::*;

    fn chunk() -> Vec<u8> {
        (0u8..40).collect()
    }

    fn make_diag(start: usize, end: usize) -> Diagnostic {
        Diagnostic::error("version mismatch")
            .with_code("LVM-F002")
            .with_span(Span { start, end }, "here")
            .with_source(&chunk())
            .with_note("some note")
            .with_suggestion("recompile")
    }

    #[test]
    fn render_contains_code_and_message() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag(4, 5));
        assert!(out.starts_with("error[LVM-F002]: version mismatch\n"), "got:\n{out}");
    }

    #[test]
    fn render_contains_location() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag(20, 21));
        assert!(out.contains("--> byte 20 (0x14)"), "got:\n{out}");
    }

    #[test]
    fn render_shows_the_row_holding_the_offset() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag(20, 21));
        assert!(out.contains("00000010 | 10 11 12 13 14 15"), "got:\n{out}");
        assert!(!out.contains("00000000 |"), "got:\n{out}");
    }

    #[test]
    fn carets_cover_the_span() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag(2, 4));
        let caret_line = out.lines().find(|l| l.contains('^')).unwrap();
        assert_eq!(caret_line, "         |       ^^^^^ here");
    }

    #[test]
    fn span_at_end_of_input_uses_last_row() {
        let r = AnsiRenderer { use_color: false };
        let d = Diagnostic::error("truncated")
            .with_span(Span { start: 40, end: 40 }, "chunk ends here")
            .with_source(&chunk());
        let out = r.render(&d);
        assert!(out.contains("00000020 | 20 21 22 23 24 25 26 27\n"), "got:\n{out}");
        assert!(out.contains("^^ chunk ends here"), "got:\n{out}");
    }

    #[test]
    fn render_contains_note_and_suggestion() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag(4, 5));
        assert!(out.contains("= note: some note"), "got:\n{out}");
        assert!(out.contains("= suggestion: recompile"), "got:\n{out}");
    }

    #[test]
    fn render_without_source_has_no_snippet() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&Diagnostic::error("stack underflow"));
        assert_eq!(out, "error: stack underflow\n");
    }

    #[test]
    fn warnings_are_labelled() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&Diagnostic::warning("2 trailing bytes"));
        assert!(out.starts_with("warning: 2 trailing bytes"));
    }

    #[test]
    fn color_toggles_escape_codes() {
        let d = make_diag(4, 5);
        assert!(AnsiRenderer { use_color: true }.render(&d).contains("\x1b["));
        assert!(!AnsiRenderer { use_color: false }.render(&d).contains("\x1b["));
    }
}
