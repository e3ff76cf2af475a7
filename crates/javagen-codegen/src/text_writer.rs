//! Line-oriented text buffer with brace indentation and deferred markers
//!
//! The buffer is the first phase of a two-phase build: body text is
//! accumulated together with [`Marker`]s for content that can only be
//! computed once the whole body is known (the import block and the
//! serialization id). [`Document::render`] fills them in afterwards.

/// Content computed after the body is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    ImportBlock,
    SerialVersionUid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Marker(Marker),
}

/// Appends text line by line, indenting by brace depth
///
/// A line whose trimmed text starts with `}` is dedented before it is
/// written; a line ending with `{` indents the lines that follow.
#[derive(Debug)]
pub struct TextWriter {
    indent_unit: String,
    newline: String,
    depth: usize,
    /// The line being assembled
    line: Vec<Segment>,
    segments: Vec<Segment>,
}

impl TextWriter {
    pub fn new(indent_unit: impl Into<String>, newline: impl Into<String>) -> Self {
        Self {
            indent_unit: indent_unit.into(),
            newline: newline.into(),
            depth: 0,
            line: Vec::new(),
            segments: Vec::new(),
        }
    }

    pub fn newline_str(&self) -> &str {
        &self.newline
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Append text; embedded `\n` characters end lines
    pub fn print(&mut self, text: &str) {
        let mut parts = text.split('\n').peekable();
        while let Some(part) = parts.next() {
            push_text(&mut self.line, part.strip_suffix('\r').unwrap_or(part));
            if parts.peek().is_some() {
                self.end_line();
            }
        }
    }

    pub fn println(&mut self, text: &str) {
        self.print(text);
        self.end_line();
    }

    /// Place a marker at the current position of the current line
    pub fn mark(&mut self, marker: Marker) {
        self.line.push(Segment::Marker(marker));
    }

    /// Terminate the current line
    pub fn end_line(&mut self) {
        let line = std::mem::take(&mut self.line);
        let text: String = line
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(t) => Some(t.as_str()),
                Segment::Marker(_) => None,
            })
            .collect();
        let trimmed = text.trim();
        let has_marker = line.iter().any(|s| matches!(s, Segment::Marker(_)));

        if trimmed.starts_with('}') {
            self.depth = self.depth.saturating_sub(1);
        }

        if !trimmed.is_empty() || has_marker {
            push_text(&mut self.segments, &self.indent_unit.repeat(self.depth));

            let last = line.len().saturating_sub(1);
            for (idx, segment) in line.into_iter().enumerate() {
                match segment {
                    Segment::Text(t) if idx == last => push_text(&mut self.segments, t.trim_end()),
                    Segment::Text(t) => push_text(&mut self.segments, &t),
                    marker => self.segments.push(marker),
                }
            }
        }

        push_text(&mut self.segments, &self.newline);

        if trimmed.ends_with('{') {
            self.depth += 1;
        }
    }

    /// Flush any unterminated line and hand over the accumulated document
    pub fn finish(mut self) -> Document {
        if !self.line.is_empty() {
            let line = std::mem::take(&mut self.line);
            push_text(&mut self.segments, &self.indent_unit.repeat(self.depth));
            for segment in line {
                match segment {
                    Segment::Text(t) => push_text(&mut self.segments, &t),
                    marker => self.segments.push(marker),
                }
            }
        }

        Document {
            segments: self.segments,
        }
    }
}

/// Append text, merging with a trailing text segment
fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }

    match segments.last_mut() {
        Some(Segment::Text(last)) => last.push_str(text),
        _ => segments.push(Segment::Text(text.to_string())),
    }
}

/// Complete body text with unresolved markers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn contains(&self, marker: Marker) -> bool {
        self.segments.contains(&Segment::Marker(marker))
    }

    /// The body text with every marker left out
    pub fn text(&self) -> String {
        self.render(|_| String::new())
    }

    /// The body text with each marker replaced by `fill(marker)`
    pub fn render(&self, fill: impl Fn(Marker) -> String) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Marker(marker) => out.push_str(&fill(*marker)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_brace_indentation() {
        let mut out = TextWriter::new("    ", "\n");
        out.println("public class Table {");
        out.println("public void run() {");
        out.println("go();");
        out.println("}");
        out.println("}");

        assert_eq!(
            out.finish().text(),
            "public class Table {\n    public void run() {\n        go();\n    }\n}\n"
        );
    }

    #[test]
    fn test_close_and_reopen_on_one_line() {
        let mut out = TextWriter::new("  ", "\n");
        out.println("if (a) {");
        out.println("x()");
        out.println("} else {");
        out.println("y()");
        out.println("}");

        assert_eq!(
            out.finish().text(),
            "if (a) {\n  x()\n} else {\n  y()\n}\n"
        );
    }

    #[test]
    fn test_blank_lines_carry_no_indentation() {
        let mut out = TextWriter::new("    ", "\n");
        out.println("class A {");
        out.println("");
        out.println("   ");
        out.println("}");

        assert_eq!(out.finish().text(), "class A {\n\n\n}\n");
    }

    #[test]
    fn test_print_accumulates_one_line() {
        let mut out = TextWriter::new("    ", "\r\n");
        out.print("private ");
        out.print("int x;");
        out.println("");
        out.print("a\nb");

        assert_eq!(out.finish().text(), "private int x;\r\na\r\nb");
    }

    #[test]
    fn test_markers() {
        let mut out = TextWriter::new("    ", "\n");
        out.println("package a;");
        out.mark(Marker::ImportBlock);
        out.end_line();
        out.println("class A {");
        out.print("long id = ");
        out.mark(Marker::SerialVersionUid);
        out.println(";");
        out.println("}");

        let document = out.finish();
        assert!(document.contains(Marker::ImportBlock));
        assert!(document.contains(Marker::SerialVersionUid));
        assert_eq!(document.text(), "package a;\n\nclass A {\n    long id = ;\n}\n");
        assert_eq!(
            document.render(|marker| match marker {
                Marker::ImportBlock => "import b.B;".to_string(),
                Marker::SerialVersionUid => "1L".to_string(),
            }),
            "package a;\nimport b.B;\nclass A {\n    long id = 1L;\n}\n"
        );
    }
}
