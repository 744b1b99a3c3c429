use colored::Colorize;
use std::collections::HashMap;
use std::path::Path;

use dgc_common::diagnostics::DiagnosticRelatedInformation;
use dgc_common::{Diagnostic, DiagnosticCategory};
use dgc_graph::{GraphSummary, NodeSummary};

/// Renders diagnostics and resolved graphs for the terminal.
pub struct Reporter {
    color: bool,
    sources: HashMap<String, String>,
    line_starts: HashMap<String, Vec<u32>>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: HashMap::new(),
            line_starts: HashMap::new(),
        }
    }

    /// Register the contents of `file` instead of reading it from disk.
    pub fn add_source(&mut self, file: impl Into<String>, contents: impl Into<String>) {
        let file = file.into();
        self.line_starts.remove(&file);
        self.sources.insert(file, contents.into());
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let location = self.format_location(&diagnostic.file, diagnostic.start);
        let category = self.format_category(diagnostic.category);
        let code = self.format_code(diagnostic.code);

        let mut output = String::new();
        if let Some(location) = location {
            output.push_str(&location);
        } else if !diagnostic.file.is_empty() {
            output.push_str(&diagnostic.file);
        } else {
            output.push_str("<unknown>");
        }

        output.push_str(" - ");
        output.push_str(&category);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) =
            self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length)
        {
            output.push_str(&snippet);
        }

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
            if let Some(snippet) = self.format_snippet(&related.file, related.start, related.length)
            {
                output.push_str(&snippet);
            }
        }

        output
    }

    /// Closing line of a run, e.g. `Found 2 errors and 1 warning.`
    pub fn format_summary(&self, errors: usize, warnings: usize) -> String {
        fn plural(count: usize, noun: &str) -> String {
            if count == 1 {
                format!("1 {noun}")
            } else {
                format!("{count} {noun}s")
            }
        }
        let text = match (errors, warnings) {
            (0, 0) => return String::new(),
            (_, 0) => format!("Found {}.", plural(errors, "error")),
            (0, _) => format!("Found {}.", plural(warnings, "warning")),
            _ => format!(
                "Found {} and {}.",
                plural(errors, "error"),
                plural(warnings, "warning")
            ),
        };
        if self.color && errors > 0 {
            text.red().bold().to_string()
        } else {
            text
        }
    }

    /// Indented tree of every endpoint of one component.
    ///
    /// ```text
    /// AppComponent
    ///   client(): HttpClient
    ///     HttpClient <- NetworkModule.provideClient (static_function)
    ///       @BaseUrl String <- NetworkModule.provideUrl (static_function)
    /// ```
    pub fn render_graph(&self, summary: &GraphSummary) -> String {
        let mut out = String::new();
        let title = if self.color {
            summary.component.bold().to_string()
        } else {
            summary.component.clone()
        };
        out.push_str(&title);
        if !summary.renderable {
            out.push_str(&self.dim(" (incomplete)"));
        }
        out.push('\n');

        for endpoint in &summary.endpoints {
            out.push_str("  ");
            out.push_str(&endpoint.endpoint);
            out.push('\n');
            for root in &endpoint.roots {
                self.render_node(&mut out, root, 2);
            }
            for key in &endpoint.unresolved {
                out.push_str("    ");
                let line = format!("{key} <- unresolved");
                if self.color {
                    out.push_str(&line.red().to_string());
                } else {
                    out.push_str(&line);
                }
                out.push('\n');
            }
        }
        out
    }

    fn render_node(&self, out: &mut String, node: &NodeSummary, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&node.key);
        out.push_str(" <- ");
        out.push_str(&node.binding);
        out.push_str(&self.dim(&format!(" ({})", node.kind.as_str())));
        if node.scoped {
            out.push_str(&self.dim(" [scoped]"));
        }
        if node.repeated {
            out.push_str(&self.dim(" ..."));
        }
        out.push('\n');
        for child in &node.dependencies {
            self.render_node(out, child, depth + 1);
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Source line of the span with a `~` underline, as in:
    ///   4       fun provideClient(url: String): HttpClient
    ///               ~~~~~~~~~~~~~
    fn format_snippet(&mut self, file: &str, start: u32, length: u32) -> Option<String> {
        if file.is_empty() || length == 0 {
            return None;
        }

        let (line_num, column) = self.position_for(file, start)?;
        let source = self.sources.get(file)?;
        let line_text = source.lines().nth((line_num - 1) as usize)?;
        let end = column - 1 + length;

        let mut underline = String::new();
        for (i, ch) in line_text.chars().enumerate() {
            let offset = i as u32;
            if offset < column - 1 {
                if ch == '\t' {
                    underline.push_str("    ");
                } else {
                    underline.push(' ');
                }
            } else if offset < end {
                if ch == '\t' {
                    underline.push_str("~~~~");
                } else {
                    underline.push('~');
                }
            } else {
                break;
            }
        }
        if !underline.contains('~') {
            underline.push('~');
        }

        let mut snippet = String::new();
        snippet.push('\n');
        snippet.push_str(&format!("  {:>3}   {}", line_num, line_text));
        snippet.push('\n');
        let underline_display = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        snippet.push_str(&format!("        {}", underline_display));

        Some(snippet)
    }

    fn format_related(&mut self, related: &DiagnosticRelatedInformation) -> String {
        let location = self
            .format_location(&related.file, related.start)
            .unwrap_or_else(|| related.file.clone());
        let prefix = if self.color {
            "  Related".dimmed().to_string()
        } else {
            "  Related".to_string()
        };

        format!("{}: {} - {}", prefix, location, related.message_text)
    }

    fn format_location(&mut self, file: &str, offset: u32) -> Option<String> {
        if file.is_empty() {
            return None;
        }

        let (line, column) = self.position_for(file, offset)?;
        Some(format!("{}:{}:{}", file, line, column))
    }

    /// One-based line and column of a byte offset.
    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        self.ensure_source(file)?;
        if !self.line_starts.contains_key(file) {
            let source = self.sources.get(file)?;
            let starts = std::iter::once(0)
                .chain(
                    source
                        .match_indices('\n')
                        .map(|(index, _)| index as u32 + 1),
                )
                .collect();
            self.line_starts.insert(file.to_string(), starts);
        }

        let starts = self.line_starts.get(file)?;
        let line = starts.partition_point(|&start| start <= offset) - 1;
        let column = offset - starts[line];
        Some((line as u32 + 1, column + 1))
    }

    fn ensure_source(&mut self, file: &str) -> Option<()> {
        if !self.sources.contains_key(file) {
            let contents = std::fs::read_to_string(Path::new(file)).ok()?;
            self.sources.insert(file.to_string(), contents);
        }
        Some(())
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }

        let label = format!("DGC{}", code);
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
