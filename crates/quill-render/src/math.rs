//! LaTeX math rendering via pulldown-latex → MathML.

use pulldown_latex::{
    Parser, Storage, config::DisplayMode, config::RenderConfig, mathml::push_mathml,
};
use quill_dom::{Element, Node, escape_attr, escape_text, parse_fragment};
use tracing::debug;

use crate::macros::expand_macros;
use crate::scan::Delimiter;

/// Class marking a rendered-math node. Subtrees under this marker are
/// never rescanned.
pub const RENDERED_CLASS: &str = "math-render";

/// Attribute holding the original delimited notation of a rendered node.
pub const SOURCE_ATTR: &str = "data-math-source";

/// Result of attempting to render LaTeX math.
pub enum MathResult {
    /// Successfully rendered MathML.
    Success(String),
    /// Rendering failed - contains fallback HTML with source and error message.
    Error { html: String, message: String },
}

/// Render LaTeX math to MathML.
///
/// # Arguments
/// * `latex` - The LaTeX source string; surrounding delimiters are stripped
/// * `display_mode` - If true, render as display math (block); if false, inline
pub fn render_math(latex: &str, display_mode: bool) -> MathResult {
    let cleaned = clean_source(latex);
    let expanded = expand_macros(&cleaned);

    let storage = Storage::new();
    let parser = Parser::new(&expanded, &storage);
    let config = RenderConfig {
        display_mode: if display_mode {
            DisplayMode::Block
        } else {
            DisplayMode::Inline
        },
        ..Default::default()
    };

    let mut mathml = String::new();

    // Collect events, tracking any errors.
    let events: Vec<_> = parser.collect();
    let errors: Vec<String> = events
        .iter()
        .filter_map(|e| e.as_ref().err().map(|err| err.to_string()))
        .collect();

    if errors.is_empty() {
        if let Err(e) = push_mathml(&mut mathml, events.into_iter(), config) {
            return MathResult::Error {
                html: format_error_html(latex, &e.to_string(), display_mode),
                message: e.to_string(),
            };
        }
        MathResult::Success(mathml)
    } else {
        let error_msg = errors.join("; ");
        MathResult::Error {
            html: format_error_html(latex, &error_msg, display_mode),
            message: error_msg,
        }
    }
}

/// Render a math span into a marked tree node.
///
/// The wrapper element carries `math-render` plus a display-mode class and
/// stores the full delimited source in `data-math-source`, so the original
/// notation round-trips exactly and the subtree is excluded from rescans.
pub fn render_math_node(source: &str, body: &str, delimiter: Delimiter) -> Element {
    let display = delimiter.is_display();
    let mode_class = if display { "math-display" } else { "math-inline" };

    let inner_html = match render_math(body, display) {
        MathResult::Success(mathml) => mathml,
        MathResult::Error { html, message } => {
            debug!(source, %message, "math span failed to render");
            html
        }
    };

    let mut wrapper = Element::new("span")
        .with_attr("class", format!("{RENDERED_CLASS} {mode_class}"))
        .with_attr(SOURCE_ATTR, source);
    wrapper.children = parse_fragment(&inner_html).children;
    if wrapper.children.is_empty() {
        // Renderer produced nothing usable: keep the source visible.
        wrapper.children.push(Node::text(source));
    }
    wrapper
}

/// Strip `\style{...}`/`\color{...}` commands and any delimiter pair.
fn clean_source(latex: &str) -> String {
    let mut cleaned = strip_command(latex, "\\style{");
    cleaned = strip_command(&cleaned, "\\color{");
    let trimmed = cleaned.trim();

    for delim in Delimiter::ALL {
        if let Some(body) = trimmed
            .strip_prefix(delim.open())
            .and_then(|s| s.strip_suffix(delim.close()))
        {
            return body.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Remove every `prefix...}` occurrence (non-nested, as the original did).
fn strip_command(source: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(pos) = rest.find(prefix) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + prefix.len()..];
        match after.find('}') {
            Some(end) => rest = &after[end + 1..],
            None => {
                rest = after;
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

fn format_error_html(latex: &str, error: &str, display_mode: bool) -> String {
    let mode_class = if display_mode {
        "math-display"
    } else {
        "math-inline"
    };
    let mut escaped_latex = String::new();
    let mut escaped_error = String::new();
    escape_text(&mut escaped_latex, latex);
    escape_attr(&mut escaped_error, error);
    format!(
        r#"<span class="math-error {mode_class}" title="{escaped_error}"><code>{escaped_latex}</code></span>"#
    )
}
