//! Formatting commands and their argument types.
//!
//! Platform-agnostic definitions for editor formatting operations. A
//! `Command` is a semantic operation over the region's markup tree,
//! decoupled from how it was triggered (toolbar button, keyboard
//! shortcut, programmatic call).

/// Block text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// The `text-align` declaration value.
    pub fn css_value(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

/// List container variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    /// Tag of the list container element.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

/// Placement of an inserted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePosition {
    /// Flows with the surrounding text.
    Inline,
    /// Floated to the left, text wraps around.
    Left,
    /// Floated to the right, text wraps around.
    Right,
    /// Own line, centered.
    Center,
}

impl ImagePosition {
    /// Inline style applied to the image element, if any.
    pub fn css(&self) -> Option<&'static str> {
        match self {
            Self::Inline => None,
            Self::Left => Some("float: left; margin: 0 1em 0.5em 0"),
            Self::Right => Some("float: right; margin: 0 0 0.5em 1em"),
            Self::Center => Some("display: block; margin: 0.5em auto"),
        }
    }
}

/// All formatting commands an editor region accepts.
///
/// Each invocation is independent: a command operates on the current
/// markup tree and selection, and assumes nothing about the outcome of
/// previous commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // === Inline styles (toggles over the selected range) ===
    /// Toggle bold on the selection.
    Bold,
    /// Toggle italic on the selection.
    Italic,
    /// Toggle underline on the selection.
    Underline,

    // === Block styles ===
    /// Align the blocks overlapping the selection.
    Align(Alignment),
    /// Convert the blocks overlapping the selection to a heading (1-6).
    Heading(u8),
    /// Convert the blocks overlapping the selection back to paragraphs.
    Paragraph,
    /// Toggle a list over the blocks overlapping the selection.
    List(ListKind),

    // === Insertion ===
    /// Insert an image at the cursor, replacing any selected content.
    InsertImage { url: String, position: ImagePosition },
    /// Insert a link at the cursor, replacing any selected content.
    InsertLink { url: String, text: String },
    /// Insert an arbitrary markup fragment at the cursor.
    InsertHtml { markup: String },
}

impl Command {
    /// Whether this command requires a non-collapsed selection.
    pub fn needs_selection(&self) -> bool {
        matches!(self, Self::Bold | Self::Italic | Self::Underline)
    }
}
