use std::ops::Range;

use colored::Colorize;
use serde::Serialize;

use crate::utils::escape_html;

pub const DEFAULT_HIGHLIGHT_CLASS: &str = "highlight";
pub const DEFAULT_HIGHLIGHT_STYLE: &str =
    "background: #ffeb3b; padding: 2px 4px; border-radius: 3px; font-weight: 600;";

/// Simple per-character lowercasing. Used for both the term and the item
/// projection so the two always fold the same way.
pub fn fold_case(value: &str) -> String {
    value.chars().flat_map(char::to_lowercase).collect()
}

/// Byte ranges of `text` containing a case-insensitive, literal occurrence of
/// `folded_term`. The term must already be folded with [`fold_case`].
///
/// Matching runs on the folded text and maps back through an origin table,
/// so characters whose lowercase form has a different length still produce
/// ranges on valid char boundaries of the original.
pub fn match_spans(text: &str, folded_term: &str) -> Vec<Range<usize>> {
    if folded_term.is_empty() || text.is_empty() {
        return Vec::new();
    }

    let mut folded = String::with_capacity(text.len());
    let mut origin: Vec<usize> = Vec::with_capacity(text.len());
    for (offset, ch) in text.char_indices() {
        let before = folded.len();
        folded.extend(ch.to_lowercase());
        origin.resize(origin.len() + (folded.len() - before), offset);
    }

    let mut spans: Vec<Range<usize>> = Vec::new();
    for (start, matched) in folded.match_indices(folded_term) {
        let last = origin[start + matched.len() - 1];
        let end = last + text[last..].chars().next().map_or(0, char::len_utf8);
        let start = origin[start];
        match spans.last_mut() {
            // two matches inside one expanded character collapse into one span
            Some(prev) if start < prev.end => prev.end = prev.end.max(end),
            _ => spans.push(start..end),
        }
    }
    spans
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

/// A text segment split into plain and highlighted runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Highlighted {
    pub segments: Vec<Segment>,
}

impl Highlighted {
    pub fn plain(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self {
            segments: vec![Segment {
                text: text.to_string(),
                highlighted: false,
            }],
        }
    }

    pub fn build(text: &str, folded_term: &str) -> Self {
        let spans = match_spans(text, folded_term);
        if spans.is_empty() {
            return Self::plain(text);
        }

        let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0;
        for span in spans {
            if span.start > cursor {
                segments.push(Segment {
                    text: text[cursor..span.start].to_string(),
                    highlighted: false,
                });
            }
            segments.push(Segment {
                text: text[span.clone()].to_string(),
                highlighted: true,
            });
            cursor = span.end;
        }
        if cursor < text.len() {
            segments.push(Segment {
                text: text[cursor..].to_string(),
                highlighted: false,
            });
        }
        Self { segments }
    }

    pub fn has_highlights(&self) -> bool {
        self.segments.iter().any(|s| s.highlighted)
    }

    /// The undecorated text, identical to what the value was built from.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn render(&self, decoration: &Decoration) -> String {
        let mut out = String::new();
        for segment in self.segments.iter() {
            if segment.highlighted {
                decoration.wrap(&segment.text, &mut out);
            } else {
                decoration.plain(&segment.text, &mut out);
            }
        }
        out
    }
}

/// How highlighted runs are wrapped when rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoration {
    Html {
        class: String,
        style: Option<String>,
    },
    Ansi,
    Markers {
        open: String,
        close: String,
    },
}

impl Default for Decoration {
    fn default() -> Self {
        Self::Html {
            class: DEFAULT_HIGHLIGHT_CLASS.to_string(),
            style: Some(DEFAULT_HIGHLIGHT_STYLE.to_string()),
        }
    }
}

impl Decoration {
    /// Accepts `html`, `ansi` (or `color`), or `OPEN|CLOSE` markers.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "html" | "span" => return Some(Self::default()),
            "ansi" | "color" | "colour" => return Some(Self::Ansi),
            _ => {}
        }
        let (open, close) = trimmed.split_once('|')?;
        if open.is_empty() && close.is_empty() {
            return None;
        }
        Some(Self::Markers {
            open: open.to_string(),
            close: close.to_string(),
        })
    }

    pub fn with_class(self, class: &str) -> Self {
        match self {
            Self::Html { style, .. } => Self::Html {
                class: class.to_string(),
                style,
            },
            other => other,
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self, Self::Html { .. })
    }

    fn plain(&self, text: &str, out: &mut String) {
        match self {
            Self::Html { .. } => out.push_str(&escape_html(text)),
            Self::Ansi | Self::Markers { .. } => out.push_str(text),
        }
    }

    fn wrap(&self, text: &str, out: &mut String) {
        match self {
            Self::Html { class, style } => {
                out.push_str("<span class=\"");
                out.push_str(&escape_html(class));
                out.push('"');
                if let Some(style) = style.as_deref().filter(|s| !s.is_empty()) {
                    out.push_str(" style=\"");
                    out.push_str(&escape_html(style));
                    out.push('"');
                }
                out.push('>');
                out.push_str(&escape_html(text));
                out.push_str("</span>");
            }
            Self::Ansi => out.push_str(&text.black().on_yellow().bold().to_string()),
            Self::Markers { open, close } => {
                out.push_str(open);
                out.push_str(text);
                out.push_str(close);
            }
        }
    }
}
