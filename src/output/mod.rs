pub mod report;

use colored::Colorize;
use serde::Serialize;

use crate::search::{Decoration, FilterPass, Item, Transition};

pub const NO_RESULTS_TITLE: &str = "No members found";
pub const NO_RESULTS_HINT: &str = "Try another search term";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// The decoration used when none is configured.
    pub fn default_decoration(self, no_color: bool) -> Decoration {
        match self {
            Self::Text if no_color => Decoration::Markers {
                open: "[".to_string(),
                close: "]".to_string(),
            },
            Self::Text => Decoration::Ansi,
            Self::Json | Self::Html => Decoration::default(),
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputRecord {
    pub index: usize,
    pub visible: bool,
    pub highlighted: bool,
    pub text: Vec<String>,
    pub rendered: Vec<String>,
    pub transition: Transition,
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputReport {
    pub title: Option<String>,
    pub term: String,
    pub total: usize,
    pub visible_count: usize,
    pub no_results: bool,
    pub records: Vec<OutputRecord>,
}

pub fn build_report(
    title: Option<&str>,
    pass: &FilterPass,
    items: &[Item],
    decoration: &Decoration,
) -> OutputReport {
    let records = pass
        .views
        .iter()
        .map(|view| OutputRecord {
            index: view.index,
            visible: view.visible,
            highlighted: view.has_highlights(),
            text: items
                .get(view.index)
                .map(|item| item.segments().to_vec())
                .unwrap_or_else(|| view.plain_text()),
            rendered: view.render(decoration),
            transition: view.transition,
        })
        .collect();
    OutputReport {
        title: title.map(str::to_string),
        term: pass.term.clone(),
        total: pass.views.len(),
        visible_count: pass.visible_count,
        no_results: pass.no_results,
        records,
    }
}

pub fn render_text(report: &OutputReport) -> Vec<u8> {
    let mut out = String::new();
    for r in report.records.iter().filter(|r| r.visible) {
        out.push_str(&r.rendered.join(" · "));
        out.push('\n');
    }
    if report.no_results {
        out.push_str(&format!(
            "{}\n{}\n",
            NO_RESULTS_TITLE.bold(),
            NO_RESULTS_HINT.dimmed()
        ));
    }
    out.into_bytes()
}

pub fn render_json(report: &OutputReport) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = serde_json::to_vec_pretty(report)?;
    out.push(b'\n');
    Ok(out)
}

pub fn render_html(report: &OutputReport) -> Vec<u8> {
    report::render_html(report)
}

pub fn render(
    format: OutputFormat,
    report: &OutputReport,
) -> Result<Vec<u8>, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => render_json(report),
        OutputFormat::Html => Ok(render_html(report)),
    }
}
