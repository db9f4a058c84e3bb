use super::{OutputRecord, OutputReport, NO_RESULTS_HINT, NO_RESULTS_TITLE};
use crate::search::Transition;
use crate::utils::escape_html;

fn card_style(record: &OutputRecord) -> String {
    match record.transition {
        Transition::Show { delay } => format!(
            "opacity: 1; transform: translateY(0); transition-delay: {}ms;",
            delay.as_millis()
        ),
        Transition::Hide { .. } => "display: none;".to_string(),
    }
}

fn render_card(record: &OutputRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "      <div class=\"member-card\" data-index=\"{}\" style=\"{}\">\n",
        record.index,
        card_style(record)
    ));
    for (i, segment) in record.rendered.iter().enumerate() {
        let class = if i == 0 { "member-name" } else { "member-field" };
        // segments are already escaped by the html decoration
        out.push_str(&format!("        <p class=\"{class}\">{segment}</p>\n"));
    }
    out.push_str("      </div>\n");
    out
}

/// Renders a standalone page. Records must have been rendered with an HTML
/// decoration so their text is escaped.
pub fn render_html(report: &OutputReport) -> Vec<u8> {
    let title = escape_html(report.title.as_deref().unwrap_or("Team Roster"));
    let cards: String = report.records.iter().map(render_card).collect();
    let no_results_display = if report.no_results { "block" } else { "none" };

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title}</title>
  <style>
    body {{ font-family: 'Inter', sans-serif; background: #f8fafc; color: #0f172a; margin: 0; }}
    .header {{ padding: 32px; text-align: center; }}
    .stats {{ color: #546e7a; }}
    #membersContainer {{ display: grid; gap: 16px; padding: 0 32px 32px; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); }}
    .member-card {{ background: white; border-radius: 12px; padding: 16px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); transition: opacity 0.3s ease, transform 0.3s ease; }}
    .member-name {{ font-weight: 700; margin: 0 0 8px; }}
    .member-field {{ margin: 0 0 4px; color: #546e7a; }}
    .no-results {{ text-align: center; padding: 60px 20px; color: #546e7a; font-size: 1.2em; }}
  </style>
</head>
<body>
  <div class="header">
    <h1>{title}</h1>
    <p class="stats">search: <code>{term}</code> &middot; {visible} of {total} shown</p>
  </div>
  <div id="membersContainer">
{cards}    <div class="no-results" style="display: {no_results_display};">
      <p>{no_results_title}</p>
      <p style="font-size: 0.9em; margin-top: 10px;">{no_results_hint}</p>
    </div>
  </div>
</body>
</html>
"####,
        title = title,
        term = escape_html(&report.term),
        visible = report.visible_count,
        total = report.total,
        cards = cards,
        no_results_display = no_results_display,
        no_results_title = NO_RESULTS_TITLE,
        no_results_hint = NO_RESULTS_HINT,
    );
    html.into_bytes()
}
