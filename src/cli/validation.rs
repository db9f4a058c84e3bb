use crate::cli::args::CliArgs;
use crate::output::OutputFormat;
use crate::search::Decoration;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.debounce.as_deref() {
        crate::utils::parse_millis(raw).map_err(|e| format!("invalid --debounce '{raw}': {e}"))?;
    }
    if let Some(raw) = args.stagger.as_deref() {
        crate::utils::parse_millis(raw).map_err(|e| format!("invalid --stagger '{raw}': {e}"))?;
    }
    if let Some(raw) = args.hide_delay.as_deref() {
        crate::utils::parse_millis(raw)
            .map_err(|e| format!("invalid --hide-delay '{raw}': {e}"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --format '{raw}', expected text, json or html"
            ));
        }
    }
    if let Some(raw) = args.highlight.as_deref() {
        if Decoration::parse(raw).is_none() {
            return Err(format!(
                "invalid --highlight '{raw}', expected html, ansi or OPEN|CLOSE"
            ));
        }
    }
    if let Some(class) = args.highlight_class.as_deref() {
        if class.trim().is_empty() || class.chars().any(char::is_whitespace) {
            return Err(format!("invalid --highlight-class '{class}'"));
        }
    }
    Ok(())
}
