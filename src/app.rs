use std::io::Write;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, OutputFormat, OutputReport};
use crate::runner::{Options, RosterSource, Runner};
use crate::search::{
    Decoration, FilterOptions, FilterPass, DEFAULT_DEBOUNCE_DELAY, DEFAULT_HIDE_DELAY,
    DEFAULT_STAGGER,
};
use crate::session::{self, InputEvent};
use crate::utils::{format_bool, format_millis, parse_millis};

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

/// The flag column of one help row: short, long and visible aliases, then the
/// value placeholder.
fn help_flags(arg: &clap::Arg) -> String {
    let short = arg.get_short().map(|c| format!("-{c}"));
    let longs = arg
        .get_long()
        .into_iter()
        .chain(arg.get_visible_aliases().unwrap_or_default())
        .map(|name| format!("--{name}"));
    let mut names: Vec<String> = Vec::new();
    for name in short.into_iter().chain(longs) {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let mut flags = names.join(", ");
    if arg.get_action().takes_values() {
        let placeholder = arg
            .get_value_names()
            .and_then(|v| v.first())
            .map_or("VALUE", |v| v.as_str());
        flags.push_str(" <");
        flags.push_str(placeholder);
        flags.push('>');
    }
    flags
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let name = cmd.get_name();

    let mut groups: Vec<(&str, Vec<(String, String)>)> = Vec::new();
    for arg in cmd.get_arguments().filter(|a| !a.is_hide_set()) {
        let heading = arg.get_help_heading().unwrap_or("Options");
        let help = arg
            .get_help()
            .map(|h| h.to_string().trim().to_string())
            .unwrap_or_default();
        let row = (help_flags(arg), help);
        match groups.iter_mut().find(|(h, _)| *h == heading) {
            Some((_, rows)) => rows.push(row),
            None => groups.push((heading, vec![row])),
        }
    }
    let width = groups
        .iter()
        .flat_map(|(_, rows)| rows.iter().map(|(flags, _)| flags.len()))
        .max()
        .unwrap_or(0);

    let mut out = match cmd.get_version() {
        Some(version) => format!("{name} {version}\n"),
        None => format!("{name}\n"),
    };
    if let Some(about) = cmd.get_long_about().or_else(|| cmd.get_about()) {
        out.push_str(&format!("{about}\n"));
    }
    out.push_str(&format!("\nUsage: {name} [OPTIONS]\n"));

    for (heading, rows) in groups {
        out.push_str(&format!("\n{heading}:\n"));
        for (flags, help) in rows {
            if help.is_empty() {
                out.push_str(&format!("  {flags}\n"));
            } else {
                out.push_str(&format!("  {flags:<width$}  {help}\n"));
            }
        }
    }
    out
}

fn resolve_millis(
    cli: Option<&str>,
    cfg: Option<u64>,
    default: Duration,
    flag: &str,
) -> Result<Duration, String> {
    match cli {
        Some(raw) => parse_millis(raw).map_err(|e| format!("invalid --{flag} '{raw}': {e}")),
        None => Ok(cfg.map(Duration::from_millis).unwrap_or(default)),
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    roster_path: String,
    query: String,
    interactive: bool,
    verbose: u8,
    no_color: bool,
    debounce_delay: Duration,
    stagger: Duration,
    hide_delay: Duration,
    decoration: Decoration,
    terminal_decoration: Decoration,
    output: Option<String>,
    output_format: OutputFormat,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let roster_path = args
        .roster
        .or(cfg.roster)
        .map(|p| config::expand_tilde_string(p.trim()))
        .filter(|p| !p.is_empty())
        .ok_or_else(|| "a roster file is required (--roster or roster: in config)".to_string())?;

    let query = args.query.or(cfg.query).unwrap_or_default();

    let debounce_delay = resolve_millis(
        args.debounce.as_deref(),
        cfg.debounce_delay_ms,
        DEFAULT_DEBOUNCE_DELAY,
        "debounce",
    )?;
    let stagger = resolve_millis(
        args.stagger.as_deref(),
        cfg.stagger_ms,
        DEFAULT_STAGGER,
        "stagger",
    )?;
    let hide_delay = resolve_millis(
        args.hide_delay.as_deref(),
        cfg.hide_delay_ms,
        DEFAULT_HIDE_DELAY,
        "hide-delay",
    )?;

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or html"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    let highlight_class = args.highlight_class.or(cfg.highlight_class);
    let configured = match args.highlight.or(cfg.highlight) {
        Some(raw) => Some(
            Decoration::parse(&raw)
                .ok_or_else(|| format!("invalid highlight style '{raw}'"))?,
        ),
        None => None,
    };
    let with_class = |d: Decoration| match highlight_class.as_deref() {
        Some(class) => d.with_class(class),
        None => d,
    };

    let mut decoration = with_class(
        configured
            .clone()
            .unwrap_or_else(|| output_format.default_decoration(no_color)),
    );
    if output_format == OutputFormat::Html && !decoration.is_html() {
        log::warn!("html output needs an html highlight, ignoring the configured style");
        decoration = with_class(Decoration::default());
    }
    let terminal_decoration = match (&configured, output_format) {
        (Some(d), _) if !d.is_html() => d.clone(),
        (_, OutputFormat::Text) => decoration.clone(),
        _ => OutputFormat::Text.default_decoration(no_color),
    };

    Ok(RunConfig {
        roster_path,
        query,
        interactive: args.interactive,
        verbose: args.verbose,
        no_color,
        debounce_delay,
        stagger,
        hide_delay,
        decoration,
        terminal_decoration,
        output,
        output_format,
    })
}

fn print_pass(pass: &FilterPass, report: &OutputReport) {
    let term = if pass.active {
        format!("\"{}\"", pass.term)
    } else {
        "(all)".to_string()
    };
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(
        stdout,
        ":: search {} :: {}/{} shown ::",
        term, pass.visible_count, report.total
    );
    let _ = stdout.write_all(&output::render_text(report));
    if pass.focus_requested {
        let _ = write!(stdout, "> ");
    }
    let _ = stdout.flush();
}

async fn write_output(path: &str, rendered: &[u8]) -> Result<(), String> {
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(rendered)
        .await
        .map_err(|e| format!("failed to write output file: {e}"))?;
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<InputEvent>) -> task::JoinHandle<()> {
    task::spawn(async move {
        let lines = session::forward_lines(BufReader::new(tokio::io::stdin()), tx).await;
        log::debug!("stdin closed after {lines} lines");
    })
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let base = Options {
        roster: RosterSource::FilePath(run.roster_path.clone()),
        title: None,
        debounce_delay: run.debounce_delay,
        decoration: run.decoration.clone(),
        filter: FilterOptions {
            stagger: run.stagger,
            hide_delay: run.hide_delay,
        },
    };

    let outcome = if run.interactive {
        format_kv_line("Roster", &run.roster_path);
        format_kv_line(
            "Search",
            &format!(
                "debounce={} stagger={} hide={} color={}",
                format_millis(run.debounce_delay),
                format_millis(run.stagger),
                format_millis(run.hide_delay),
                format_bool(!run.no_color)
            ),
        );

        // live passes go to the terminal, the final one to the output file
        let live = Runner::new(Options {
            decoration: run.terminal_decoration.clone(),
            ..base.clone()
        })
        .map_err(|e| e.to_string())?;
        let (tx, rx) = mpsc::channel::<InputEvent>(64);
        let reader = spawn_stdin_reader(tx);
        let outcome = live
            .session(rx, print_pass)
            .await
            .map_err(|e| e.to_string())?;
        reader.abort();
        let runner = Runner::new(base).map_err(|e| e.to_string())?;
        let report = runner.report(&outcome.roster, &outcome.pass);
        (outcome.pass, report)
    } else {
        let runner = Runner::new(base).map_err(|e| e.to_string())?;
        let outcome = runner.search(&run.query).await.map_err(|e| e.to_string())?;
        (outcome.pass, outcome.report)
    };

    let (pass, report) = outcome;
    log::info!(
        "term={:?} visible={}/{} no_results={}",
        pass.term,
        pass.visible_count,
        report.total,
        pass.no_results
    );

    let rendered = output::render(run.output_format, &report)
        .map_err(|e| format!("failed to render report: {e}"))?;
    match run.output.as_ref() {
        Some(path) => {
            write_output(path, &rendered).await?;
            log::info!("wrote {path}");
        }
        None if !run.interactive => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&rendered)
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
        }
        None => {}
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    crate::logging::init(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine a config path".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!("wrote {}", path.display());
        } else {
            println!("config already exists at {}", path.display());
        }
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    log::debug!("run config: {run:?}");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
