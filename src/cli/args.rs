use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rostersearch",
    version,
    about = "debounced search and highlighting over a team roster",
    long_about = "rostersearch filters a team roster by a case-insensitive literal search term and highlights every match.\n\nExamples:\n  rostersearch -r roster.yml -q bob\n  rostersearch -r roster.yml -q martin -o roster.html\n  rostersearch -r roster.yml --interactive --debounce 300\n\nIn interactive mode each line on stdin is the current content of the search field; ESC or :clear clears it, :go runs the pending search at once."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the final result to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'F',
        long = "of",
        visible_alias = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text, json or html (inferred from --output when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'r',
        long = "rs",
        visible_alias = "roster",
        value_name = "FILE",
        help_heading = "Input",
        help = "Roster file (.yml/.yaml, .json, or one member per line)."
    )]
    pub roster: Option<String>,

    #[arg(
        short = 'q',
        long = "q",
        visible_alias = "query",
        value_name = "TERM",
        allow_hyphen_values = true,
        help_heading = "Input",
        help = "Search term applied once (ignored with --interactive)."
    )]
    pub query: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.rostersearch/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'i',
        long = "it",
        visible_alias = "interactive",
        help_heading = "Search",
        help = "Read search-field updates from stdin, one line per keystroke."
    )]
    pub interactive: bool,

    #[arg(
        short = 'd',
        long = "db",
        visible_alias = "debounce",
        value_name = "MS",
        help_heading = "Search",
        help = "Quiet period after the last keystroke before filtering (default 300)."
    )]
    pub debounce: Option<String>,

    #[arg(
        long = "hl",
        visible_alias = "highlight",
        value_name = "STYLE",
        help_heading = "Search",
        help = "Highlight decoration: html, ansi, or OPEN|CLOSE markers."
    )]
    pub highlight: Option<String>,

    #[arg(
        long = "hc",
        visible_alias = "highlight-class",
        value_name = "CLASS",
        help_heading = "Search",
        help = "CSS class of the html highlight span (default highlight)."
    )]
    pub highlight_class: Option<String>,

    #[arg(
        long = "st",
        visible_alias = "stagger",
        value_name = "MS",
        help_heading = "Transitions",
        help = "Per-item delay of show transitions (default 50)."
    )]
    pub stagger: Option<String>,

    #[arg(
        long = "hd",
        visible_alias = "hide-delay",
        value_name = "MS",
        help_heading = "Transitions",
        help = "Delay before a hidden item is removed (default 300)."
    )]
    pub hide_delay: Option<String>,
}
