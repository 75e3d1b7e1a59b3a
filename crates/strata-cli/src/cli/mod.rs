//! CLI argument definitions using the clap derive API.
//!
//! Argument names, aliases and help text live here and nowhere else.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "strata",
    bin_name = "strata",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Layered project scaffolding from shared template fragments",
    long_about = "Strata builds a project by stacking template directories \
                  (global shared, language shared, kind shared, template), \
                  pruning private-only files and rendering marked files.",
    after_help = "EXAMPLES:\n\
        \x20 strata new my-cli --lang rust --kind cli --template basic\n\
        \x20 strata new ./svc  --lang go --kind api --template chi --remote --private\n\
        \x20 strata list --lang rust\n\
        \x20 strata completions bash > /usr/share/bash-completion/completions/strata",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a project from layered templates.
    #[command(
        visible_alias = "n",
        after_help = "EXAMPLES:\n\
            \x20 strata new my-cli --lang rust --kind cli --template basic\n\
            \x20 strata new my-cli -l rust -k cli -t basic --var author=\"Jane Doe\"\n\
            \x20 strata new my-cli -l rust -k cli -t basic --private --dry-run"
    )]
    New(NewArgs),

    /// List languages, kinds or templates.
    #[command(
        visible_alias = "ls",
        after_help = "EXAMPLES:\n\
            \x20 strata list                      # languages\n\
            \x20 strata list --lang rust          # kinds\n\
            \x20 strata list --lang rust --kind cli --format json"
    )]
    List(ListArgs),

    /// Write a default configuration file.
    #[command(after_help = "EXAMPLES:\n\
            \x20 strata init\n\
            \x20 strata --config ./strata.toml init --force")]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(after_help = "EXAMPLES:\n\
            \x20 strata completions bash > ~/.local/share/bash-completion/completions/strata\n\
            \x20 strata completions zsh  > ~/.zfunc/_strata\n\
            \x20 strata completions fish > ~/.config/fish/completions/strata.fish")]
    Completions(CompletionsArgs),
}

// ── new ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Target directory. Its last segment becomes the project name.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[arg(short = 'l', long = "lang", value_name = "LANGUAGE", help = "Language directory")]
    pub language: String,

    #[arg(short = 'k', long = "kind", value_name = "KIND", help = "Kind directory within the language")]
    pub kind: String,

    #[arg(short = 't', long = "template", value_name = "TEMPLATE", help = "Template directory within the kind")]
    pub template: String,

    /// Fetch layers from the configured remote repository.
    #[arg(long = "remote")]
    pub remote: bool,

    /// Private artifact: apply the configured prune rules.
    #[arg(long = "private")]
    pub private: bool,

    /// Extra render value; repeatable, wins over config `variables`.
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Local template root, overriding `templates.local_root`.
    #[arg(long = "templates-dir", value_name = "DIR", env = "STRATA_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Generate into a directory that already has files.
    #[arg(long = "force")]
    pub force: bool,

    /// Show the plan without touching the filesystem.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(short = 'l', long = "lang", value_name = "LANGUAGE", help = "List kinds of this language")]
    pub language: Option<String>,

    #[arg(
        short = 'k',
        long = "kind",
        value_name = "KIND",
        requires = "language",
        help = "List templates of this kind (needs --lang)"
    )]
    pub kind: Option<String>,

    /// Query the configured remote repository instead of the local root.
    #[arg(long = "remote")]
    pub remote: bool,

    #[arg(long = "templates-dir", value_name = "DIR", env = "STRATA_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    #[arg(long = "format", value_enum, default_value = "table", help = "Output format")]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Heading plus indented names.
    Table,
    /// One name per line.
    List,
    /// JSON object with `level` and `names`.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
