#![forbid(unsafe_code)]

mod cmd;
mod output;
mod project;

use clap::{CommandFactory, Parser, Subcommand};
use output::{OutputMode, Reported, resolve_output_mode};
use project::Project;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "ety",
    author,
    version,
    about = "etymon: etymology graphs for constructed languages",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format. Overrides `--json`, `FORMAT`, and the user config.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Language document to operate on, instead of the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    doc: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Initialize an etymon project",
        long_about = "Create .etymon/config.toml and an empty language document in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    ety init\n\n    # Start over with an empty document\n    ety init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Lexicon",
        about = "Add, remove, or list words",
        after_help = "EXAMPLES:\n    ety word add kal --definition water\n    ety word rm 3\n    ety word list --json"
    )]
    Word(cmd::word::WordArgs),

    #[command(
        next_help_heading = "Etymology",
        about = "Record that words derive from a parent word",
        long_about = "Record that each child derives from the parent. Rejected with E2003 if any link would put a word into its own lineage.",
        after_help = "EXAMPLES:\n    # kalan (2) derives from kal (1)\n    ety relate 1 2\n\n    # Several children at once\n    ety relate 1 2 3 4"
    )]
    Relate(cmd::relate::RelateArgs),

    #[command(
        next_help_heading = "Etymology",
        about = "Remove a derivation link",
        after_help = "EXAMPLES:\n    ety unrelate 1 2"
    )]
    Unrelate(cmd::relate::UnrelateArgs),

    #[command(
        next_help_heading = "Etymology",
        about = "Attach or detach donor words from other languages",
        after_help = "EXAMPLES:\n    ety origin add 1 --word aqua --language Latin --definition water\n    ety origin rm 1 --word aqua --language Latin"
    )]
    Origin(cmd::origin::OriginArgs),

    #[command(
        next_help_heading = "Read",
        about = "List donor words used anywhere in the language",
        after_help = "EXAMPLES:\n    ety origins\n    ety origins --filter latin"
    )]
    Origins(cmd::origin::OriginsArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one word with its etymology",
        long_about = "Show a word's parents, children, donor words, and full ancestry and descent.",
        after_help = "EXAMPLES:\n    ety show 2\n    ety show 2 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    ety completions bash > ~/.local/share/bash-completion/completions/ety"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ETYMON_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "etymon=debug,info"
        } else {
            "etymon=info,warn"
        })
    });

    let format = env::var("ETYMON_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Structured failures were already rendered in the requested format.
            if err.downcast_ref::<Reported>().is_none() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(ref args) = cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args, &mut command);
    }

    let cwd = env::current_dir()?;
    let project = Project::discover(&cwd, cli.doc.as_deref(), cli.json)?;
    let output = resolve_output_mode(cli.format, &project.config.resolved_output);

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, &project),
        Commands::Word(ref args) => cmd::word::run_word(args, output, &project),
        Commands::Relate(ref args) => cmd::relate::run_relate(args, output, &project),
        Commands::Unrelate(ref args) => cmd::relate::run_unrelate(args, output, &project),
        Commands::Origin(ref args) => cmd::origin::run_origin(args, output, &project),
        Commands::Origins(ref args) => cmd::origin::run_origins(args, output, &project),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &project),
        Commands::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_before_and_after_subcommand() {
        let before = Cli::parse_from(["ety", "--json", "word", "list"]);
        assert!(before.json);
        let after = Cli::parse_from(["ety", "word", "list", "--json"]);
        assert!(after.json);
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["ety", "show", "1", "--format", "text"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn doc_flag_parses() {
        let cli = Cli::parse_from(["ety", "--doc", "tongue.json", "word", "list"]);
        assert_eq!(cli.doc, Some(PathBuf::from("tongue.json")));
    }

    #[test]
    fn relate_takes_several_children() {
        let cli = Cli::parse_from(["ety", "relate", "1", "2", "3"]);
        let Commands::Relate(args) = cli.command else {
            panic!("expected relate");
        };
        assert_eq!(args.children.len(), 2);
    }

    #[test]
    fn word_ids_must_be_numeric() {
        assert!(Cli::try_parse_from(["ety", "show", "kal"]).is_err());
        assert!(Cli::try_parse_from(["ety", "relate", "1"]).is_err());
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["ety", "init"],
            vec!["ety", "word", "add", "kal"],
            vec!["ety", "word", "rm", "1"],
            vec!["ety", "word", "list"],
            vec!["ety", "relate", "1", "2"],
            vec!["ety", "unrelate", "1", "2"],
            vec!["ety", "show", "1"],
            vec!["ety", "origin", "add", "1", "--word", "aqua", "--language", "Latin"],
            vec!["ety", "origin", "rm", "1", "--word", "aqua", "--language", "Latin"],
            vec!["ety", "origins", "--filter", "lat"],
            vec!["ety", "completions", "bash"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(result.is_ok(), "Failed to parse: {args:?}: {:?}", result.err());
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
