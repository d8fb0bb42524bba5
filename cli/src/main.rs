use std::fs;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use command_tree_core::{Application, Command as TreeCommand, ValueMap, unreachable_positionals};
use command_tree_loader::{AppSpec, SpecFormat};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// CLI-side spec format with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliFormat {
    Json,
    Yaml,
}

impl From<CliFormat> for SpecFormat {
    fn from(fmt: CliFormat) -> Self {
        match fmt {
            CliFormat::Json => Self::Json,
            CliFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "cmdtree", version, disable_help_subcommand = true)]
#[command(about = "Parse, document and complete command lines against a command-tree spec")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a token list and print the resolved command path and values.
    Parse(ParseArgs),
    /// Print help for the root or for a command path.
    Help(HelpArgs),
    /// List completion candidates for the last word.
    Complete(CompleteArgs),
    /// Build the tree and report problems without parsing anything.
    Check(CheckArgs),
    /// Re-serialize a spec in another format.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
struct SpecArgs {
    /// Spec file (.json, .yaml or .yml).
    #[arg(long)]
    spec: PathBuf,
    /// Override the format implied by the file extension.
    #[arg(long)]
    format: Option<CliFormat>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    spec: SpecArgs,
    /// Output format for the parse result.
    #[arg(long, default_value = "json")]
    output: CliFormat,
    /// Tokens to parse; put them after `--` when the first one starts with `-`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    #[command(flatten)]
    spec: SpecArgs,
    /// Only list subcommands tagged with this topic.
    #[arg(long)]
    topic: Option<String>,
    /// Command path below the root, e.g. `say loud`.
    path: Vec<String>,
}

#[derive(Debug, Args)]
struct CompleteArgs {
    #[command(flatten)]
    spec: SpecArgs,
    /// Words typed so far; the last one is the partial word (may be empty).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    words: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    spec: SpecArgs,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[command(flatten)]
    spec: SpecArgs,
    /// Target format.
    #[arg(long)]
    to: CliFormat,
    /// Write to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

/// What `parse` prints on success.
#[derive(Debug, Serialize)]
struct ParseReport<'a> {
    command: &'a [&'a str],
    values: &'a ValueMap,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Complete(args) => run_complete(args),
        Command::Check(args) => run_check(args),
        Command::Export(args) => run_export(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_spec(args: &SpecArgs) -> Result<AppSpec, String> {
    let spec = match args.format {
        Some(format) => {
            let text = fs::read_to_string(&args.spec)
                .map_err(|e| format!("{}: {e}", args.spec.display()))?;
            AppSpec::parse(&text, format.into())
        }
        None => AppSpec::load(&args.spec),
    };
    spec.map_err(|e| format!("{}: {e}", args.spec.display()))
}

fn load_app(args: &SpecArgs) -> Result<Application, String> {
    load_spec(args)?
        .build()
        .map_err(|e| format!("{}: {e}", args.spec.display()))
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let app = load_app(&args.spec)?;
    let outcome = app.parse(&args.tokens);

    if !outcome.is_ok() {
        for message in outcome.error_messages() {
            eprintln!("error: {message}");
        }
        return Err(format!("{} parse error(s)", outcome.errors.len()));
    }

    let report = ParseReport {
        command: &outcome.path,
        values: &outcome.values,
    };
    let rendered = match args.output {
        CliFormat::Json => serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?,
        CliFormat::Yaml => serde_yaml::to_string(&report).map_err(|e| e.to_string())?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let app = load_app(&args.spec)?;
    let help = app
        .help(&args.path, args.topic.as_deref())
        .map_err(|e| e.to_string())?;
    print!("{help}");
    Ok(())
}

fn run_complete(args: CompleteArgs) -> Result<(), String> {
    let app = load_app(&args.spec)?;
    for candidate in app.complete(&args.words) {
        println!("{candidate}");
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let app = load_app(&args.spec)?;

    let mut commands = 0;
    let mut parameters = 0;
    let mut unreachable = 0;
    let mut stack: Vec<(Vec<&str>, &TreeCommand)> = vec![(vec![app.root().name()], app.root())];
    while let Some((path, command)) = stack.pop() {
        commands += 1;
        parameters += command.parameters().len();
        for param in unreachable_positionals(command) {
            unreachable += 1;
            warn!(command = %path.join(" "), positional = param.name(), "unreachable positional");
            eprintln!(
                "warning: command '{}': positional '{}' follows an unbounded positional and never receives tokens",
                path.join(" "),
                param.name()
            );
        }
        for sub in command.subcommands().iter().rev() {
            let mut child = path.clone();
            child.push(sub.name());
            stack.push((child, sub));
        }
    }
    debug!(commands, parameters, unreachable, "checked tree");

    println!(
        "Checked {commands} command(s) with {parameters} parameter(s) in {}.",
        args.spec.spec.display()
    );
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), String> {
    let spec = load_spec(&args.spec)?;
    // Only trees that build are exported.
    spec.build()
        .map_err(|e| format!("{}: {e}", args.spec.spec.display()))?;

    let rendered = spec.render(args.to.into()).map_err(|e| e.to_string())?;
    match args.output {
        Some(path) => {
            fs::write(&path, rendered).map_err(|e| format!("{}: {e}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", rendered.trim_end()),
    }
    Ok(())
}
