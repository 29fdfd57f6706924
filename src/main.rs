//! blockmail - render block-based email templates

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use blockmail::util::{IdGenerator, time_now_millis};
use blockmail::{Document, EmailExporter, ExportConfig, Registry, write_artifacts};

#[derive(Parser)]
#[command(name = "blockmail")]
#[command(version, about = "Render block-based email templates", long_about = None)]
#[command(after_help = "EXAMPLES:
    blockmail render template.json           Write <timestamp>.html and .txt
    blockmail render template.json --stdout  Print the HTML
    blockmail schema Hero                    Show the editor fields of one block")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Render a JSON document to HTML and plaintext files
    Render(RenderArgs),
    /// List registered block types
    Blocks,
    /// Print editor field schemas as JSON
    Schema {
        /// Block type to show (all blocks and the root when omitted)
        #[arg(value_name = "TYPE")]
        block: Option<String>,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Document JSON file, or `-` for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Directory the artifacts are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// File name prefix for the artifacts
    #[arg(long, value_name = "P", default_value = "")]
    prefix: String,

    /// Extra CSS file appended to the embedded stylesheet
    #[arg(long, value_name = "FILE")]
    css: Option<PathBuf>,

    /// Title of the HTML document
    #[arg(long, default_value = "Email")]
    title: String,

    /// Print the HTML to stdout instead of writing files
    #[arg(long)]
    stdout: bool,

    /// Skip CSS that fails to parse instead of aborting
    #[arg(long)]
    lenient_css: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Render(args) => render(&args),
        Command::Blocks => {
            list_blocks();
            Ok(())
        }
        Command::Schema { block } => schema(block.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr),
        )
        .init();
}

fn render(args: &RenderArgs) -> Result<(), String> {
    let document = if args.input == "-" {
        Document::from_reader(io::stdin().lock())
    } else {
        let file = File::open(&args.input).map_err(|e| format!("{}: {e}", args.input))?;
        Document::from_reader(BufReader::new(file))
    }
    .map_err(|e| format!("{}: {e}", args.input))?;

    let extra_css = match &args.css {
        Some(path) => {
            Some(fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?)
        }
        None => None,
    };
    let mut config = ExportConfig {
        title: args.title.clone(),
        extra_css,
        ..ExportConfig::default()
    };
    config.inline.strict = !args.lenient_css;

    let mut ids = IdGenerator::new();
    let registry = Registry::build(&mut ids);
    let export = EmailExporter::new()
        .with_config(config)
        .export(&document, &registry, &mut ids)
        .map_err(|e| format!("export failed, nothing written: {e}"))?;

    if !args.quiet && !export.diagnostics.is_empty() {
        eprintln!("{} block(s) had problems:", export.diagnostics.len());
        for issue in &export.diagnostics {
            eprintln!("  {issue}");
        }
    }

    if args.stdout {
        println!("{}", export.html);
        return Ok(());
    }

    let paths = write_artifacts(&export, &args.output, &args.prefix, time_now_millis())
        .map_err(|e| e.to_string())?;
    if !args.quiet {
        println!("{}", paths.html.display());
        println!("{}", paths.text.display());
        println!("Exported HTML and plaintext.");
    }
    Ok(())
}

fn list_blocks() {
    let registry = Registry::build(&mut IdGenerator::new());
    for entry in registry.entries() {
        println!("{:<16} {} fields", entry.kind.name(), entry.fields.len());
    }
}

fn schema(block: Option<&str>) -> Result<(), String> {
    let registry = Registry::build(&mut IdGenerator::new());
    let value = match block {
        Some(name) => {
            let entry = registry
                .get(name)
                .ok_or_else(|| format!("unknown block type `{name}` (see `blockmail blocks`)"))?;
            to_json(entry)?
        }
        None => {
            let mut components = Map::new();
            for entry in registry.entries() {
                components.insert(entry.kind.name().to_string(), to_json(entry)?);
            }
            let mut all = Map::new();
            all.insert("root".to_string(), to_json(registry.root())?);
            all.insert("zones".to_string(), to_json(registry.zones())?);
            all.insert("components".to_string(), Value::Object(components));
            Value::Object(all)
        }
    };

    let text = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}
