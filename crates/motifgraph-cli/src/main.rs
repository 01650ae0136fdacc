//! Motifgraph CLI
//!
//! Command-line interface for:
//! - Detecting fans, D-connectors and cliques in an edge-list file
//! - Decoding collapsed-attribute strings
//! - Printing the default detection config as JSON

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use motifgraph_dsl::parse_edge_list;
use motifgraph_engine::{
    detect_motifs, CollapsedAttributes, Detection, MotifConfig, MotifFamilies, MultiGraph,
    TracingObserver,
};

mod render;

#[derive(Parser)]
#[command(name = "motifgraph")]
#[command(
    author,
    version,
    about = "Motifgraph: find collapsible motifs (fans, D-connectors, cliques) in graphs"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect motifs in an edge-list file (`a-b` per line, `-` for stdin).
    Detect(DetectArgs),

    /// Decode a collapsed-attribute string into its key/value pairs.
    Decode {
        /// Encoded attributes (`key=value` pairs joined by U+2593).
        attributes: String,

        /// Print the pairs as a JSON object.
        #[arg(long)]
        json: bool,
    },

    /// Print the default detection config as JSON.
    Config {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct DetectArgs {
    /// Edge-list file; `-` reads stdin.
    input: PathBuf,

    /// JSON config file; flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma list of families: fan, d-connector, clique, all.
    #[arg(short, long)]
    families: Option<String>,

    #[arg(long)]
    min_anchors: Option<usize>,

    #[arg(long)]
    max_anchors: Option<usize>,

    #[arg(long)]
    min_span: Option<usize>,

    #[arg(long)]
    max_span: Option<usize>,

    #[arg(long)]
    min_clique: Option<usize>,

    #[arg(long)]
    max_clique: Option<usize>,

    /// Keep overlapping cliques with their unclaimed members.
    #[arg(long)]
    trim_cliques: bool,

    /// Emit a JSON report instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Detect(args) => cmd_detect(&args),
        Commands::Decode { attributes, json } => cmd_decode(&attributes, json),
        Commands::Config { out } => cmd_config(out.as_deref()),
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
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read edge list from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn build_config(args: &DetectArgs) -> Result<MotifConfig> {
    let mut config = match &args.config {
        Some(path) => MotifConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MotifConfig::default(),
    };

    if let Some(families) = &args.families {
        config.families = families.parse::<MotifFamilies>()?;
    }
    let overrides = [
        (args.min_anchors, &mut config.min_anchors),
        (args.max_anchors, &mut config.max_anchors),
        (args.min_span, &mut config.min_span),
        (args.max_span, &mut config.max_span),
        (args.min_clique, &mut config.min_clique),
        (args.max_clique, &mut config.max_clique),
    ];
    for (value, slot) in overrides {
        if let Some(value) = value {
            *slot = value;
        }
    }
    if args.trim_cliques {
        config.trim_overlapping_cliques = true;
    }

    config.validate()?;
    Ok(config)
}

fn cmd_detect(args: &DetectArgs) -> Result<()> {
    let config = build_config(args)?;
    let text = read_input(&args.input)?;
    let doc = parse_edge_list(&text)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    let graph = MultiGraph::from_edge_list(&doc);
    tracing::info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );

    let observer = TracingObserver::new();
    let report = match detect_motifs(&graph, &config, Some(&observer))? {
        Detection::Completed(report) => report,
        Detection::Cancelled => bail!("motif detection was cancelled"),
    };

    if args.json {
        let doc = render::json_report(&graph, &report);
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    eprintln!(
        "{} {} motif(s) in {} vertices / {} edges",
        "ok".green().bold(),
        report.len(),
        graph.vertex_count(),
        graph.edge_count()
    );
    for line in render::text_report(&graph, &report) {
        println!("{line}");
    }
    Ok(())
}

fn cmd_decode(attributes: &str, json: bool) -> Result<()> {
    let attrs = CollapsedAttributes::decode(attributes.trim());
    if attrs.is_empty() {
        return Err(anyhow!("no key=value pairs found in input"));
    }

    if json {
        let object: serde_json::Map<String, serde_json::Value> = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        println!("{}", serde_json::to_string_pretty(&object)?);
        return Ok(());
    }

    let width = attrs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in attrs.iter() {
        println!("{}  {}", format!("{key:<width$}").bold(), value);
    }
    if attrs.group_type().is_none() {
        eprintln!(
            "{} unknown or missing Type `{}`",
            "warning:".yellow().bold(),
            attrs.type_tag()
        );
    }
    Ok(())
}

fn cmd_config(out: Option<&Path>) -> Result<()> {
    let json = MotifConfig::default().to_json_pretty()?;
    match out {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => println!("{json}"),
    }
    Ok(())
}
