use clap::{Args, Parser, Subcommand};
use recipe_graph::editor::EditorSession;
use recipe_graph::gateway::FileGateway;
use recipe_graph::graph::{AutoWire, GraphBuilder, GraphConfig, RecipeGraph};
use recipe_graph::render::{RenderGraph, visualize};
use recipe_graph::schema::Catalog;
use recipe_graph::validate::{ValidationReport, validate};
use std::fs;
use std::time::Instant;
use tracing::debug;

/// Inspect, validate and query recipe dependency graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Path to the job type catalog JSON file
    #[arg(short, long, global = true, default_value = "job_types.json")]
    catalog: String,

    /// Optional path to a graph configuration JSON file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Directory of stored recipe types; RECIPE is then a recipe type id
    #[arg(long, global = true)]
    store: Option<String>,

    /// Never auto-wire the first recipe input, whatever the config says
    #[arg(long, global = true)]
    no_auto_wire: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a listing of the jobs, their sources and the graph edges
    Inspect {
        /// Recipe definition file (or id with --store)
        recipe: String,
        /// Print the renderer view as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Report validation warnings
    Validate {
        /// Recipe definition file (or id with --store)
        recipe: String,
    },
    /// List the jobs consuming one output of a job
    Dependents {
        /// Recipe definition file (or id with --store)
        recipe: String,
        job: String,
        output: String,
    },
    /// Print the jobs in dependency order
    Order {
        /// Recipe definition file (or id with --store)
        recipe: String,
    },
}

impl Command {
    fn recipe(&self) -> &str {
        match self {
            Command::Inspect { recipe, .. }
            | Command::Validate { recipe }
            | Command::Dependents { recipe, .. }
            | Command::Order { recipe } => recipe,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let start = Instant::now();

    let catalog_json = fs::read_to_string(&cli.source.catalog).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read catalog file '{}': {}",
            cli.source.catalog, e
        ))
    });
    let catalog = Catalog::from_json(&catalog_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load catalog: {}", e)));

    let builder = graph_builder(&cli.source);
    let mut session = open_session(&cli, builder, &catalog);
    debug!(elapsed = ?start.elapsed(), jobs = session.graph().len(), "recipe loaded");

    match &cli.command {
        Command::Inspect { json, .. } => {
            if *json {
                let view = RenderGraph::new(session.graph());
                let output = serde_json::to_string_pretty(&view)
                    .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode view: {}", e)));
                println!("{}", output);
            } else {
                print!("{}", visualize(session.graph()));
            }
        }
        Command::Validate { .. } => {
            let report = match &cli.source.store {
                Some(store) => {
                    let gateway = FileGateway::new(store).with_catalog(catalog.clone());
                    session
                        .validate_remote(&gateway)
                        .unwrap_or_else(|e| exit_with_error(&format!("Validation failed: {}", e)))
                }
                None => validate(session.graph()),
            };
            print_report(&report);
        }
        Command::Dependents { job, output, .. } => {
            let graph = session.graph();
            if !graph.contains(job) {
                exit_with_error(&format!("Job '{}' not found in the recipe", job));
            }
            let dependents = graph.compute_dependents(job, output);
            if dependents.is_empty() {
                println!("No job consumes {}.{}", job, output);
            }
            for dependent in dependents {
                println!("{}.{} -> {}.{}", job, dependent.output, dependent.name, dependent.input);
            }
        }
        Command::Order { .. } => {
            let graph = session.graph();
            let order = graph
                .topological_order()
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            let layers = graph.layers().unwrap_or_default();
            for name in order {
                println!("{:>3}  {}", layers.get(name).copied().unwrap_or(0), name);
            }
        }
    }

    debug!(elapsed = ?start.elapsed(), "done");
}

fn graph_builder(args: &SourceArgs) -> GraphBuilder {
    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read config file '{}': {}", path, e))
            });
            GraphConfig::from_json(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse config JSON: {}", e)))
        }
        None => GraphConfig::default(),
    };
    let builder = RecipeGraph::builder().with_config(config);
    if args.no_auto_wire {
        builder.auto_wire(AutoWire::Disabled)
    } else {
        builder
    }
}

fn open_session(cli: &Cli, builder: GraphBuilder, catalog: &Catalog) -> EditorSession {
    let recipe = cli.command.recipe();
    match &cli.source.store {
        Some(store) => {
            let id: u64 = recipe.parse().unwrap_or_else(|_| {
                exit_with_error(&format!("'{}' is not a recipe type id", recipe))
            });
            let gateway = FileGateway::new(store);
            EditorSession::open(&gateway, catalog, id, builder)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to open recipe type {}: {}", id, e)))
        }
        None => {
            let json = fs::read_to_string(recipe).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read recipe file '{}': {}", recipe, e))
            });
            let graph = builder
                .load(json.as_str(), catalog)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to load recipe: {}", e)));
            EditorSession::new(recipe, graph)
        }
    }
}

fn print_report(report: &ValidationReport) {
    if report.is_clean() {
        println!("No warnings.");
        return;
    }
    println!("{} warning(s):", report.warnings.len());
    for warning in &report.warnings {
        println!("  {}", warning);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
