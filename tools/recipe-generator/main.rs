use clap::Parser;
use rand::{Rng, rngs::ThreadRng};
use recipe_graph::graph::RecipeGraph;
use recipe_graph::recipe::RecipeInputDeclaration;
use recipe_graph::schema::{DataKind, JobTypeSchema};
use std::fs;
use std::sync::Arc;

/// A CLI tool to generate a random acyclic recipe and a matching job type catalog
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated recipe definition to
    #[arg(short, long, default_value = "generated_recipe.json")]
    output: String,

    /// The path to write the generated job type catalog to
    #[arg(short, long, default_value = "generated_job_types.json")]
    catalog: String,

    /// Number of job types in the catalog
    #[arg(long, default_value_t = 8)]
    job_types: usize,

    /// Number of jobs in the recipe
    #[arg(long, default_value_t = 12)]
    jobs: usize,

    /// Chance that a job depends on any given earlier job
    #[arg(long, default_value_t = 0.25)]
    density: f64,
}

const KINDS: [DataKind; 3] = [DataKind::Property, DataKind::File, DataKind::Files];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.job_types == 0 || !(0.0..=1.0).contains(&cli.density) {
        eprintln!("Error: --job-types must be positive and --density within 0..=1");
        std::process::exit(1);
    }

    println!(
        "Generating {} job types and a recipe of {} jobs (density {})...",
        cli.job_types, cli.jobs, cli.density
    );

    let job_types: Vec<Arc<JobTypeSchema>> = (0..cli.job_types)
        .map(|i| Arc::new(generate_job_type(&mut rng, i)))
        .collect();
    let graph = generate_recipe(&mut rng, &job_types, cli.jobs, cli.density)?;

    let catalog: Vec<&JobTypeSchema> = job_types.iter().map(|t| t.as_ref()).collect();
    fs::write(&cli.catalog, serde_json::to_string_pretty(&catalog)?)?;
    fs::write(&cli.output, graph.to_definition().to_json_pretty()?)?;

    println!(
        "Successfully wrote '{}' ({} jobs) and '{}'",
        cli.output,
        graph.len(),
        cli.catalog
    );
    Ok(())
}

/// A job type with one to three inputs and one or two outputs of random kinds.
fn generate_job_type(rng: &mut ThreadRng, index: usize) -> JobTypeSchema {
    let mut schema = JobTypeSchema::new(&format!("step-{}", index), "1.0").with_id(index as u64 + 1);
    for i in 0..rng.random_range(1..=3) {
        let kind = KINDS[rng.random_range(0..KINDS.len())];
        schema = schema.with_input(&format!("in_{}", i), kind, rng.random_bool(0.7));
    }
    for i in 0..rng.random_range(1..=2) {
        let kind = KINDS[rng.random_range(0..KINDS.len())];
        schema = schema.with_output(&format!("out_{}", i), kind);
    }
    schema
}

/// Places `jobs` random jobs and wires each only to jobs placed before it,
/// so the result is acyclic by construction.
fn generate_recipe(
    rng: &mut ThreadRng,
    job_types: &[Arc<JobTypeSchema>],
    jobs: usize,
    density: f64,
) -> Result<RecipeGraph, Box<dyn std::error::Error>> {
    let mut graph = RecipeGraph::new();
    graph.add_recipe_input(RecipeInputDeclaration::new("input_file", DataKind::File, true))?;

    let mut names = Vec::with_capacity(jobs);
    for _ in 0..jobs {
        let schema = Arc::clone(&job_types[rng.random_range(0..job_types.len())]);
        let name = graph.suggest_name(&schema.name);
        graph.add_node_named(Arc::clone(&schema), &name)?;

        for producer in &names {
            if !rng.random_bool(density) {
                continue;
            }
            let Some(producer_schema) = graph.node(producer).map(|n| Arc::clone(n.schema())) else {
                continue;
            };
            let free_input = schema.input_data.iter().find(|input| {
                graph.node(&name).is_some_and(|n| !n.is_input_bound(&input.name))
            });
            let matching_output = free_input.and_then(|input| {
                producer_schema
                    .output_data
                    .iter()
                    .find(|output| output.kind == input.kind)
                    .map(|output| (input, output))
            });
            match matching_output {
                Some((input, output)) => {
                    graph.map_input(&name, &input.name, producer, &output.name)?
                }
                None => {
                    graph.add_dependency(&name, producer)?;
                }
            }
        }

        let off_start = graph.node(&name).is_some_and(|n| n.dependencies().is_empty());
        if off_start {
            if let Some(input) = schema.input_data.iter().find(|i| i.kind.is_file()) {
                graph.map_recipe_input(&name, &input.name, "input_file")?;
            }
        }
        names.push(name);
    }
    Ok(graph)
}
