use crate::graph::{InputSource, RecipeGraph};
use std::fmt::{self, Write};

/// Formats a recipe graph into a human-readable listing for debugging.
pub fn visualize(graph: &RecipeGraph) -> String {
    Listing(graph).to_string()
}

struct Listing<'a>(&'a RecipeGraph);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.0;
        writeln!(f, "======== RECIPE GRAPH (version {}) ========", graph.version())?;

        if !graph.recipe_inputs().is_empty() {
            writeln!(f, "\n--- RECIPE INPUTS ---")?;
            for input in graph.recipe_inputs() {
                let required = if input.required { "required" } else { "optional" };
                writeln!(f, "  {:<20} {:<9} {}", input.name, input.kind, required)?;
            }
        }

        writeln!(f, "\n--- JOBS ---")?;
        let layers = graph.layers().unwrap_or_default();
        // a cyclic graph can't be ordered; fall back to insertion order
        let order: Vec<&str> = match graph.topological_order() {
            Ok(order) => order,
            Err(_) => graph.nodes().map(|n| n.name()).collect(),
        };
        for name in order {
            let Some(node) = graph.node(name) else {
                continue;
            };
            let level = layers.get(name).copied().unwrap_or(0);
            writeln!(
                f,
                "\n[{:02}] {} ({} {})",
                level,
                name,
                node.schema().name,
                node.schema().version
            )?;
            for entry in graph.compute_input_sources(name).unwrap_or_default() {
                let mut line = format!("      <- {:<16}", entry.input.name);
                if entry.sources.is_empty() {
                    line.push_str(" (unmapped)");
                }
                for source in &entry.sources {
                    match &source.source {
                        InputSource::Recipe => write!(line, " recipe.{}", source.output)?,
                        InputSource::Job(producer) => write!(line, " {}.{}", producer, source.output)?,
                    }
                }
                writeln!(f, "{}", line)?;
            }
            for output in &node.schema().output_data {
                let consumers = graph.compute_dependents(name, &output.name);
                if consumers.is_empty() {
                    continue;
                }
                let targets: Vec<String> = consumers
                    .iter()
                    .map(|d| format!("{}.{}", d.name, d.input))
                    .collect();
                writeln!(f, "      -> {:<16} {}", output.name, targets.join(", "))?;
            }
        }

        writeln!(f, "\n--- EDGES ---")?;
        for (from, to) in graph.edges() {
            writeln!(f, "  {} -> {}", from, to)?;
        }

        writeln!(f, "\n================ END OF GRAPH ================")
    }
}
