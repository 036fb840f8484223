use super::RecipeGraph;
use super::node::{InputSource, StartLink};
use crate::error::GraphError;
use crate::schema::InputDescriptor;
use serde::Serialize;
use std::fmt;

/// A vertex of the full recipe graph, including the virtual endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertex<'a> {
    Start,
    End,
    Job(&'a str),
}

impl Vertex<'_> {
    /// The id a renderer uses for this vertex.
    pub fn id(&self) -> &str {
        match self {
            Vertex::Start => "start",
            Vertex::End => "end",
            Vertex::Job(name) => *name,
        }
    }
}

impl fmt::Display for Vertex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A consumer of one producer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependent {
    pub name: String,
    pub output: String,
    pub input: String,
}

/// One source feeding a job input.
///
/// `output` is the producer output, or the recipe input name when
/// `source` is [`InputSource::Recipe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputMapping {
    pub source: InputSource,
    pub output: String,
    pub input: String,
}

/// Every source currently feeding one declared input of a job.
#[derive(Debug, Clone)]
pub struct InputSources<'a> {
    pub input: &'a InputDescriptor,
    pub sources: Vec<InputMapping>,
}

impl RecipeGraph {
    /// Lists the jobs consuming `output` of job `name`.
    ///
    /// Unknown jobs or outputs simply have no dependents.
    pub fn compute_dependents(&self, name: &str, output: &str) -> Vec<Dependent> {
        let Some(&producer) = self.index.get(name) else {
            return Vec::new();
        };
        self.consumers[producer.0]
            .iter()
            .map(|c| &self.nodes[c.0])
            .filter_map(|consumer| {
                consumer
                    .dependency(name)
                    .map(|dependency| (consumer.name(), dependency))
            })
            .flat_map(move |(consumer, dependency)| {
                dependency
                    .connections
                    .iter()
                    .filter(move |c| c.output == output)
                    .map(move |c| Dependent {
                        name: consumer.to_string(),
                        output: c.output.clone(),
                        input: c.input.clone(),
                    })
            })
            .collect()
    }

    /// Collects, for every declared input of job `name`, the sources targeting it.
    ///
    /// This reports what is there; an input with two sources shows both.
    pub fn compute_input_sources(&self, name: &str) -> Result<Vec<InputSources<'_>>, GraphError> {
        let node = &self.nodes[self.id_of(name)?.0];
        Ok(node
            .schema
            .input_data
            .iter()
            .map(|input| {
                let from_jobs = node.dependencies.iter().flat_map(move |dependency| {
                    dependency
                        .connections
                        .iter()
                        .filter(move |c| c.input == input.name)
                        .map(move |c| InputMapping {
                            source: InputSource::Job(dependency.producer.clone()),
                            output: c.output.clone(),
                            input: c.input.clone(),
                        })
                });
                let from_recipe = node
                    .recipe_inputs
                    .iter()
                    .filter(|b| b.job_input == input.name)
                    .map(|b| InputMapping {
                        source: InputSource::Recipe,
                        output: b.recipe_input.clone(),
                        input: b.job_input.clone(),
                    });
                InputSources {
                    input,
                    sources: from_jobs.chain(from_recipe).collect(),
                }
            })
            .collect())
    }

    pub fn start_link(&self, name: &str) -> Option<StartLink> {
        self.node(name).map(|n| n.start_link())
    }

    /// Whether job `name` has no dependencies and no recipe input bindings.
    pub fn is_start_fed(&self, name: &str) -> bool {
        self.start_link(name) == Some(StartLink::Implicit)
    }

    /// Jobs with no dependencies; the renderer draws `start -> job` for these.
    pub fn start_successors(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.dependencies.is_empty())
            .map(|n| n.name())
            .collect()
    }

    /// Jobs no other job depends on; the renderer draws `job -> end` for these.
    pub fn end_predecessors(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .zip(&self.consumers)
            .filter(|(_, consumers)| consumers.is_empty())
            .map(|(n, _)| n.name())
            .collect()
    }

    /// Every edge of the full graph, start and end included.
    pub fn edges(&self) -> Vec<(Vertex<'_>, Vertex<'_>)> {
        let from_start = self
            .start_successors()
            .into_iter()
            .map(|n| (Vertex::Start, Vertex::Job(n)));
        let between = self.nodes.iter().flat_map(|consumer| {
            consumer
                .dependencies
                .iter()
                .map(move |d| (Vertex::Job(d.producer.as_str()), Vertex::Job(consumer.name())))
        });
        let to_end = self
            .end_predecessors()
            .into_iter()
            .map(|n| (Vertex::Job(n), Vertex::End));
        from_start.chain(between).chain(to_end).collect()
    }
}
