use super::RecipeGraph;
use super::node::NodeId;
use crate::error::GraphError;
use ahash::AHashMap;
use std::collections::VecDeque;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

impl RecipeGraph {
    /// Checks that the dependency relation has no cycle.
    ///
    /// The virtual start vertex only has outgoing edges and the end vertex
    /// only incoming ones, so neither can be part of a cycle; only the job
    /// edges need walking.
    pub fn validate_acyclic(&self) -> Result<(), GraphError> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        // (job, index of the next consumer to look at)
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        for root in 0..self.nodes.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::OnStack;
            stack.push((NodeId(root), 0));

            while let Some(top) = stack.last_mut() {
                let (id, cursor) = *top;
                let Some(&next) = self.consumers[id.0].get(cursor) else {
                    marks[id.0] = Mark::Done;
                    stack.pop();
                    continue;
                };
                top.1 += 1;
                match marks[next.0] {
                    Mark::Unvisited => {
                        marks[next.0] = Mark::OnStack;
                        stack.push((next, 0));
                    }
                    Mark::OnStack => return Err(self.cycle_through(&stack, next)),
                    Mark::Done => {}
                }
            }
        }
        Ok(())
    }

    fn cycle_through(&self, stack: &[(NodeId, usize)], closing: NodeId) -> GraphError {
        let from = stack.iter().position(|&(n, _)| n == closing).unwrap_or(0);
        let mut path: Vec<String> = stack[from..]
            .iter()
            .map(|&(n, _)| self.nodes[n.0].name.clone())
            .collect();
        path.push(self.nodes[closing.0].name.clone());
        GraphError::Cycle { path }
    }

    /// Job names ordered so every producer comes before its consumers.
    ///
    /// Ties keep insertion order.
    pub fn topological_order(&self) -> Result<Vec<&str>, GraphError> {
        let mut in_degree: Vec<usize> = vec![0; self.nodes.len()];
        for consumers in &self.consumers {
            for c in consumers {
                in_degree[c.0] += 1;
            }
        }
        let mut ready: VecDeque<usize> = (0..self.nodes.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(i) = ready.pop_front() {
            order.push(self.nodes[i].name());
            let mut released: Vec<usize> = Vec::new();
            for c in &self.consumers[i] {
                in_degree[c.0] -= 1;
                if in_degree[c.0] == 0 {
                    released.push(c.0);
                }
            }
            released.sort_unstable();
            ready.extend(released);
        }
        if order.len() < self.nodes.len() {
            self.validate_acyclic()?;
        }
        Ok(order)
    }

    /// Depth of each job below start. Jobs without dependencies sit at 1.
    pub fn layers(&self) -> Result<AHashMap<&str, usize>, GraphError> {
        let mut depth: AHashMap<&str, usize> = AHashMap::new();
        for name in self.topological_order()? {
            let Some(node) = self.node(name) else {
                continue;
            };
            let level = node
                .dependencies
                .iter()
                .filter_map(|d| depth.get(d.producer.as_str()))
                .max()
                .map_or(1, |deepest| deepest + 1);
            depth.insert(name, level);
        }
        Ok(depth)
    }

    /// Path of job names from `from` down to `to` following consumer edges.
    pub(crate) fn downstream_path(&self, from: NodeId, to: NodeId) -> Option<Vec<String>> {
        let mut parent: AHashMap<NodeId, NodeId> = AHashMap::new();
        let mut queue = VecDeque::from([from]);
        let mut seen = vec![false; self.nodes.len()];
        seen[from.0] = true;

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![self.nodes[current.0].name.clone()];
                let mut cursor = current;
                while let Some(&prev) = parent.get(&cursor) {
                    path.push(self.nodes[prev.0].name.clone());
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }
            for &next in &self.consumers[current.0] {
                if !seen[next.0] {
                    seen[next.0] = true;
                    parent.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        None
    }
}
