//! petgraph-based job dependency graph.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

/// One node per job name, one edge per `tRunJob` reference (duplicates kept).
/// Names invoked but not registered in the project still get a node.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub graph: DiGraph<String, ()>,
    pub node_indices: HashMap<String, NodeIndex>,
    registered: Vec<String>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    /// Register a project job and its children.
    pub fn add_job(&mut self, name: &str, children: &[String]) {
        let parent = self.index(name);
        if !self.registered.iter().any(|r| r == name) {
            self.registered.push(name.to_string());
        }
        for child in children {
            let child = self.index(child);
            self.graph.add_edge(parent, child, ());
        }
    }

    /// Distinct callers of `name`, sorted.
    pub fn parents(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Incoming)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(name) else {
            return vec![];
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Registered jobs that no job references directly, in registration order.
    pub fn masters(&self) -> Vec<String> {
        self.registered
            .iter()
            .filter(|name| self.parents(name).is_empty())
            .cloned()
            .collect()
    }

    /// Every dependency cycle as a sorted list of job names; self-invocations included.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || self.graph.contains_edge(component[0], component[0])
            })
            .map(|component| {
                let mut names: Vec<String> =
                    component.iter().map(|&idx| self.graph[idx].clone()).collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn masters_are_never_referenced() {
        let mut graph = DependencyGraph::new();
        graph.add_job("A", &names(&["B", "External"]));
        graph.add_job("B", &[]);
        graph.add_job("C", &[]);
        assert_eq!(graph.masters(), names(&["A", "C"]));
        assert!(!graph.registered.iter().any(|r| r == "External"));
        assert_eq!(graph.neighbors("A", Direction::Outgoing), vec!["B", "External"]);
        assert_eq!(graph.parents("B"), vec!["A"]);
    }

    #[test]
    fn unreachable_but_referenced_job_is_not_master() {
        // D is only called by E, and E is only called by D.
        let mut graph = DependencyGraph::new();
        graph.add_job("D", &names(&["E"]));
        graph.add_job("E", &names(&["D"]));
        assert!(graph.masters().is_empty());
        assert_eq!(graph.cycles(), vec![names(&["D", "E"])]);
    }

    #[test]
    fn self_invocation_is_a_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_job("Loop", &names(&["Loop"]));
        graph.add_job("Leaf", &[]);
        assert_eq!(graph.cycles(), vec![names(&["Loop"])]);
        assert_eq!(graph.masters(), names(&["Leaf"]));
    }
}
