//! JSON export implementation.
//!
//! Exports interview graphs in JSON format for machine-readable output.

use super::Exporter;
use crate::graph::InterviewGraph;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable node for JSON output.
#[derive(Serialize)]
struct JsonNode {
    id: usize,
    kind: String,
    label: String,
}

/// Serializable edge for JSON output.
#[derive(Serialize)]
struct JsonEdge {
    from: usize,
    to: usize,
    label: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    nodes: usize,
    edges: usize,
    questions: usize,
    done_edges: usize,
    terminated: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    name: String,
    summary: JsonSummary,
    nodes: Vec<JsonNode>,
    edges: Vec<JsonEdge>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, graph: &InterviewGraph, writer: &mut W) -> io::Result<()> {
        let nodes: Vec<JsonNode> = graph
            .nodes()
            .map(|(idx, node)| JsonNode {
                id: idx.index(),
                kind: node.kind.to_string(),
                label: node.label.clone(),
            })
            .collect();

        let edges: Vec<JsonEdge> = graph
            .edges()
            .map(|(from, to, label)| JsonEdge {
                from: from.index(),
                to: to.index(),
                label: label.to_string(),
            })
            .collect();

        let export = JsonExport {
            name: graph.name().to_string(),
            summary: JsonSummary {
                nodes: graph.node_count(),
                edges: graph.edge_count(),
                questions: graph.question_count(),
                done_edges: graph.done_edge_count(),
                terminated: graph.terminated_count(),
            },
            nodes,
            edges,
        };

        serde_json::to_writer_pretty(&mut *writer, &export)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    fn create_test_graph() -> InterviewGraph {
        let mut graph = InterviewGraph::new("survey");
        let done = graph.add_node("Done", NodeKind::Done);
        let entry = graph.add_undeclared_node("START", NodeKind::Entry);
        let q = graph.add_node("Ready?", NodeKind::Question);
        graph.add_edge(entry, q, "");
        graph.add_edge(q, done, "Yes");
        let exit = graph.add_node("<EXIT WITH NO RESULT>", NodeKind::Terminated);
        graph.add_edge(q, exit, "No");
        graph
    }

    fn export_value(graph: &InterviewGraph) -> serde_json::Value {
        let mut output = Vec::new();
        JsonExporter.export(graph, &mut output).unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn test_json_export_summary() {
        let parsed = export_value(&create_test_graph());

        assert_eq!(parsed["name"], "survey");
        assert_eq!(parsed["summary"]["nodes"], 4);
        assert_eq!(parsed["summary"]["edges"], 3);
        assert_eq!(parsed["summary"]["questions"], 1);
        assert_eq!(parsed["summary"]["done_edges"], 1);
        assert_eq!(parsed["summary"]["terminated"], 1);
    }

    #[test]
    fn test_json_export_nodes() {
        let parsed = export_value(&create_test_graph());

        let nodes = parsed["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0]["kind"], "done");
        assert_eq!(nodes[1]["kind"], "entry");
        assert_eq!(nodes[1]["label"], "START");
        assert_eq!(nodes[2]["label"], "Ready?");
    }

    #[test]
    fn test_json_export_edges_in_order() {
        let parsed = export_value(&create_test_graph());

        let edges = parsed["edges"].as_array().unwrap();
        let labels: Vec<&str> = edges.iter().map(|e| e["label"].as_str().unwrap()).collect();
        assert_eq!(labels, vec!["", "Yes", "No"]);
        assert_eq!(edges[1]["from"], 2);
        assert_eq!(edges[1]["to"], 0);
    }

    #[test]
    fn test_json_ends_with_newline() {
        let mut output = Vec::new();
        JsonExporter
            .export(&InterviewGraph::default(), &mut output)
            .unwrap();
        assert_eq!(output.last(), Some(&b'\n'));
    }
}
