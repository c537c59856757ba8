//! DOT export implementation.
//!
//! Writes the graph as a Graphviz `digraph`, one declaration per line in
//! the order the traversal produced them.

use super::Exporter;
use crate::graph::{quote_if_needed, InterviewGraph, Statement};
use std::io::{self, Write};

/// DOT exporter implementation.
pub struct DotExporter;

impl DotExporter {
    /// Renders the graph to a DOT string.
    pub fn render(&self, graph: &InterviewGraph) -> String {
        let mut out = format!("digraph {} {{\n", quote_if_needed(graph.name()));

        for statement in graph.statements() {
            match statement {
                Statement::Node(node) => {
                    out.push_str(&node.dot_id());
                    out.push_str(";\n");
                }
                Statement::Edge { from, to, label } => {
                    out.push_str(&format!(
                        "{} -> {} [ label={} ]\n",
                        from.dot_id(),
                        to.dot_id(),
                        quote_if_needed(label)
                    ));
                }
            }
        }

        out.push_str("}\n");
        out
    }
}

impl Exporter for DotExporter {
    fn export<W: Write>(&self, graph: &InterviewGraph, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render(graph).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    #[test]
    fn test_empty_graph() {
        let graph = InterviewGraph::new("interview");
        assert_eq!(DotExporter.render(&graph), "digraph interview {\n}\n");
    }

    #[test]
    fn test_graph_name_is_quoted_when_needed() {
        let graph = InterviewGraph::new("my interview");
        assert!(DotExporter.render(&graph).starts_with("digraph \"my interview\" {"));
    }

    #[test]
    fn test_entry_node_is_not_declared() {
        let mut graph = InterviewGraph::default();
        let entry = graph.add_undeclared_node("START", NodeKind::Entry);
        let q = graph.add_node("Q", NodeKind::Question);
        graph.add_edge(entry, q, "");

        assert_eq!(
            DotExporter.render(&graph),
            "digraph interview {\n\"Q\";\n\"START\" -> \"Q\" [ label=\"\" ]\n}\n"
        );
    }

    #[test]
    fn test_labels_are_not_escaped() {
        let mut graph = InterviewGraph::default();
        let done = graph.add_node("Done", NodeKind::Done);
        let q = graph.add_node("Say \"hi\"", NodeKind::Question);
        graph.add_edge(q, done, "a b");

        let out = DotExporter.render(&graph);
        assert!(out.contains("\"Say \"hi\"\";\n"));
        assert!(out.contains("-> Done [ label=\"a b\" ]"));
    }

    #[test]
    fn test_export_writes_render() {
        let mut graph = InterviewGraph::default();
        graph.add_node("Done", NodeKind::Done);

        let mut output = Vec::new();
        DotExporter.export(&graph, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "digraph interview {\nDone;\n}\n");
    }
}
