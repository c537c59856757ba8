//! Interview graph implementation using petgraph.
//!
//! Nodes are questions and synthetic sinks, edges are the answers that
//! lead from one to the next. Besides the petgraph storage the graph keeps
//! an ordered list of declarations so rendering reproduces the exact order
//! in which the traversal produced nodes and edges.

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::fmt;

/// The role a node plays in an interview graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Synthetic entry point labelled with the initial state. Never declared.
    Entry,
    /// A question from the decision tree.
    Question,
    /// Sink reached when no question follows an answer.
    Done,
    /// Sink reached when a resolver terminates the interview.
    Terminated,
}

impl NodeKind {
    /// Returns true for the `Done` and `Terminated` sinks.
    pub fn is_sink(&self) -> bool {
        matches!(self, NodeKind::Done | NodeKind::Terminated)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Question => write!(f, "question"),
            Self::Done => write!(f, "done"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// Represents a node in the interview graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewNode {
    /// Question text or sink label, unquoted
    pub label: String,
    /// Role of the node
    pub kind: NodeKind,
}

impl InterviewNode {
    /// Creates a new node.
    pub fn new(label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    /// Returns the identifier used for this node in DOT output.
    ///
    /// Question and entry labels are always wrapped in quotes, verbatim.
    /// Sink labels are left bare when they are plain identifiers.
    ///
    /// # Example
    ///
    /// ```rust
    /// use interview_graph::graph::{InterviewNode, NodeKind};
    ///
    /// assert_eq!(InterviewNode::new("Done", NodeKind::Done).dot_id(), "Done");
    /// assert_eq!(InterviewNode::new("Done", NodeKind::Question).dot_id(), "\"Done\"");
    /// ```
    pub fn dot_id(&self) -> String {
        match self.kind {
            NodeKind::Entry | NodeKind::Question => quote(&self.label),
            NodeKind::Done | NodeKind::Terminated => quote_if_needed(&self.label),
        }
    }
}

/// Represents an edge in the interview graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewEdge {
    /// The answer that produced the transition
    pub label: String,
}

impl InterviewEdge {
    /// Creates a new edge with the given answer label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Declaration {
    Node(NodeIndex),
    Edge(EdgeIndex),
}

/// A declaration in output order, resolved against the graph.
#[derive(Debug, Clone, Copy)]
pub enum Statement<'a> {
    /// A node declaration
    Node(&'a InterviewNode),
    /// A labelled directed edge
    Edge {
        from: &'a InterviewNode,
        to: &'a InterviewNode,
        label: &'a str,
    },
}

/// A directed graph of interview states.
///
/// Nodes are never merged: adding the same question twice yields two
/// nodes with the same label, and renderers that key on labels fold them
/// together visually.
///
/// # Example
///
/// ```rust
/// use interview_graph::graph::{InterviewGraph, NodeKind};
///
/// let mut graph = InterviewGraph::new("interview");
/// let done = graph.add_node("Done", NodeKind::Done);
/// let q = graph.add_node("Ready?", NodeKind::Question);
/// graph.add_edge(q, done, "Yes");
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.done_edge_count(), 1);
/// assert_eq!(
///     graph.to_dot(),
///     "digraph interview {\nDone;\n\"Ready?\";\n\"Ready?\" -> Done [ label=Yes ]\n}\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct InterviewGraph {
    /// Name written after `digraph`
    name: String,
    /// The underlying directed graph
    graph: DiGraph<InterviewNode, InterviewEdge>,
    /// Node and edge declarations in the order they were made
    declarations: Vec<Declaration>,
}

impl Default for InterviewGraph {
    fn default() -> Self {
        Self::new("interview")
    }
}

impl InterviewGraph {
    /// Creates a new empty graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: DiGraph::new(),
            declarations: Vec::new(),
        }
    }

    /// Returns the graph name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds and declares a node.
    ///
    /// No deduplication happens; callers decide when a node is new.
    pub fn add_node(&mut self, label: impl Into<String>, kind: NodeKind) -> NodeIndex {
        let idx = self.graph.add_node(InterviewNode::new(label, kind));
        self.declarations.push(Declaration::Node(idx));
        idx
    }

    /// Adds a node that only appears as an edge endpoint.
    ///
    /// Used for the entry node, which has no declaration line of its own.
    pub fn add_undeclared_node(&mut self, label: impl Into<String>, kind: NodeKind) -> NodeIndex {
        self.graph.add_node(InterviewNode::new(label, kind))
    }

    /// Adds and declares a labelled edge from `from` to `to`.
    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        label: impl Into<String>,
    ) -> EdgeIndex {
        let idx = self.graph.add_edge(from, to, InterviewEdge::new(label));
        self.declarations.push(Declaration::Edge(idx));
        idx
    }

    /// Gets a node by index.
    pub fn node(&self, idx: NodeIndex) -> Option<&InterviewNode> {
        self.graph.node_weight(idx)
    }

    /// Iterates over declarations in output order.
    pub fn statements(&self) -> impl Iterator<Item = Statement<'_>> + '_ {
        self.declarations.iter().filter_map(move |decl| match *decl {
            Declaration::Node(idx) => self.graph.node_weight(idx).map(Statement::Node),
            Declaration::Edge(idx) => {
                let (from, to) = self.graph.edge_endpoints(idx)?;
                Some(Statement::Edge {
                    from: self.graph.node_weight(from)?,
                    to: self.graph.node_weight(to)?,
                    label: self.graph.edge_weight(idx)?.label.as_str(),
                })
            }
        })
    }

    /// Iterates over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &InterviewNode)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// Iterates over all edges in insertion order as `(from, to, label)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &str)> + '_ {
        self.graph
            .raw_edges()
            .iter()
            .map(|edge| (edge.source(), edge.target(), edge.weight.label.as_str()))
    }

    /// Returns the labels of edges leaving `idx`, in the order they were added.
    pub fn outgoing_labels(&self, idx: NodeIndex) -> Vec<&str> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.weight().label.as_str()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, label)| label).collect()
    }

    /// Finds every node with the given label, in insertion order.
    pub fn find_nodes(&self, label: &str) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].label == label)
            .collect()
    }

    /// Returns the total number of nodes, including the undeclared entry node.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of declared nodes.
    pub fn declared_node_count(&self) -> usize {
        self.declarations
            .iter()
            .filter(|decl| matches!(decl, Declaration::Node(_)))
            .count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns the number of question nodes, counting repeats.
    pub fn question_count(&self) -> usize {
        self.count_nodes(NodeKind::Question)
    }

    /// Returns the number of terminated sinks. Each termination gets its own.
    pub fn terminated_count(&self) -> usize {
        self.count_nodes(NodeKind::Terminated)
    }

    /// Returns the number of edges ending at a `Done` sink.
    pub fn done_edge_count(&self) -> usize {
        self.graph
            .raw_edges()
            .iter()
            .filter(|edge| self.graph[edge.target()].kind == NodeKind::Done)
            .count()
    }

    /// Renders the graph in DOT format.
    pub fn to_dot(&self) -> String {
        crate::export::dot::DotExporter.render(self)
    }

    fn count_nodes(&self, kind: NodeKind) -> usize {
        self.graph
            .raw_nodes()
            .iter()
            .filter(|node| node.weight.kind == kind)
            .count()
    }
}

/// Wraps `s` in double quotes without escaping.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s)
}

/// Returns true if `s` can appear unquoted as a DOT identifier.
pub fn is_bare_id(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Leaves plain identifiers bare and quotes everything else.
pub fn quote_if_needed(s: &str) -> String {
    if is_bare_id(s) {
        s.to_string()
    } else {
        quote(s)
    }
}
