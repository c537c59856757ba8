//! Depth-first walk that turns a question tree into an [`InterviewGraph`].
//!
//! Every question is visited once per path that reaches it. Free-text
//! answers are simulated with a single placeholder input, each enabled
//! choice of a multiple-choice answer is explored with the same incoming
//! state, and message-only answers follow their single continuation.
//!
//! A question that reappears among its own ancestors is a cycle and aborts
//! the build. The same question reached through two separate paths is not
//! a cycle and is simply visited twice.

use std::fmt;
use std::ptr;

use petgraph::graph::NodeIndex;
use tracing::{debug, trace, warn};

use super::interview_graph::{InterviewGraph, NodeKind};
use crate::config::TraversalConfig;
use crate::question::{Answer, AnswerError, Question, Resolution};

/// Errors that abort graph construction.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A resolver failed for a reason other than termination.
    #[error("answering {question:?} with {answer:?}: {source}")]
    Resolver {
        question: String,
        answer: String,
        #[source]
        source: anyhow::Error,
    },

    /// A failure further down the tree, annotated with the path to it.
    #[error("after answering {question:?} with {answer:?}: {source}")]
    Nested {
        question: String,
        answer: String,
        #[source]
        source: Box<GraphError>,
    },

    /// A question leads back to itself.
    #[error("question {question:?} is its own ancestor")]
    Cycle { question: String },

    /// The tree is deeper than the configured `max_depth`.
    #[error("question {question:?} exceeds the maximum depth of {max_depth}")]
    DepthExceeded { question: String, max_depth: usize },
}

impl GraphError {
    /// Returns the innermost error, skipping path annotations.
    pub fn root_cause(&self) -> &GraphError {
        match self {
            GraphError::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns how many questions deep the failure happened.
    pub fn depth(&self) -> usize {
        match self {
            GraphError::Nested { source, .. } => 1 + source.depth(),
            _ => 0,
        }
    }
}

/// Walks a question tree and records transitions into a graph.
pub struct Traverser<'a> {
    graph: &'a mut InterviewGraph,
    config: &'a TraversalConfig,
    done: NodeIndex,
}

impl<'a> Traverser<'a> {
    /// Creates a traverser writing into `graph`, with `done` as the shared
    /// completion sink.
    pub fn new(
        graph: &'a mut InterviewGraph,
        config: &'a TraversalConfig,
        done: NodeIndex,
    ) -> Self {
        Self {
            graph,
            config,
            done,
        }
    }

    /// Visits `question`, linking it from `parent` with `label`, and
    /// recurses into every reachable follow-up question.
    pub fn visit<S: Clone>(
        &mut self,
        question: &Question<S>,
        state: S,
        parent: Option<NodeIndex>,
        label: &str,
    ) -> Result<(), GraphError> {
        let mut ancestors = Vec::new();
        self.walk(question, state, parent, label, &mut ancestors)
    }

    fn walk<S: Clone>(
        &mut self,
        question: &Question<S>,
        state: S,
        parent: Option<NodeIndex>,
        label: &str,
        ancestors: &mut Vec<*const Question<S>>,
    ) -> Result<(), GraphError> {
        if ancestors.iter().any(|&ancestor| ptr::eq(ancestor, question)) {
            warn!(question = %question.text, "question tree contains a cycle");
            return Err(GraphError::Cycle {
                question: question.text.clone(),
            });
        }

        let config = self.config;
        let depth = ancestors.len();
        if let Some(max_depth) = config.max_depth {
            if depth >= max_depth {
                warn!(question = %question.text, max_depth, "depth limit reached");
                return Err(GraphError::DepthExceeded {
                    question: question.text.clone(),
                    max_depth,
                });
            }
        }

        debug!(
            question = %question.text,
            answer = question.answer.label(),
            depth,
            "visiting question"
        );
        let node = self.graph.add_node(question.text.as_str(), NodeKind::Question);
        if let Some(parent) = parent {
            self.graph.add_edge(parent, node, label);
        }

        ancestors.push(question);
        let result = match &question.answer {
            Answer::Text(resolve) => {
                let input = config.text_input.as_str();
                let resolution = resolve(state, input);
                self.advance(question, node, resolution, input, ancestors)
            }
            Answer::MultipleChoice(choices) => choices.iter().try_for_each(|choice| {
                let Some(choose) = &choice.choose else {
                    trace!(
                        question = %question.text,
                        choice = %choice.text,
                        "skipping disabled choice"
                    );
                    return Ok(());
                };
                let resolution = choose(state.clone());
                self.advance(question, node, resolution, &choice.text, ancestors)
            }),
            Answer::Message(resolve) => {
                let accepted = config.message_accepted.as_str();
                let resolution = resolve(state);
                self.advance(question, node, resolution, accepted, ancestors)
            }
        };
        ancestors.pop();
        result
    }

    /// Records the outcome of one resolver call made at `node`.
    fn advance<S: Clone>(
        &mut self,
        question: &Question<S>,
        node: NodeIndex,
        resolution: Resolution<S>,
        label: &str,
        ancestors: &mut Vec<*const Question<S>>,
    ) -> Result<(), GraphError> {
        match resolution {
            Ok((next_state, Some(next))) => self
                .walk(&*next, next_state, Some(node), label, ancestors)
                .map_err(|source| GraphError::Nested {
                    question: question.text.clone(),
                    answer: label.to_string(),
                    source: Box::new(source),
                }),
            Ok((_, None)) => {
                trace!(
                    question = %question.text,
                    answer = label,
                    "answer completes the interview"
                );
                self.graph.add_edge(node, self.done, label);
                Ok(())
            }
            Err(AnswerError::Terminate) => {
                trace!(
                    question = %question.text,
                    answer = label,
                    "answer terminates the interview"
                );
                let terminated = self
                    .graph
                    .add_node(self.config.terminated_label.as_str(), NodeKind::Terminated);
                self.graph.add_edge(node, terminated, label);
                Ok(())
            }
            Err(AnswerError::Failed(source)) => Err(GraphError::Resolver {
                question: question.text.clone(),
                answer: label.to_string(),
                source,
            }),
        }
    }
}

/// Builds the graph of every state reachable from `root`.
///
/// `entry_label` names the synthetic entry node that points at the root
/// question. Any resolver failure or cycle aborts the build; no partial
/// graph is returned.
///
/// # Example
///
/// ```rust
/// use interview_graph::config::TraversalConfig;
/// use interview_graph::graph::build_graph;
/// use interview_graph::question::{AnswerError, Choice, Question};
///
/// let root: Question<()> = Question::multiple_choice(
///     "Proceed?",
///     vec![
///         Choice::new("Yes", |s| Ok((s, None))),
///         Choice::new("No", |_| Err(AnswerError::Terminate)),
///     ],
/// );
///
/// let graph = build_graph(&root, (), "START", &TraversalConfig::default()).unwrap();
/// assert_eq!(graph.question_count(), 1);
/// assert_eq!(graph.done_edge_count(), 1);
/// assert_eq!(graph.terminated_count(), 1);
/// ```
pub fn build_graph<S: Clone>(
    root: &Question<S>,
    state: S,
    entry_label: impl Into<String>,
    config: &TraversalConfig,
) -> Result<InterviewGraph, GraphError> {
    let mut graph = InterviewGraph::new(config.graph_name.as_str());
    let done = graph.add_node(config.done_label.as_str(), NodeKind::Done);
    let entry = graph.add_undeclared_node(entry_label, NodeKind::Entry);

    Traverser::new(&mut graph, config, done).visit(root, state, Some(entry), "")?;

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "interview graph built"
    );
    Ok(graph)
}

/// Renders the graph reachable from `root` as DOT, using the default
/// configuration and the initial state's `Display` form as entry label.
///
/// # Example
///
/// ```rust
/// use interview_graph::graph::dot;
/// use interview_graph::question::Question;
///
/// let root: Question<String> = Question::message("Welcome!", |s| Ok((s, None)));
/// let out = dot(&root, "START".to_string()).unwrap();
///
/// assert!(out.starts_with("digraph interview {\nDone;\n\"Welcome!\";\n"));
/// assert!(out.contains("\"Welcome!\" -> Done [ label=\"<MESSAGE ACCEPTED>\" ]"));
/// ```
pub fn dot<S: Clone + fmt::Display>(root: &Question<S>, state: S) -> Result<String, GraphError> {
    let entry = state.to_string();
    let graph = build_graph(root, state, entry, &TraversalConfig::default())?;
    Ok(graph.to_dot())
}
