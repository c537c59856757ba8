//! Graph module for interview flow visualization.
//!
//! This module provides the [`InterviewGraph`] struct that accumulates
//! questions and answers as a directed graph, and the traversal that
//! fills it from a question tree.
//!
//! # Example
//!
//! ```rust
//! use interview_graph::graph::dot;
//! use interview_graph::question::{Choice, Question};
//!
//! let root: Question<String> = Question::multiple_choice(
//!     "Tea or coffee?",
//!     vec![
//!         Choice::new("Tea", |s| Ok((s, None))),
//!         Choice::new("Coffee", |s| Ok((s, None))),
//!     ],
//! );
//!
//! let out = dot(&root, "START".to_string()).unwrap();
//! assert!(out.contains("\"Tea or coffee?\" -> Done [ label=Tea ]"));
//! ```

mod interview_graph;
mod traverse;

pub use interview_graph::{
    is_bare_id, quote, quote_if_needed, InterviewEdge, InterviewGraph, InterviewNode, NodeKind,
    Statement,
};
pub use traverse::{build_graph, dot, GraphError, Traverser};
