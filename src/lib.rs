//! interview-graph - render interview decision trees as directed graphs
//!
//! This crate walks a tree of questions and answer strategies, simulating
//! one answer per answer shape, and records every reachable state as a
//! node and every answer as a labelled edge. The result can be exported as
//! Graphviz DOT or JSON.

pub mod config;
pub mod export;
pub mod graph;
pub mod logging;
pub mod question;
