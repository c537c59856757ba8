//! Question module for interview decision trees.
//!
//! This module provides the [`Question`] tree types that graph generation
//! walks, plus a JSON [`definition`] format that compiles into them.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use interview_graph::question::{AnswerError, Choice, Question};
//!
//! let follow_up: Rc<Question<Vec<String>>> =
//!     Rc::new(Question::text("Why?", |state, _| Ok((state, None))));
//!
//! let next = Rc::clone(&follow_up);
//! let root = Question::multiple_choice(
//!     "Do you agree?",
//!     vec![
//!         Choice::new("Yes", |state| Ok((state, None))),
//!         Choice::new("No", move |state| Ok((state, Some(Rc::clone(&next))))),
//!         Choice::new("Skip", |_| Err(AnswerError::Terminate)),
//!     ],
//! );
//! assert_eq!(root.text, "Do you agree?");
//! ```

pub mod definition;
pub mod types;

// Re-export commonly used types for convenience
pub use definition::{
    compile, parse_file, parse_str, validate, CompiledInterview, DefinitionError,
    DefinitionResult, InterviewDefinition, Transcript,
};
pub use types::{
    Answer, AnswerError, Choice, ChoiceResolver, MessageResolver, Question, Resolution,
    TextResolver,
};
