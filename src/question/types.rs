//! Core types for interview decision trees.
//!
//! A [`Question`] pairs display text with an [`Answer`] strategy. Each
//! strategy carries resolver functions that take the current state and
//! return the next state together with the next question, if any.

use std::fmt;
use std::rc::Rc;

/// Errors a resolver may return while advancing an interview.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    /// The interview ends here without producing a result.
    ///
    /// This is an expected outcome, not a failure: graph generation routes
    /// the branch to a terminated sink and carries on.
    #[error("interview terminated")]
    Terminate,

    /// The resolver could not advance the interview.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl AnswerError {
    /// Creates a [`AnswerError::Failed`] from a plain message.
    pub fn failed(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Failed(anyhow::Error::msg(message))
    }

    /// Returns true if this error is the termination signal.
    pub fn is_terminate(&self) -> bool {
        matches!(self, Self::Terminate)
    }
}

/// What a resolver produces: the updated state and the next question.
///
/// `None` for the next question means the interview is complete.
pub type Resolution<S> = Result<(S, Option<Rc<Question<S>>>), AnswerError>;

/// Resolver for free-text answers. Receives the state and the typed text.
pub type TextResolver<S> = Box<dyn Fn(S, &str) -> Resolution<S>>;

/// Resolver for a single multiple-choice option.
pub type ChoiceResolver<S> = Box<dyn Fn(S) -> Resolution<S>>;

/// Resolver for a message that only needs to be acknowledged.
pub type MessageResolver<S> = Box<dyn Fn(S) -> Resolution<S>>;

/// How an interview advances from a question.
pub enum Answer<S> {
    /// The user types arbitrary text.
    Text(TextResolver<S>),
    /// The user picks one of several options, in declared order.
    MultipleChoice(Vec<Choice<S>>),
    /// The user acknowledges a message; there is a single continuation.
    Message(MessageResolver<S>),
}

impl<S> Answer<S> {
    /// Returns a short label for the answer kind.
    pub fn label(&self) -> &'static str {
        match self {
            Answer::Text(_) => "text",
            Answer::MultipleChoice(_) => "multiple_choice",
            Answer::Message(_) => "message",
        }
    }
}

impl<S> fmt::Debug for Answer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Text(_) => f.write_str("Text(..)"),
            Answer::MultipleChoice(choices) => {
                f.debug_tuple("MultipleChoice").field(choices).finish()
            }
            Answer::Message(_) => f.write_str("Message(..)"),
        }
    }
}

/// One option of a multiple-choice answer.
pub struct Choice<S> {
    /// Text shown for the option; also the edge label in rendered graphs.
    pub text: String,
    /// Resolver invoked when the option is picked. `None` disables the option.
    pub choose: Option<ChoiceResolver<S>>,
}

impl<S> Choice<S> {
    /// Creates an option with a resolver.
    pub fn new(
        text: impl Into<String>,
        choose: impl Fn(S) -> Resolution<S> + 'static,
    ) -> Self {
        Self {
            text: text.into(),
            choose: Some(Box::new(choose)),
        }
    }

    /// Creates an option without a resolver.
    pub fn disabled(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choose: None,
        }
    }

    /// Returns true if the option has a resolver.
    pub fn is_enabled(&self) -> bool {
        self.choose.is_some()
    }
}

impl<S> fmt::Debug for Choice<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Choice")
            .field("text", &self.text)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// A node in an interview decision tree.
///
/// # Example
///
/// ```rust
/// use interview_graph::question::{Choice, Question};
///
/// let q: Question<u32> = Question::multiple_choice(
///     "Continue?",
///     vec![
///         Choice::new("Yes", |n: u32| Ok((n + 1, None))),
///         Choice::disabled("Maybe"),
///     ],
/// );
/// assert_eq!(q.text, "Continue?");
/// assert_eq!(q.answer.label(), "multiple_choice");
/// ```
#[derive(Debug)]
pub struct Question<S> {
    /// Display text. Also the node identity in rendered graphs.
    pub text: String,
    /// Strategy for advancing past this question.
    pub answer: Answer<S>,
}

impl<S> Question<S> {
    /// Creates a question with an explicit answer strategy.
    pub fn new(text: impl Into<String>, answer: Answer<S>) -> Self {
        Self {
            text: text.into(),
            answer,
        }
    }

    /// Creates a free-text question.
    pub fn text(
        text: impl Into<String>,
        resolve: impl Fn(S, &str) -> Resolution<S> + 'static,
    ) -> Self {
        Self::new(text, Answer::Text(Box::new(resolve)))
    }

    /// Creates a multiple-choice question.
    pub fn multiple_choice(text: impl Into<String>, choices: Vec<Choice<S>>) -> Self {
        Self::new(text, Answer::MultipleChoice(choices))
    }

    /// Creates a message-only question.
    pub fn message(
        text: impl Into<String>,
        resolve: impl Fn(S) -> Resolution<S> + 'static,
    ) -> Self {
        Self::new(text, Answer::Message(Box::new(resolve)))
    }
}
