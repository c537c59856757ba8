//! Declarative interview definitions.
//!
//! Interviews can be described in JSON and compiled into [`Question`]
//! trees whose state is a [`Transcript`] of the answers given so far.
//! Questions refer to each other by id, so a definition may point forward,
//! backward, or at itself.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use super::types::{Answer, AnswerError, Choice, Question, Resolution};

/// Errors that can occur while loading an interview definition.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The definition is structurally invalid.
    #[error("Invalid interview: {0}")]
    InvalidInterview(String),
}

/// Result type alias for definition operations.
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// What happens after an answer is given.
///
/// With no field set the interview is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Id of the question that follows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// Ends the interview without a result.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub terminate: bool,

    /// Fails the interview with this message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail: Option<String>,
}

/// One option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDefinition {
    /// Text shown for the option.
    pub text: String,

    /// Disabled options are compiled without a resolver.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    /// What happens when the option is picked.
    #[serde(flatten)]
    pub then: Transition,
}

/// How a question is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerDefinition {
    /// Free text.
    Text(Transition),
    /// Pick one of several options.
    MultipleChoice { choices: Vec<ChoiceDefinition> },
    /// Acknowledge a message.
    Message(Transition),
}

/// A single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    /// Display text.
    pub text: String,
    /// Answer strategy.
    pub answer: AnswerDefinition,
}

/// A complete interview: questions keyed by id plus the starting id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewDefinition {
    /// Optional human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Id of the first question.
    pub start: String,

    /// All questions, keyed by id. Kept sorted so validation reports
    /// problems in a stable order.
    pub questions: BTreeMap<String, QuestionDefinition>,
}

impl InterviewDefinition {
    fn transitions(&self) -> impl Iterator<Item = (&str, &Transition)> + '_ {
        self.questions.iter().flat_map(|(id, question)| {
            let transitions: Vec<&Transition> = match &question.answer {
                AnswerDefinition::Text(then) | AnswerDefinition::Message(then) => vec![then],
                AnswerDefinition::MultipleChoice { choices } => {
                    choices.iter().map(|choice| &choice.then).collect()
                }
            };
            transitions
                .into_iter()
                .map(move |then| (id.as_str(), then))
        })
    }
}

/// The answers given on the way to a question.
///
/// # Example
///
/// ```rust
/// use interview_graph::question::Transcript;
///
/// let transcript = Transcript::new().with_answer("Cookie").with_answer("Oatmeal");
/// assert_eq!(transcript.answers(), ["Cookie", "Oatmeal"]);
/// assert_eq!(transcript.to_string(), "Cookie > Oatmeal");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    answers: Vec<String>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `answer` appended.
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answers.push(answer.into());
        self
    }

    /// Returns the answers in the order they were given.
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Returns true if nothing has been answered yet.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.answers.join(" > "))
    }
}

type Registry = OnceCell<BTreeMap<String, Rc<Question<Transcript>>>>;

/// A definition compiled into live questions.
///
/// Questions look each other up through a shared registry, so the
/// compiled interview must stay alive while it is traversed.
pub struct CompiledInterview {
    registry: Rc<Registry>,
    start: Rc<Question<Transcript>>,
}

impl CompiledInterview {
    /// Returns the first question.
    pub fn start(&self) -> &Question<Transcript> {
        &self.start
    }

    /// Looks up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question<Transcript>> {
        self.registry.get()?.get(id).map(|q| q.as_ref())
    }

    /// Returns the number of compiled questions.
    pub fn len(&self) -> usize {
        self.registry.get().map_or(0, BTreeMap::len)
    }

    /// Returns true if no questions were compiled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for CompiledInterview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledInterview")
            .field("start", &self.start.text)
            .field("questions", &self.len())
            .finish()
    }
}

/// Parses an interview definition file.
pub fn parse_file(path: &Path) -> DefinitionResult<InterviewDefinition> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses an interview definition from a JSON string.
///
/// # Example
///
/// ```
/// use interview_graph::question::definition::parse_str;
///
/// let json = r#"{
///     "start": "hello",
///     "questions": {
///         "hello": {"text": "Hello!", "answer": {"type": "message"}}
///     }
/// }"#;
/// let interview = parse_str(json).unwrap();
/// assert_eq!(interview.questions.len(), 1);
/// ```
pub fn parse_str(content: &str) -> DefinitionResult<InterviewDefinition> {
    let interview: InterviewDefinition = serde_json::from_str(content)?;
    Ok(interview)
}

/// Checks that every referenced question exists and that each transition
/// is unambiguous.
pub fn validate(interview: &InterviewDefinition) -> DefinitionResult<()> {
    if interview.questions.is_empty() {
        return Err(DefinitionError::InvalidInterview(
            "interview has no questions".to_string(),
        ));
    }

    if !interview.questions.contains_key(&interview.start) {
        return Err(DefinitionError::InvalidInterview(format!(
            "start question '{}' does not exist",
            interview.start
        )));
    }

    for (id, then) in interview.transitions() {
        let outcomes = [then.next.is_some(), then.terminate, then.fail.is_some()]
            .iter()
            .filter(|set| **set)
            .count();
        if outcomes > 1 {
            return Err(DefinitionError::InvalidInterview(format!(
                "question '{}' has a transition with more than one of next, terminate and fail",
                id
            )));
        }

        if let Some(next) = &then.next {
            if !interview.questions.contains_key(next) {
                return Err(DefinitionError::InvalidInterview(format!(
                    "question '{}' refers to unknown question '{}'",
                    id, next
                )));
            }
        }
    }

    Ok(())
}

/// Validates and compiles a definition into a question tree.
///
/// # Example
///
/// ```
/// use interview_graph::question::definition::{compile, parse_str};
///
/// let json = r#"{
///     "start": "name",
///     "questions": {
///         "name": {"text": "Your name?", "answer": {"type": "text", "next": "bye"}},
///         "bye": {"text": "Thanks!", "answer": {"type": "message"}}
///     }
/// }"#;
/// let compiled = compile(&parse_str(json).unwrap()).unwrap();
/// assert_eq!(compiled.start().text, "Your name?");
/// assert_eq!(compiled.len(), 2);
/// ```
pub fn compile(interview: &InterviewDefinition) -> DefinitionResult<CompiledInterview> {
    validate(interview)?;

    let registry: Rc<Registry> = Rc::new(OnceCell::new());
    let questions: BTreeMap<String, Rc<Question<Transcript>>> = interview
        .questions
        .iter()
        .map(|(id, definition)| {
            let question = compile_question(definition, Rc::downgrade(&registry));
            (id.clone(), Rc::new(question))
        })
        .collect();

    registry.set(questions).map_err(|_| {
        DefinitionError::InvalidInterview("question registry initialised twice".to_string())
    })?;

    let start = registry
        .get()
        .and_then(|questions| questions.get(&interview.start))
        .cloned()
        .ok_or_else(|| {
            DefinitionError::InvalidInterview(format!(
                "start question '{}' does not exist",
                interview.start
            ))
        })?;

    Ok(CompiledInterview { registry, start })
}

fn compile_question(
    definition: &QuestionDefinition,
    registry: Weak<Registry>,
) -> Question<Transcript> {
    let answer = match &definition.answer {
        AnswerDefinition::Text(then) => {
            let then = then.clone();
            Answer::Text(Box::new(move |state: Transcript, input: &str| {
                follow(&registry, &then, state.with_answer(input))
            }))
        }
        AnswerDefinition::MultipleChoice { choices } => Answer::MultipleChoice(
            choices
                .iter()
                .map(|choice| compile_choice(choice, registry.clone()))
                .collect(),
        ),
        AnswerDefinition::Message(then) => {
            let then = then.clone();
            Answer::Message(Box::new(move |state: Transcript| {
                follow(&registry, &then, state)
            }))
        }
    };
    Question::new(definition.text.as_str(), answer)
}

fn compile_choice(choice: &ChoiceDefinition, registry: Weak<Registry>) -> Choice<Transcript> {
    if choice.disabled {
        return Choice::disabled(choice.text.as_str());
    }
    let text = choice.text.clone();
    let then = choice.then.clone();
    Choice::new(choice.text.as_str(), move |state: Transcript| {
        follow(&registry, &then, state.with_answer(text.as_str()))
    })
}

fn follow(
    registry: &Weak<Registry>,
    then: &Transition,
    state: Transcript,
) -> Resolution<Transcript> {
    if let Some(message) = &then.fail {
        return Err(AnswerError::failed(message.clone()));
    }
    if then.terminate {
        return Err(AnswerError::Terminate);
    }
    let Some(id) = &then.next else {
        return Ok((state, None));
    };

    let next = registry
        .upgrade()
        .and_then(|registry| registry.get().and_then(|questions| questions.get(id)).cloned())
        .ok_or_else(|| AnswerError::failed(format!("question '{}' is not available", id)))?;
    Ok((state, Some(next)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TraversalConfig;
    use crate::graph::{build_graph, GraphError};
    use std::io::Write;

    const DESSERT: &str = r#"{
        "name": "dessert",
        "start": "dessert",
        "questions": {
            "dessert": {
                "text": "What is your favorite dessert?",
                "answer": {
                    "type": "multiple_choice",
                    "choices": [
                        {"text": "Ice cream", "next": "flavor"},
                        {"text": "Cookie", "next": "cookie"},
                        {"text": "Nothing", "terminate": true},
                        {"text": "Cake", "disabled": true}
                    ]
                }
            },
            "flavor": {
                "text": "What flavor of ice cream do you like?",
                "answer": {"type": "text", "next": "thanks"}
            },
            "cookie": {
                "text": "What kind of cookie do you like?",
                "answer": {
                    "type": "multiple_choice",
                    "choices": [{"text": "Chocolate chip"}]
                }
            },
            "thanks": {
                "text": "Thanks!",
                "answer": {"type": "message"}
            }
        }
    }"#;

    fn graph_for(json: &str) -> Result<crate::graph::InterviewGraph, GraphError> {
        let compiled = compile(&parse_str(json).unwrap()).unwrap();
        build_graph(
            compiled.start(),
            Transcript::new(),
            "START",
            &TraversalConfig::default(),
        )
    }

    #[test]
    fn test_parse_dessert() {
        let interview = parse_str(DESSERT).unwrap();
        assert_eq!(interview.name.as_deref(), Some("dessert"));
        assert_eq!(interview.questions.len(), 4);

        let AnswerDefinition::MultipleChoice { choices } = &interview.questions["dessert"].answer
        else {
            panic!("expected multiple choice");
        };
        assert_eq!(choices.len(), 4);
        assert_eq!(choices[0].then.next.as_deref(), Some("flavor"));
        assert!(choices[2].then.terminate);
        assert!(choices[3].disabled);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_str("{ not json"),
            Err(DefinitionError::Json(_))
        ));
    }

    #[test]
    fn test_parse_unknown_answer_type() {
        let json = r#"{"start": "a", "questions": {
            "a": {"text": "A", "answer": {"type": "slider"}}
        }}"#;
        assert!(matches!(parse_str(json), Err(DefinitionError::Json(_))));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", DESSERT).unwrap();

        let interview = parse_file(file.path()).unwrap();
        assert_eq!(interview.start, "dessert");
    }

    #[test]
    fn test_parse_missing_file() {
        assert!(matches!(
            parse_file(Path::new("/nonexistent/interview.json")),
            Err(DefinitionError::Io(_))
        ));
    }

    #[test]
    fn test_validate_ok() {
        assert!(validate(&parse_str(DESSERT).unwrap()).is_ok());
    }

    #[test]
    fn test_validate_empty() {
        let interview = parse_str(r#"{"start": "a", "questions": {}}"#).unwrap();
        let err = validate(&interview).unwrap_err();
        assert!(err.to_string().contains("no questions"));
    }

    #[test]
    fn test_validate_unknown_start() {
        let mut interview = parse_str(DESSERT).unwrap();
        interview.start = "missing".to_string();
        let err = validate(&interview).unwrap_err();
        assert!(err.to_string().contains("start question 'missing'"));
    }

    #[test]
    fn test_validate_unknown_next() {
        let json = r#"{"start": "a", "questions": {
            "a": {"text": "A", "answer": {"type": "message", "next": "b"}}
        }}"#;
        let err = validate(&parse_str(json).unwrap()).unwrap_err();
        assert!(err.to_string().contains("unknown question 'b'"));
    }

    #[test]
    fn test_validate_reports_first_problem_by_id() {
        let json = r#"{"start": "a", "questions": {
            "c": {"text": "C", "answer": {"type": "message", "next": "z"}},
            "a": {"text": "A", "answer": {"type": "message", "next": "y"}},
            "b": {"text": "B", "answer": {"type": "message", "next": "x"}}
        }}"#;
        let interview = parse_str(json).unwrap();

        for _ in 0..5 {
            let err = validate(&interview).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid interview: question 'a' refers to unknown question 'y'"
            );
        }
    }

    #[test]
    fn test_validate_ambiguous_transition() {
        let json = r#"{"start": "a", "questions": {
            "a": {"text": "A", "answer": {"type": "message", "next": "a", "terminate": true}}
        }}"#;
        let err = validate(&parse_str(json).unwrap()).unwrap_err();
        assert!(err.to_string().contains("more than one"));
    }

    #[test]
    fn test_compile_dessert_graph() {
        let graph = graph_for(DESSERT).unwrap();

        assert_eq!(graph.question_count(), 4);
        assert_eq!(graph.terminated_count(), 1);
        // thanks -> Done, chocolate chip -> Done
        assert_eq!(graph.done_edge_count(), 2);

        let dessert = graph.find_nodes("What is your favorite dessert?")[0];
        assert_eq!(
            graph.outgoing_labels(dessert),
            vec!["Ice cream", "Cookie", "Nothing"]
        );
        let flavor = graph.find_nodes("What flavor of ice cream do you like?")[0];
        assert_eq!(graph.outgoing_labels(flavor), vec!["<TEXT INPUT>"]);
    }

    #[test]
    fn test_compile_records_transcript() {
        let compiled = compile(&parse_str(DESSERT).unwrap()).unwrap();
        let flavor = compiled.question("flavor").unwrap();
        let Answer::Text(resolve) = &flavor.answer else {
            panic!("expected text answer");
        };

        let (state, next) = resolve(Transcript::new().with_answer("Ice cream"), "Mint").unwrap();
        assert_eq!(state.answers(), ["Ice cream", "Mint"]);
        assert_eq!(next.unwrap().text, "Thanks!");
    }

    #[test]
    fn test_fail_transition_aborts_build() {
        let json = r#"{"start": "a", "questions": {
            "a": {"text": "A", "answer": {"type": "multiple_choice", "choices": [
                {"text": "ok"},
                {"text": "bad", "fail": "no such plan"}
            ]}}
        }}"#;
        let err = graph_for(json).unwrap_err();
        assert!(err.to_string().contains("no such plan"));
    }

    #[test]
    fn test_cyclic_definition_is_rejected() {
        let json = r#"{"start": "a", "questions": {
            "a": {"text": "A", "answer": {"type": "message", "next": "b"}},
            "b": {"text": "B", "answer": {"type": "message", "next": "a"}}
        }}"#;
        let err = graph_for(json).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            GraphError::Cycle { question } if question == "A"
        ));
        assert_eq!(err.depth(), 2);
    }

    #[test]
    fn test_message_leaves_transcript_unchanged() {
        let compiled = compile(&parse_str(DESSERT).unwrap()).unwrap();
        let thanks = compiled.question("thanks").unwrap();
        let Answer::Message(resolve) = &thanks.answer else {
            panic!("expected message answer");
        };

        let before = Transcript::new().with_answer("Ice cream").with_answer("Mint");
        let (state, next) = resolve(before.clone()).unwrap();
        assert_eq!(state, before);
        assert!(next.is_none());
    }

    #[test]
    fn test_transcript_display() {
        assert_eq!(Transcript::new().to_string(), "");
        assert!(Transcript::new().is_empty());
        assert_eq!(Transcript::new().with_answer("a").to_string(), "a");
    }

    #[test]
    fn test_definition_roundtrip_omits_defaults() {
        let choice = ChoiceDefinition {
            text: "Yes".to_string(),
            disabled: false,
            then: Transition::default(),
        };
        assert_eq!(serde_json::to_string(&choice).unwrap(), r#"{"text":"Yes"}"#);
    }
}
