//! Typed domain errors.
//!
//! These error types represent failures that block a single user action:
//! rejected question drafts and invalid exam-session transitions. They are
//! never fatal; the caller reports the message and leaves state unchanged.

use thiserror::Error;

/// Errors from question bank operations and draft validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BankError {
    /// The question text is blank after trimming.
    #[error("question text must not be blank")]
    BlankText,

    /// One of the answer options is blank after trimming.
    #[error("option {0} must not be blank")]
    BlankOption(usize),

    /// The draft does not carry exactly the expected number of options.
    #[error("expected exactly {expected} options, got {got}")]
    WrongOptionCount { expected: usize, got: usize },

    /// The correct-answer index does not point into the options.
    #[error("correct answer index {index} out of range (must be < {len})")]
    CorrectAnswerOutOfRange { index: usize, len: usize },

    /// No question with the given id exists in the bank.
    #[error("question not found: {0}")]
    NotFound(String),
}

/// Errors from exam-session state transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExamError {
    /// An exam cannot start against an empty question bank.
    #[error("no questions available, ask a teacher to add some")]
    EmptyBank,

    /// The student name is blank after trimming.
    #[error("student name must not be blank")]
    BlankStudentName,

    /// The operation requires an exam in progress.
    #[error("no exam in progress")]
    NotOngoing,

    /// An exam session already exists.
    #[error("an exam is already in progress")]
    AlreadyStarted,

    /// The exam has already been completed (or completion is in flight).
    #[error("exam already completed")]
    AlreadyCompleted,

    /// The answered question id is not part of the exam snapshot.
    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    /// The selected option index does not point into the question's options.
    #[error("option index {index} out of range for question {question_id}")]
    OptionOutOfRange { question_id: String, index: usize },

    /// Teacher mode can only be toggled from the idle screen.
    #[error("teacher mode is not available while an exam is in progress")]
    TeacherUnavailable,

    /// The portal is not in teacher mode.
    #[error("not in teacher mode")]
    NotTeacher,
}
