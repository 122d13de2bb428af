//! The exam portal state machine.
//!
//! Phases move `Idle -> Ongoing -> Evaluating -> Completed`, with a
//! re-entrant `Idle <-> Teacher` side branch that shares no exam state.
//! Completion runs at most once per session: the phase is moved to
//! `Evaluating` before the feedback call is awaited, and every transition
//! checks the phase first.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ExamError;
use crate::model::{Question, QuestionBank};
use crate::scoring::{score_answers, ExamResult};
use crate::traits::{FeedbackGenerator, FeedbackRequest, EXAM_TITLE, FALLBACK_FEEDBACK};

/// Fixed exam length in seconds.
pub const EXAM_DURATION_SECS: u64 = 600;

/// The portal's current top-level mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Login screen; no exam state exists.
    Idle,
    /// An exam is running against a bank snapshot.
    Ongoing,
    /// Answers are scored and the feedback call is in flight.
    Evaluating,
    /// Terminal; the result is available.
    Completed,
    /// Question-bank management; mutually exclusive with the exam flow.
    Teacher,
}

/// Navigation intents over the question list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Prev,
    Next,
    /// Jump to an explicit zero-based index.
    Goto(usize),
}

/// One student's run through the exam, created at start and destroyed only
/// by a full restart.
#[derive(Debug, Clone)]
pub struct ExamSession {
    student_name: String,
    questions: Vec<Question>,
    answers: HashMap<String, usize>,
    current_index: usize,
    time_left_secs: u64,
    started_at: DateTime<Utc>,
    result: Option<ExamResult>,
}

impl ExamSession {
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    /// The snapshot taken at exam start.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The recorded answer for a question, if any.
    pub fn answer_for(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    /// Derived progress indicator; never stored.
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// The exam result, present once the phase reaches `Completed`.
    pub fn result(&self) -> Option<&ExamResult> {
        self.result.as_ref()
    }
}

/// The single owner of exam state: phase, question bank, and session.
pub struct ExamPortal {
    bank: QuestionBank,
    phase: Phase,
    session: Option<ExamSession>,
    duration_secs: u64,
}

impl ExamPortal {
    pub fn new(bank: QuestionBank) -> Self {
        Self::with_duration(bank, EXAM_DURATION_SECS)
    }

    /// Portal with a non-default exam length (tests, `--duration` flag).
    pub fn with_duration(bank: QuestionBank, duration_secs: u64) -> Self {
        Self {
            bank,
            phase: Phase::Idle,
            session: None,
            duration_secs,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Mutable access to the bank for teacher operations.
    ///
    /// Edits never reach an exam in progress; sessions hold a snapshot.
    pub fn bank_mut(&mut self) -> &mut QuestionBank {
        &mut self.bank
    }

    pub fn session(&self) -> Option<&ExamSession> {
        self.session.as_ref()
    }

    /// `Idle -> Teacher`. No effect on exam state.
    pub fn enter_teacher(&mut self) -> Result<(), ExamError> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Teacher;
                Ok(())
            }
            _ => Err(ExamError::TeacherUnavailable),
        }
    }

    /// `Teacher -> Idle`. No effect on exam state.
    pub fn leave_teacher(&mut self) -> Result<(), ExamError> {
        match self.phase {
            Phase::Teacher => {
                self.phase = Phase::Idle;
                Ok(())
            }
            _ => Err(ExamError::NotTeacher),
        }
    }

    /// `Idle -> Ongoing`: snapshot the bank, clear answers, reset the
    /// countdown.
    ///
    /// Rejected (no state change) when the bank is empty or the name trims
    /// to empty.
    pub fn start_exam(&mut self, student_name: &str) -> Result<(), ExamError> {
        match self.phase {
            Phase::Idle => {}
            Phase::Teacher => return Err(ExamError::TeacherUnavailable),
            Phase::Ongoing | Phase::Evaluating => return Err(ExamError::AlreadyStarted),
            Phase::Completed => return Err(ExamError::AlreadyCompleted),
        }

        if self.bank.is_empty() {
            return Err(ExamError::EmptyBank);
        }
        let name = student_name.trim();
        if name.is_empty() {
            return Err(ExamError::BlankStudentName);
        }

        self.session = Some(ExamSession {
            student_name: name.to_string(),
            questions: self.bank.snapshot(),
            answers: HashMap::new(),
            current_index: 0,
            time_left_secs: self.duration_secs,
            started_at: Utc::now(),
            result: None,
        });
        self.phase = Phase::Ongoing;
        tracing::info!(student = name, questions = self.bank.len(), "exam started");
        Ok(())
    }

    /// Record (or overwrite) the answer for a question.
    pub fn select_option(
        &mut self,
        question_id: &str,
        option_index: usize,
    ) -> Result<(), ExamError> {
        let session = self.ongoing_session_mut()?;
        let question = session
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| ExamError::UnknownQuestion(question_id.to_string()))?;
        if option_index >= question.options.len() {
            return Err(ExamError::OptionOutOfRange {
                question_id: question_id.to_string(),
                index: option_index,
            });
        }
        session
            .answers
            .insert(question_id.to_string(), option_index);
        Ok(())
    }

    /// Move the current-question pointer, clamped to the question range.
    pub fn navigate(&mut self, nav: Nav) -> Result<usize, ExamError> {
        let session = self.ongoing_session_mut()?;
        let last = session.questions.len() - 1;
        session.current_index = match nav {
            Nav::Prev => session.current_index.saturating_sub(1),
            Nav::Next => (session.current_index + 1).min(last),
            Nav::Goto(i) => i.min(last),
        };
        Ok(session.current_index)
    }

    /// One second of countdown.
    ///
    /// Returns `true` when time has run out and completion must begin.
    /// Ticks outside `Ongoing` are ignored, so a stray tick racing a
    /// completion already in flight has no effect.
    pub fn tick(&mut self) -> bool {
        if self.phase != Phase::Ongoing {
            return false;
        }
        let session = self.session.as_mut().expect("ongoing phase has a session");
        if session.time_left_secs > 0 {
            session.time_left_secs -= 1;
        }
        session.time_left_secs == 0
    }

    /// `Ongoing -> Evaluating -> Completed`: score the snapshot, make the
    /// single feedback call, store the immutable result.
    ///
    /// The phase moves to `Evaluating` before the first await, so a second
    /// `finish_exam` (or a timer-driven one racing an explicit one) gets a
    /// typed error instead of re-running completion. Feedback failure is
    /// downgraded to [`FALLBACK_FEEDBACK`] and logged; it never blocks the
    /// transition to `Completed`.
    pub async fn finish_exam(
        &mut self,
        feedback: &dyn FeedbackGenerator,
    ) -> Result<&ExamResult, ExamError> {
        match self.phase {
            Phase::Ongoing => {}
            Phase::Evaluating | Phase::Completed => return Err(ExamError::AlreadyCompleted),
            Phase::Idle | Phase::Teacher => return Err(ExamError::NotOngoing),
        }
        self.phase = Phase::Evaluating;

        let session = self.session.as_mut().expect("ongoing phase has a session");
        let outcome = score_answers(&session.questions, &session.answers);

        let request = FeedbackRequest::new(outcome.score, 100, EXAM_TITLE);
        let ai_feedback = match feedback.generate(&request).await {
            Ok(response) => {
                tracing::debug!(
                    provider = feedback.name(),
                    model = %response.model,
                    latency_ms = response.latency_ms,
                    "feedback generated"
                );
                response.text
            }
            Err(e) => {
                tracing::warn!(provider = feedback.name(), error = %e, "feedback failed, using fallback");
                FALLBACK_FEEDBACK.to_string()
            }
        };

        session.result = Some(outcome.into_result(ai_feedback));
        self.phase = Phase::Completed;
        tracing::info!(
            student = session.student_name.as_str(),
            score = outcome.score,
            correct = outcome.correct_answers,
            "exam completed"
        );
        Ok(session.result.as_ref().expect("just stored"))
    }

    /// The completed result, once `finish_exam` has settled.
    pub fn result(&self) -> Option<&ExamResult> {
        self.session.as_ref().and_then(|s| s.result.as_ref())
    }

    fn ongoing_session_mut(&mut self) -> Result<&mut ExamSession, ExamError> {
        match self.phase {
            Phase::Ongoing => Ok(self.session.as_mut().expect("ongoing phase has a session")),
            Phase::Evaluating | Phase::Completed => Err(ExamError::AlreadyCompleted),
            Phase::Idle | Phase::Teacher => Err(ExamError::NotOngoing),
        }
    }
}
