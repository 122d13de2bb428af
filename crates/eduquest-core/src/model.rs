//! Core data model types for eduquest.
//!
//! These are the fundamental types the entire eduquest system uses to
//! represent questions and the mutable question bank that teacher mode
//! operates on.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BankError;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique opaque identifier.
    pub id: String,
    /// The question text shown to the student.
    pub text: String,
    /// Answer options, in display order. Always [`OPTION_COUNT`] entries.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    #[serde(default)]
    pub correct_answer: usize,
}

/// A create/update payload for a question, before it gets an id.
///
/// `correct_answer` defaults to the first option.
#[derive(Debug, Clone, Default)]
pub struct QuestionDraft {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer: usize,
}

impl QuestionDraft {
    /// Validate the draft without mutating anything.
    ///
    /// Rejects blank text, any blank option, and a correct-answer index
    /// outside the options.
    pub fn validate(&self) -> Result<(), BankError> {
        if self.text.trim().is_empty() {
            return Err(BankError::BlankText);
        }
        for (i, option) in self.options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(BankError::BlankOption(i + 1));
            }
        }
        if self.correct_answer >= OPTION_COUNT {
            return Err(BankError::CorrectAnswerOutOfRange {
                index: self.correct_answer,
                len: OPTION_COUNT,
            });
        }
        Ok(())
    }

    fn into_question(self, id: String) -> Question {
        Question {
            id,
            text: self.text,
            options: self.options.into_iter().collect(),
            correct_answer: self.correct_answer,
        }
    }
}

/// The ordered, in-memory collection of questions available for exams.
///
/// Mutated exclusively through [`create`](QuestionBank::create),
/// [`update`](QuestionBank::update), and [`delete`](QuestionBank::delete);
/// exam sessions snapshot the bank by value at start time, so later edits
/// never reach an exam already in progress.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// An empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// A bank pre-loaded with the built-in sample questions.
    pub fn seeded() -> Self {
        Self {
            questions: seed_questions(),
        }
    }

    /// Build a bank from already-validated questions (e.g. a parsed file).
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// All questions in stored order.
    pub fn list(&self) -> &[Question] {
        &self.questions
    }

    /// Look up a question by id.
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// A value-copy of the current questions, taken at exam start.
    pub fn snapshot(&self) -> Vec<Question> {
        self.questions.clone()
    }

    /// Validate the draft and append it as a new question with a fresh id.
    pub fn create(&mut self, draft: QuestionDraft) -> Result<&Question, BankError> {
        draft.validate()?;
        let id = self.fresh_id();
        self.questions.push(draft.into_question(id));
        Ok(self.questions.last().expect("just pushed"))
    }

    /// Validate the draft and replace every field of the target question
    /// except its id.
    pub fn update(&mut self, id: &str, draft: QuestionDraft) -> Result<(), BankError> {
        draft.validate()?;
        let slot = self
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| BankError::NotFound(id.to_string()))?;
        *slot = draft.into_question(id.to_string());
        Ok(())
    }

    /// Remove a question unconditionally, returning it.
    ///
    /// The confirmation gate lives in the teacher UI, not here.
    pub fn delete(&mut self, id: &str) -> Result<Question, BankError> {
        let idx = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| BankError::NotFound(id.to_string()))?;
        Ok(self.questions.remove(idx))
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// The built-in sample question set.
pub fn seed_questions() -> Vec<Question> {
    let q = |id: &str, text: &str, options: [&str; OPTION_COUNT], correct: usize| Question {
        id: id.to_string(),
        text: text.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        correct_answer: correct,
    };

    vec![
        q(
            "1",
            "Siapakah presiden pertama Indonesia?",
            ["Soeharto", "Ir. Soekarno", "B.J. Habibie", "Abdurrahman Wahid"],
            1,
        ),
        q(
            "2",
            "Berapakah hasil dari 15 x 3 + 5?",
            ["45", "50", "55", "60"],
            1,
        ),
        q(
            "3",
            "Apa ibu kota dari provinsi Jawa Barat?",
            ["Jakarta", "Semarang", "Surabaya", "Bandung"],
            3,
        ),
        q(
            "4",
            "Planet manakah yang dijuluki sebagai Planet Merah?",
            ["Venus", "Mars", "Jupiter", "Saturnus"],
            1,
        ),
        q(
            "5",
            "Unsur kimia dengan lambang \"O\" adalah?",
            ["Emas", "Oksigen", "Osmium", "Perak"],
            1,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> QuestionDraft {
        QuestionDraft {
            text: "What is 2 + 2?".into(),
            options: ["3".into(), "4".into(), "5".into(), "6".into()],
            correct_answer: 1,
        }
    }

    #[test]
    fn seed_bank_has_five_questions() {
        let bank = QuestionBank::seeded();
        assert_eq!(bank.len(), 5);
        assert_eq!(bank.list()[0].correct_answer, 1);
        assert_eq!(bank.list()[2].correct_answer, 3);
        for q in bank.list() {
            assert_eq!(q.options.len(), OPTION_COUNT);
            assert!(q.correct_answer < q.options.len());
        }
    }

    #[test]
    fn create_assigns_fresh_id() {
        let mut bank = QuestionBank::new();
        let id1 = bank.create(valid_draft()).unwrap().id.clone();
        let id2 = bank.create(valid_draft()).unwrap().id.clone();
        assert_ne!(id1, id2);
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn create_rejects_blank_text() {
        let mut bank = QuestionBank::seeded();
        let draft = QuestionDraft {
            text: "   ".into(),
            ..valid_draft()
        };
        assert_eq!(bank.create(draft).unwrap_err(), BankError::BlankText);
        assert_eq!(bank.len(), 5, "rejected draft must not mutate the bank");
    }

    #[test]
    fn create_rejects_blank_option() {
        let mut bank = QuestionBank::new();
        let mut draft = valid_draft();
        draft.options[2] = "  ".into();
        assert_eq!(bank.create(draft).unwrap_err(), BankError::BlankOption(3));
        assert!(bank.is_empty());
    }

    #[test]
    fn create_rejects_out_of_range_correct_answer() {
        let mut bank = QuestionBank::new();
        let mut draft = valid_draft();
        draft.correct_answer = OPTION_COUNT;
        assert!(matches!(
            bank.create(draft).unwrap_err(),
            BankError::CorrectAnswerOutOfRange { index: 4, len: 4 }
        ));
    }

    #[test]
    fn update_preserves_id_and_replaces_fields() {
        let mut bank = QuestionBank::seeded();
        let mut draft = valid_draft();
        draft.text = "Updated question".into();
        bank.update("3", draft).unwrap();

        let q = bank.get("3").unwrap();
        assert_eq!(q.id, "3");
        assert_eq!(q.text, "Updated question");
        assert_eq!(q.correct_answer, 1);
    }

    #[test]
    fn update_unknown_id_fails() {
        let mut bank = QuestionBank::seeded();
        assert_eq!(
            bank.update("nope", valid_draft()).unwrap_err(),
            BankError::NotFound("nope".into())
        );
    }

    #[test]
    fn delete_removes_entry() {
        let mut bank = QuestionBank::seeded();
        let removed = bank.delete("2").unwrap();
        assert_eq!(removed.id, "2");
        assert_eq!(bank.len(), 4);
        assert!(bank.get("2").is_none());
    }

    #[test]
    fn delete_unknown_id_fails() {
        let mut bank = QuestionBank::seeded();
        assert!(bank.delete("missing").is_err());
        assert_eq!(bank.len(), 5);
    }

    #[test]
    fn snapshot_is_insulated_from_later_edits() {
        let mut bank = QuestionBank::seeded();
        let snapshot = bank.snapshot();
        bank.delete("1").unwrap();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(bank.len(), 4);
    }
}
