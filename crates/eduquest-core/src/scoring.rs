//! Answer scoring.
//!
//! A question counts as correct when the recorded answer index equals its
//! `correct_answer`. The final score is `round(correct / total * 100)`,
//! defined as 0 for an empty question set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::Question;

/// The immutable outcome of a completed exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResult {
    /// Number of questions in the exam snapshot.
    pub total_questions: usize,
    /// Questions answered correctly, 0..=total_questions.
    pub correct_answers: usize,
    /// Percentage score, 0..=100.
    pub score: u32,
    /// AI-generated feedback, or the fixed fallback string.
    pub ai_feedback: String,
}

impl ExamResult {
    /// Correct/incorrect counts for the answer-distribution display.
    pub fn distribution(&self) -> AnswerDistribution {
        AnswerDistribution {
            correct: self.correct_answers,
            incorrect: self.total_questions - self.correct_answers,
        }
    }
}

/// Data behind the answer-distribution rendering on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDistribution {
    pub correct: usize,
    pub incorrect: usize,
}

/// Raw scoring numbers, before feedback is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamOutcome {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub score: u32,
}

impl ExamOutcome {
    pub fn into_result(self, ai_feedback: String) -> ExamResult {
        ExamResult {
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            score: self.score,
            ai_feedback,
        }
    }
}

/// Score a set of recorded answers against a question snapshot.
pub fn score_answers(questions: &[Question], answers: &HashMap<String, usize>) -> ExamOutcome {
    let correct = questions
        .iter()
        .filter(|q| answers.get(&q.id) == Some(&q.correct_answer))
        .count();

    let score = if questions.is_empty() {
        0
    } else {
        (correct as f64 / questions.len() as f64 * 100.0).round() as u32
    };

    ExamOutcome {
        total_questions: questions.len(),
        correct_answers: correct,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed_questions;

    #[test]
    fn all_correct_scores_100() {
        let questions = seed_questions();
        let answers: HashMap<String, usize> = questions
            .iter()
            .map(|q| (q.id.clone(), q.correct_answer))
            .collect();

        let outcome = score_answers(&questions, &answers);
        assert_eq!(outcome.correct_answers, 5);
        assert_eq!(outcome.total_questions, 5);
        assert_eq!(outcome.score, 100);
    }

    #[test]
    fn no_answers_scores_0() {
        let questions = seed_questions();
        let outcome = score_answers(&questions, &HashMap::new());
        assert_eq!(outcome.correct_answers, 0);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn partial_answers_round_to_nearest() {
        let questions = seed_questions();
        // 2 of 5 correct = 40%; 1 of 3 would be 33.3 -> 33.
        let answers: HashMap<String, usize> = questions
            .iter()
            .take(2)
            .map(|q| (q.id.clone(), q.correct_answer))
            .collect();
        assert_eq!(score_answers(&questions, &answers).score, 40);

        let three = &questions[..3];
        let one: HashMap<String, usize> =
            [(three[0].id.clone(), three[0].correct_answer)].into();
        assert_eq!(score_answers(three, &one).score, 33);
    }

    #[test]
    fn wrong_answers_do_not_count() {
        let questions = seed_questions();
        let answers: HashMap<String, usize> = questions
            .iter()
            .map(|q| (q.id.clone(), (q.correct_answer + 1) % 4))
            .collect();

        let outcome = score_answers(&questions, &answers);
        assert_eq!(outcome.correct_answers, 0);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn empty_question_set_is_defined_as_0() {
        let outcome = score_answers(&[], &HashMap::new());
        assert_eq!(outcome.total_questions, 0);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn answers_to_unknown_questions_are_ignored() {
        let questions = seed_questions();
        let answers: HashMap<String, usize> = [("ghost".to_string(), 1)].into();
        assert_eq!(score_answers(&questions, &answers).correct_answers, 0);
    }

    #[test]
    fn distribution_splits_correct_and_incorrect() {
        let result = ExamResult {
            total_questions: 5,
            correct_answers: 3,
            score: 60,
            ai_feedback: String::new(),
        };
        assert_eq!(
            result.distribution(),
            AnswerDistribution {
                correct: 3,
                incorrect: 2
            }
        );
    }
}
