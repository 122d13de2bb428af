//! End-to-end exam flow tests driving the state machine with the mock
//! feedback generator.
//!
//! These cover the full student path (start → answer → finish/expire →
//! result) without any terminal interaction.

use eduquest_core::model::{QuestionBank, QuestionDraft};
use eduquest_core::session::{ExamPortal, Nav, Phase};
use eduquest_core::traits::{EXAM_TITLE, FALLBACK_FEEDBACK};
use eduquest_feedback::mock::MockFeedback;

fn answer_all_correct(portal: &mut ExamPortal) {
    let answers: Vec<(String, usize)> = portal
        .session()
        .unwrap()
        .questions()
        .iter()
        .map(|q| (q.id.clone(), q.correct_answer))
        .collect();
    for (id, correct) in answers {
        portal.select_option(&id, correct).unwrap();
    }
}

#[tokio::test]
async fn full_session_all_correct() {
    let mut portal = ExamPortal::new(QuestionBank::seeded());
    portal.start_exam("Budi").unwrap();
    answer_all_correct(&mut portal);

    let feedback = MockFeedback::with_fixed_response("Sempurna, pertahankan!");
    let result = portal.finish_exam(&feedback).await.unwrap().clone();

    assert_eq!(result.correct_answers, 5);
    assert_eq!(result.total_questions, 5);
    assert_eq!(result.score, 100);
    assert_eq!(result.ai_feedback, "Sempurna, pertahankan!");
    assert_eq!(portal.phase(), Phase::Completed);

    // The generator saw the final score against the fixed title.
    assert_eq!(feedback.call_count(), 1);
    let request = feedback.last_request().unwrap();
    assert_eq!(request.score, 100);
    assert_eq!(request.total, 100);
    assert_eq!(request.exam_title, EXAM_TITLE);
}

#[tokio::test]
async fn expiry_without_answers_completes_exactly_once() {
    let mut portal = ExamPortal::with_duration(QuestionBank::seeded(), 5);
    portal.start_exam("Siti").unwrap();

    // Drive the countdown well past zero; expiry must fire exactly once
    // and later ticks must not re-trigger it.
    let mut expirations = 0;
    for _ in 0..10 {
        if portal.tick() {
            expirations += 1;
            let feedback = MockFeedback::failing();
            let result = portal.finish_exam(&feedback).await.unwrap().clone();
            assert_eq!(result.correct_answers, 0);
            assert_eq!(result.score, 0);
        }
    }

    assert_eq!(expirations, 1);
    assert_eq!(portal.phase(), Phase::Completed);
}

#[tokio::test]
async fn failing_generator_falls_back_and_still_completes() {
    let mut portal = ExamPortal::new(QuestionBank::seeded());
    portal.start_exam("Budi").unwrap();
    answer_all_correct(&mut portal);

    let feedback = MockFeedback::failing();
    let result = portal.finish_exam(&feedback).await.unwrap().clone();

    assert_eq!(feedback.call_count(), 1);
    assert_eq!(result.ai_feedback, FALLBACK_FEEDBACK);
    assert_eq!(result.score, 100);
    assert_eq!(portal.phase(), Phase::Completed);
}

#[tokio::test]
async fn second_finish_is_rejected_without_a_second_call() {
    let mut portal = ExamPortal::new(QuestionBank::seeded());
    portal.start_exam("Budi").unwrap();

    let feedback = MockFeedback::with_fixed_response("ok");
    portal.finish_exam(&feedback).await.unwrap();
    assert!(portal.finish_exam(&feedback).await.is_err());
    assert_eq!(feedback.call_count(), 1);
}

#[tokio::test]
async fn teacher_edits_mid_exam_do_not_leak_into_snapshot() {
    let mut portal = ExamPortal::new(QuestionBank::seeded());
    portal.start_exam("Budi").unwrap();
    answer_all_correct(&mut portal);

    // A teacher rewrites the whole bank while the exam is running.
    let ids: Vec<String> = portal.bank().list().iter().map(|q| q.id.clone()).collect();
    for id in ids {
        portal.bank_mut().delete(&id).unwrap();
    }
    portal
        .bank_mut()
        .create(QuestionDraft {
            text: "Brand new question?".into(),
            options: ["1".into(), "2".into(), "3".into(), "4".into()],
            correct_answer: 2,
        })
        .unwrap();

    let feedback = MockFeedback::with_fixed_response("ok");
    let result = portal.finish_exam(&feedback).await.unwrap().clone();

    // Scored against the five-question snapshot, not the one-question bank.
    assert_eq!(result.total_questions, 5);
    assert_eq!(result.score, 100);
    assert_eq!(portal.bank().len(), 1);
}

#[tokio::test]
async fn navigation_and_reanswering_before_finish() {
    let mut portal = ExamPortal::new(QuestionBank::seeded());
    portal.start_exam("Budi").unwrap();

    // Answer the first question wrong, move on, come back and fix it.
    portal.select_option("1", 0).unwrap();
    portal.navigate(Nav::Next).unwrap();
    portal.navigate(Nav::Goto(0)).unwrap();
    portal.select_option("1", 1).unwrap();

    let feedback = MockFeedback::with_fixed_response("ok");
    let result = portal.finish_exam(&feedback).await.unwrap().clone();
    assert_eq!(result.correct_answers, 1);
    assert_eq!(result.score, 20);
}
