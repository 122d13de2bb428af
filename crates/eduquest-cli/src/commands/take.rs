//! The `eduquest take` command: the interactive exam session.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;
use tokio::io::{AsyncBufReadExt, BufReader};

use eduquest_core::model::QuestionBank;
use eduquest_core::parser::parse_bank;
use eduquest_core::report::ExamReport;
use eduquest_core::scoring::ExamResult;
use eduquest_core::session::{ExamPortal, Nav};
use eduquest_core::timer::Countdown;
use eduquest_core::traits::EXAM_TITLE;
use eduquest_feedback::config::{default_generator, load_config_from};

/// Why the interactive loop ended.
enum FinishReason {
    /// The student submitted with `f` (or stdin closed).
    Submitted,
    /// The countdown reached zero.
    Expired,
}

/// What a parsed input line asks for.
enum Action {
    Select(usize),
    Navigate(Nav),
    Finish,
    Help,
    Unknown,
}

pub async fn execute(
    name: String,
    bank_path: Option<PathBuf>,
    duration: u64,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let bank = match &bank_path {
        Some(path) => parse_bank(path)?,
        None => QuestionBank::seeded(),
    };

    let config = load_config_from(config_path.as_deref())?;
    let generator = default_generator(&config);
    tracing::debug!(provider = generator.name(), "feedback provider selected");

    let mut portal = ExamPortal::with_duration(bank, duration);
    portal.start_exam(&name).context("cannot start exam")?;

    println!("=== {EXAM_TITLE} ===");
    println!(
        "Student: {}  |  Questions: {}  |  Time: {}",
        portal.session().expect("exam started").student_name(),
        portal.session().expect("exam started").question_count(),
        format_time(duration),
    );
    println!("Commands: a-d answer, n next, p prev, <number> jump, f finish, h help");
    render_question(&portal);

    let mut countdown = Countdown::start();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let reason = loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("failed to read input")? {
                    // EOF submits whatever has been answered so far.
                    None => break FinishReason::Submitted,
                    Some(input) => match parse_action(input.trim()) {
                        Action::Finish => break FinishReason::Submitted,
                        action => {
                            apply_action(&mut portal, action);
                        }
                    },
                }
            }
            tick = countdown.tick() => {
                if tick.is_none() {
                    break FinishReason::Submitted;
                }
                if portal.tick() {
                    println!("\nWaktu habis! Submitting answers...");
                    break FinishReason::Expired;
                }
                if let Some(session) = portal.session() {
                    if session.time_left_secs() == 60 {
                        println!("(1 minute remaining)");
                    }
                }
            }
        }
    };

    // The countdown must not outlive the ongoing phase.
    countdown.cancel();

    if matches!(reason, FinishReason::Submitted) {
        let session = portal.session().expect("exam started");
        println!(
            "\nSubmitting {} of {} answers...",
            session.answered_count(),
            session.question_count()
        );
    }

    println!("Menghubungi AI untuk evaluasi...");
    let result = portal
        .finish_exam(generator.as_ref())
        .await
        .context("failed to complete exam")?
        .clone();

    render_result(&portal, &result);

    if let Some(path) = output {
        let session = portal.session().expect("exam completed");
        let report = ExamReport::from_session(session, EXAM_TITLE, duration)
            .expect("completed exam has a result");
        report.save_json(&path)?;
        println!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn parse_action(input: &str) -> Action {
    match input {
        "a" | "A" => Action::Select(0),
        "b" | "B" => Action::Select(1),
        "c" | "C" => Action::Select(2),
        "d" | "D" => Action::Select(3),
        "n" | "next" => Action::Navigate(Nav::Next),
        "p" | "prev" => Action::Navigate(Nav::Prev),
        "f" | "finish" => Action::Finish,
        "h" | "help" | "?" => Action::Help,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Action::Navigate(Nav::Goto(n - 1)),
            _ => Action::Unknown,
        },
    }
}

fn apply_action(portal: &mut ExamPortal, action: Action) {
    match action {
        Action::Select(index) => {
            let question_id = portal
                .session()
                .expect("exam started")
                .current_question()
                .id
                .clone();
            match portal.select_option(&question_id, index) {
                Ok(()) => render_question(portal),
                Err(e) => println!("{e}"),
            }
        }
        Action::Navigate(nav) => match portal.navigate(nav) {
            Ok(_) => render_question(portal),
            Err(e) => println!("{e}"),
        },
        Action::Help | Action::Unknown => {
            println!("Commands: a-d answer, n next, p prev, <number> jump, f finish, h help");
        }
        Action::Finish => unreachable!("finish breaks the loop before apply"),
    }
}

fn render_question(portal: &ExamPortal) {
    let Some(session) = portal.session() else {
        return;
    };
    let question = session.current_question();
    let selected = session.answer_for(&question.id);

    let progress: String = session
        .questions()
        .iter()
        .enumerate()
        .map(|(i, q)| {
            if i == session.current_index() {
                '*'
            } else if session.is_answered(&q.id) {
                'o'
            } else {
                '.'
            }
        })
        .collect();

    println!(
        "\nSoal {}/{}  [{}]  waktu {}",
        session.current_index() + 1,
        session.question_count(),
        progress,
        format_time(session.time_left_secs()),
    );
    println!("{}", question.text);
    for (i, option) in question.options.iter().enumerate() {
        let letter = (b'A' + i as u8) as char;
        let marker = if selected == Some(i) { ">" } else { " " };
        println!("  {marker} {letter}. {option}");
    }
}

fn render_result(portal: &ExamPortal, result: &ExamResult) {
    let session = portal.session().expect("exam completed");

    println!("\n=== Hasil Ujian ===");

    let mut table = Table::new();
    table.set_header(vec!["Student", "Nilai", "Benar", "Soal"]);
    table.add_row(vec![
        session.student_name().to_string(),
        result.score.to_string(),
        result.correct_answers.to_string(),
        result.total_questions.to_string(),
    ]);
    println!("{table}");

    let distribution = result.distribution();
    println!("\nDistribusi Jawaban");
    println!("  Benar  {:>3} {}", distribution.correct, "#".repeat(distribution.correct));
    println!("  Salah  {:>3} {}", distribution.incorrect, "#".repeat(distribution.incorrect));

    println!("\nAnalisis AI EduQuest:");
    println!("\"{}\"", result.ai_feedback);
}

fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
