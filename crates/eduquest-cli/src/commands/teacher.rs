//! The `eduquest teacher` command: question bank management.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;

use eduquest_core::model::{QuestionBank, QuestionDraft, OPTION_COUNT};
use eduquest_core::parser::{parse_bank, save_bank};
use eduquest_core::session::ExamPortal;

pub fn execute(bank_path: Option<PathBuf>) -> Result<()> {
    let bank = match &bank_path {
        Some(path) if path.exists() => parse_bank(path)?,
        Some(_) => QuestionBank::new(),
        None => QuestionBank::seeded(),
    };

    let mut portal = ExamPortal::new(bank);
    portal.enter_teacher().expect("fresh portal is idle");

    println!("=== Panel Manajemen Guru ===");
    println!("Commands: list, add, edit <n>, del <n>, quit");
    print_bank(portal.bank());

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("teacher> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read input")?;
        let mut parts = line.trim().split_whitespace();

        match parts.next() {
            None => {}
            Some("list") => print_bank(portal.bank()),
            Some("add") => match read_draft(&mut lines)? {
                Some(draft) => match portal.bank_mut().create(draft) {
                    Ok(question) => println!("Added question {}", question.id),
                    Err(e) => println!("Rejected: {e}"),
                },
                None => break,
            },
            Some("edit") => {
                let Some(id) = question_id_by_number(portal.bank(), parts.next()) else {
                    println!("Usage: edit <question number>");
                    continue;
                };
                match read_draft(&mut lines)? {
                    Some(draft) => match portal.bank_mut().update(&id, draft) {
                        Ok(()) => println!("Updated question {id}"),
                        Err(e) => println!("Rejected: {e}"),
                    },
                    None => break,
                }
            }
            Some("del") => {
                let Some(id) = question_id_by_number(portal.bank(), parts.next()) else {
                    println!("Usage: del <question number>");
                    continue;
                };
                print!("Hapus soal ini? (y/n) ");
                std::io::stdout().flush()?;
                let Some(answer) = lines.next() else {
                    break;
                };
                if answer?.trim().eq_ignore_ascii_case("y") {
                    match portal.bank_mut().delete(&id) {
                        Ok(_) => println!("Deleted question {id}"),
                        Err(e) => println!("Rejected: {e}"),
                    }
                } else {
                    println!("Kept.");
                }
            }
            Some("quit") | Some("back") | Some("q") => break,
            Some(other) => println!("Unknown command: {other}"),
        }
    }

    portal.leave_teacher().expect("still in teacher mode");

    if let Some(path) = &bank_path {
        save_bank(portal.bank(), path)?;
        println!("Question bank saved to: {}", path.display());
    }

    Ok(())
}

/// Read a full question draft: text, four options, correct letter.
///
/// Returns `None` on EOF.
fn read_draft(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
) -> Result<Option<QuestionDraft>> {
    let mut prompt_line = |label: &str| -> Result<Option<String>> {
        print!("{label}: ");
        std::io::stdout().flush()?;
        match lines.next() {
            Some(line) => Ok(Some(line.context("failed to read input")?)),
            None => Ok(None),
        }
    };

    let Some(text) = prompt_line("Pertanyaan")? else {
        return Ok(None);
    };

    let mut options: [String; OPTION_COUNT] = Default::default();
    for (i, slot) in options.iter_mut().enumerate() {
        let letter = (b'A' + i as u8) as char;
        let Some(option) = prompt_line(&format!("Pilihan {letter}"))? else {
            return Ok(None);
        };
        *slot = option;
    }

    let Some(correct) = prompt_line("Jawaban benar (a-d)")? else {
        return Ok(None);
    };
    let correct_answer = match correct.trim().to_lowercase().as_str() {
        "" | "a" => 0,
        "b" => 1,
        "c" => 2,
        "d" => 3,
        other => {
            println!("Unknown option '{other}', defaulting to A");
            0
        }
    };

    Ok(Some(QuestionDraft {
        text: text.trim().to_string(),
        options,
        correct_answer,
    }))
}

fn question_id_by_number(bank: &QuestionBank, arg: Option<&str>) -> Option<String> {
    let number: usize = arg?.parse().ok()?;
    bank.list()
        .get(number.checked_sub(1)?)
        .map(|q| q.id.clone())
}

fn print_bank(bank: &QuestionBank) {
    if bank.is_empty() {
        println!("Belum ada soal. Silakan tambah soal baru.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Soal", "Jawaban Benar"]);
    for (i, question) in bank.list().iter().enumerate() {
        let letter = (b'A' + question.correct_answer as u8) as char;
        table.add_row(vec![
            (i + 1).to_string(),
            question.text.clone(),
            format!("{letter}. {}", question.options[question.correct_answer]),
        ]);
    }
    println!("Daftar Soal ({})", bank.len());
    println!("{table}");
}
