//! TOML question bank files.
//!
//! Loads and saves question banks, enforcing the data-model invariants at
//! parse time: exactly four non-blank options per question, non-blank text,
//! and a correct-answer index that points into the options.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionBank, OPTION_COUNT};

/// On-disk shape of a question bank file.
#[derive(Debug, Serialize, Deserialize)]
struct TomlBankFile {
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    options: Vec<String>,
    #[serde(default)]
    correct_answer: usize,
}

/// Parse a TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;
    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            anyhow::ensure!(
                q.options.len() == OPTION_COUNT,
                "question '{}': expected exactly {} options, got {}",
                q.id,
                OPTION_COUNT,
                q.options.len()
            );
            anyhow::ensure!(!q.text.trim().is_empty(), "question '{}': blank text", q.id);
            for (i, option) in q.options.iter().enumerate() {
                anyhow::ensure!(
                    !option.trim().is_empty(),
                    "question '{}': option {} is blank",
                    q.id,
                    i + 1
                );
            }
            anyhow::ensure!(
                q.correct_answer < q.options.len(),
                "question '{}': correct answer index {} out of range",
                q.id,
                q.correct_answer
            );
            Ok(Question {
                id: q.id,
                text: q.text,
                options: q.options,
                correct_answer: q.correct_answer,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank::from_questions(questions))
}

/// Serialize a bank back to the TOML file format.
pub fn bank_to_toml(bank: &QuestionBank) -> Result<String> {
    let file = TomlBankFile {
        questions: bank
            .list()
            .iter()
            .map(|q| TomlQuestion {
                id: q.id.clone(),
                text: q.text.clone(),
                options: q.options.clone(),
                correct_answer: q.correct_answer,
            })
            .collect(),
    };
    toml::to_string_pretty(&file).context("failed to serialize question bank")
}

/// Write a bank to disk, creating parent directories as needed.
pub fn save_bank(bank: &QuestionBank, path: &Path) -> Result<()> {
    let content = bank_to_toml(bank)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write question bank to {}", path.display()))?;
    Ok(())
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for issues that parse cleanly but break exams.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank is empty; exams cannot start".into(),
        });
    }

    // Duplicate ids would make answers ambiguous.
    let mut seen_ids = std::collections::HashSet::new();
    for question in bank.list() {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question id: {}", question.id),
            });
        }
    }

    // Identical options hide which answer is the correct one.
    for question in bank.list() {
        let mut seen = std::collections::HashSet::new();
        for option in &question.options {
            if !seen.insert(option.trim()) {
                warnings.push(ValidationWarning {
                    question_id: Some(question.id.clone()),
                    message: format!("duplicate option text: '{}'", option.trim()),
                });
                break;
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[[questions]]
id = "1"
text = "Siapakah presiden pertama Indonesia?"
options = ["Soeharto", "Ir. Soekarno", "B.J. Habibie", "Abdurrahman Wahid"]
correct_answer = 1

[[questions]]
id = "2"
text = "Berapakah hasil dari 15 x 3 + 5?"
options = ["45", "50", "55", "60"]
correct_answer = 1
"#;

    #[test]
    fn parse_valid_bank() {
        let bank = parse_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.list()[0].id, "1");
        assert_eq!(bank.list()[0].correct_answer, 1);
        assert_eq!(bank.list()[1].options[3], "60");
    }

    #[test]
    fn correct_answer_defaults_to_first_option() {
        let toml = r#"
[[questions]]
id = "q"
text = "Pick one"
options = ["a", "b", "c", "d"]
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.list()[0].correct_answer, 0);
    }

    #[test]
    fn parse_rejects_wrong_option_count() {
        let toml = r#"
[[questions]]
id = "q"
text = "Pick one"
options = ["a", "b"]
"#;
        let err = parse_bank_str(toml, &PathBuf::from("test.toml")).unwrap_err();
        assert!(err.to_string().contains("exactly 4 options"));
    }

    #[test]
    fn parse_rejects_out_of_range_correct_answer() {
        let toml = r#"
[[questions]]
id = "q"
text = "Pick one"
options = ["a", "b", "c", "d"]
correct_answer = 4
"#;
        let err = parse_bank_str(toml, &PathBuf::from("test.toml")).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn parse_rejects_blank_option() {
        let toml = r#"
[[questions]]
id = "q"
text = "Pick one"
options = ["a", "  ", "c", "d"]
"#;
        let err = parse_bank_str(toml, &PathBuf::from("test.toml")).unwrap_err();
        assert!(err.to_string().contains("option 2 is blank"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn empty_file_parses_to_empty_bank() {
        let bank = parse_bank_str("", &PathBuf::from("empty.toml")).unwrap();
        assert!(bank.is_empty());
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.toml");

        let bank = QuestionBank::seeded();
        save_bank(&bank, &path).unwrap();
        let reloaded = parse_bank(&path).unwrap();

        assert_eq!(reloaded.len(), bank.len());
        assert_eq!(reloaded.list()[4].text, bank.list()[4].text);
        assert_eq!(reloaded.list()[2].correct_answer, 3);
    }

    #[test]
    fn validate_flags_duplicates_and_empty_bank() {
        let warnings = validate_bank(&QuestionBank::new());
        assert!(warnings.iter().any(|w| w.message.contains("empty")));

        let mut questions = crate::model::seed_questions();
        questions[1].id = "1".into();
        let bank = QuestionBank::from_questions(questions);
        let warnings = validate_bank(&bank);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("duplicate question id")));
    }

    #[test]
    fn validate_clean_bank_has_no_warnings() {
        assert!(validate_bank(&QuestionBank::seeded()).is_empty());
    }
}
