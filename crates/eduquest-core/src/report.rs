//! Exam report with JSON persistence.
//!
//! Exam sessions themselves live and die in process memory; a report is an
//! optional export of the completed result for record keeping.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::{AnswerDistribution, ExamResult};
use crate::session::ExamSession;

/// A completed exam, ready to save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// The exam title.
    pub exam_title: String,
    /// The student who took the exam.
    pub student_name: String,
    /// Seconds of exam time actually used.
    pub duration_used_secs: u64,
    /// The immutable result.
    pub result: ExamResult,
}

impl ExamReport {
    /// Build a report from a completed session.
    ///
    /// Returns `None` while the session has no result yet.
    pub fn from_session(session: &ExamSession, exam_title: &str, duration_secs: u64) -> Option<Self> {
        let result = session.result()?.clone();
        Some(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            exam_title: exam_title.to_string(),
            student_name: session.student_name().to_string(),
            duration_used_secs: duration_secs.saturating_sub(session.time_left_secs()),
            result,
        })
    }

    /// Correct/incorrect counts for the distribution display.
    pub fn distribution(&self) -> AnswerDistribution {
        self.result.distribution()
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse report JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report(correct: usize, total: usize, score: u32) -> ExamReport {
        ExamReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            exam_title: "Ujian EduQuest".into(),
            student_name: "Budi".into(),
            duration_used_secs: 120,
            result: ExamResult {
                total_questions: total,
                correct_answers: correct,
                score,
                ai_feedback: "Bagus!".into(),
            },
        }
    }

    #[test]
    fn json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("exam.json");

        let report = make_report(4, 5, 80);
        report.save_json(&path).unwrap();
        let loaded = ExamReport::load_json(&path).unwrap();

        assert_eq!(loaded.student_name, "Budi");
        assert_eq!(loaded.result.score, 80);
        assert_eq!(loaded.duration_used_secs, 120);
    }

    #[test]
    fn distribution_comes_from_result() {
        let report = make_report(3, 5, 60);
        assert_eq!(report.distribution().correct, 3);
        assert_eq!(report.distribution().incorrect, 2);
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(ExamReport::load_json(Path::new("no_such_report.json")).is_err());
    }
}
