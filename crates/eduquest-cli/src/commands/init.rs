//! The `eduquest init` command.

use anyhow::Result;

use eduquest_core::model::QuestionBank;
use eduquest_core::parser::bank_to_toml;

pub fn execute() -> Result<()> {
    // Create eduquest.toml
    if std::path::Path::new("eduquest.toml").exists() {
        println!("eduquest.toml already exists, skipping.");
    } else {
        std::fs::write("eduquest.toml", SAMPLE_CONFIG)?;
        println!("Created eduquest.toml");
    }

    // Create the sample question bank
    if std::path::Path::new("questions.toml").exists() {
        println!("questions.toml already exists, skipping.");
    } else {
        std::fs::write("questions.toml", bank_to_toml(&QuestionBank::seeded())?)?;
        println!("Created questions.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit eduquest.toml with your API key");
    println!("  2. Run: eduquest validate --bank questions.toml");
    println!("  3. Run: eduquest take --name \"Your Name\" --bank questions.toml");
    println!("  4. Manage questions: eduquest teacher --bank questions.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# eduquest configuration

default_provider = "gemini"

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"
"#;
