//! Provider API key management.

use std::io::{BufRead, IsTerminal};

use anyhow::{bail, Context};
use console::style;
use dialoguer::Password;

use crate::db::Database;
use crate::models::Provider;

/// Where a provider's API key comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Stored,
    Environment,
    Missing,
}

impl KeySource {
    fn describe(&self) -> &'static str {
        match self {
            KeySource::Stored => "stored",
            KeySource::Environment => "from environment",
            KeySource::Missing => "missing",
        }
    }
}

/// The provider owning an API key name, e.g. `OPENAI_API_KEY`.
pub fn provider_for_key(name: &str) -> anyhow::Result<Provider> {
    Provider::ALL
        .into_iter()
        .find(|p| p.api_key_env() == name)
        .with_context(|| {
            let known: Vec<&str> = Provider::ALL.iter().map(|p| p.api_key_env()).collect();
            format!("Unknown API key name: {} (expected one of {})", name, known.join(", "))
        })
}

/// Key source for every provider, in display order. Stored keys win.
pub fn api_key_status(db: &Database) -> Vec<(Provider, KeySource)> {
    Provider::ALL
        .into_iter()
        .map(|provider| {
            let env = provider.api_key_env();
            let source = if db.has_api_key(env) {
                KeySource::Stored
            } else if std::env::var(env).is_ok() {
                KeySource::Environment
            } else {
                KeySource::Missing
            };
            (provider, source)
        })
        .collect()
}

pub fn render_api_keys(db: &Database) -> String {
    let mut out = format!("\n{}\n\n", style("API Keys").bold());
    for (provider, source) in api_key_status(db) {
        let status = match source {
            KeySource::Missing => style(source.describe()).red(),
            _ => style(source.describe()).green(),
        };
        out.push_str(&format!(
            "  {:<20} {:<24} {}\n",
            style(provider.api_key_env()).cyan(),
            provider.label(),
            status
        ));
    }
    out
}

/// Store a key after checking the name belongs to a provider.
pub fn store_api_key(db: &Database, name: &str, value: &str) -> anyhow::Result<()> {
    let provider = provider_for_key(name)?;
    let value = value.trim();
    if value.is_empty() {
        bail!("Empty API key for {}", name);
    }
    db.save_api_key(name, value)?;
    tracing::info!(provider = %provider, key = name, "API key saved");
    Ok(())
}

pub fn remove_api_key(db: &Database, name: &str) -> anyhow::Result<()> {
    let provider = provider_for_key(name)?;
    db.delete_api_key(name)?;
    tracing::info!(provider = %provider, key = name, "API key deleted");
    Ok(())
}

/// Read a key value from a hidden prompt, or one line of piped stdin.
pub fn set_api_key(db: &Database, name: &str) -> anyhow::Result<()> {
    let provider = provider_for_key(name)?;
    let stdin = std::io::stdin();

    let value = if stdin.is_terminal() {
        Password::new()
            .with_prompt(format!("{} API key", provider.label()))
            .interact()?
    } else {
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        line
    };

    store_api_key(db, name, &value)?;
    println!("{} {}", style("✓").green(), style(format!("Saved {}", name)).dim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_db() -> (TempDir, Database) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open_at(temp_dir.path().join("test.db")).unwrap();
        db.migrate().unwrap();
        (temp_dir, db)
    }

    #[test]
    fn test_provider_for_key() {
        assert_eq!(provider_for_key("OPENROUTER_API_KEY").unwrap(), Provider::Openrouter);
        let err = provider_for_key("AWS_SECRET").unwrap_err().to_string();
        assert!(err.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_store_and_remove_key() {
        let (_temp, db) = setup_test_db();

        store_api_key(&db, "GEMINI_API_KEY", "  gm-123\n").unwrap();
        assert_eq!(db.get_api_key("GEMINI_API_KEY").unwrap(), Some("gm-123".to_string()));

        let status = api_key_status(&db);
        assert_eq!(status[0], (Provider::Google, KeySource::Stored));

        remove_api_key(&db, "GEMINI_API_KEY").unwrap();
        assert!(!db.has_api_key("GEMINI_API_KEY"));
    }

    #[test]
    fn test_store_rejects_unknown_or_empty() {
        let (_temp, db) = setup_test_db();
        assert!(store_api_key(&db, "NOT_A_PROVIDER", "x").is_err());
        assert!(store_api_key(&db, "OPENAI_API_KEY", "   ").is_err());
        assert!(!db.has_api_key("OPENAI_API_KEY"));
        assert!(remove_api_key(&db, "NOT_A_PROVIDER").is_err());
    }

    #[test]
    fn test_render_lists_every_provider() {
        let (_temp, db) = setup_test_db();
        db.save_api_key("ANTHROPIC_API_KEY", "sk-ant").unwrap();
        let out = console::strip_ansi_codes(&render_api_keys(&db)).to_string();

        for provider in Provider::ALL {
            assert!(out.contains(provider.api_key_env()));
        }
        let anthropic = out.lines().find(|l| l.contains("ANTHROPIC_API_KEY")).unwrap();
        assert!(anthropic.contains("stored"));
        assert!(!out.contains("sk-ant"));
    }
}
