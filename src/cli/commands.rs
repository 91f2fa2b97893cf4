//! Model listing and settings commands.

use console::style;

use crate::config::{Settings, SettingsError};
use crate::db::Database;
use crate::entitlements::{Resolution, UserClass};
use crate::models::ModelDescriptor;
use crate::roster::Roster;
use crate::selection::{build_menu, group_by_provider, load_session_selection, MenuEntry};

/// Render the grouped model menu for a resolution.
///
/// `provider` narrows the listing to one provider by name; an unknown name
/// lists nothing.
pub fn render_models(
    roster: &Roster,
    class: UserClass,
    resolution: &Resolution<'_>,
    selected_id: &str,
    provider: Option<&str>,
) -> String {
    let models: Vec<&ModelDescriptor> = match provider {
        Some(name) => {
            let allowed = roster.catalog().find_by_provider_name(name);
            resolution
                .available_models
                .iter()
                .copied()
                .filter(|m| allowed.iter().any(|a| a.id == m.id))
                .collect()
        }
        None => resolution.available_models.clone(),
    };

    let mut out = String::new();

    if models.is_empty() {
        out.push_str(&format!(
            "\n{}\n",
            style(format!("No models available for {} users.", class)).dim()
        ));
        return out;
    }

    out.push_str(&format!(
        "\n{} {}\n\n",
        style("Available Models").bold(),
        style(format!(
            "({}, {} messages/day)",
            class, resolution.max_messages_per_day
        ))
        .dim()
    ));

    let groups = group_by_provider(roster.catalog(), &models);
    for entry in build_menu(&groups, selected_id) {
        match entry {
            MenuEntry::Label(label) => {
                out.push_str(&format!("{}\n", style(format!("{}:", label)).bold()));
            }
            MenuEntry::Item { model, active } => {
                let marker = if active { "→" } else { " " };
                out.push_str(&format!(
                    "  {} {}  {}\n",
                    marker,
                    style(&model.id).cyan(),
                    model.name
                ));
                out.push_str(&format!("      {}\n", style(&model.description).dim()));
            }
            MenuEntry::Separator => out.push('\n'),
        }
    }

    out
}

/// Print the models a user class may use, marking the session's selection.
pub fn show_models(
    db: &Database,
    roster: &Roster,
    class: UserClass,
    session: &str,
    provider: Option<&str>,
) {
    let resolution = roster.resolver().resolve(class);
    let settings = Settings::new(db);
    let state = load_session_selection(&settings, session, roster.catalog(), &resolution);

    print!(
        "{}",
        render_models(roster, class, &resolution, state.confirmed(), provider)
    );
    println!(
        "\n{}",
        style(format!("Current: {}", state.trigger_label(roster.catalog()))).dim()
    );
    println!("{}\n", style("Use --pick to switch").dim());
}

/// Render every stored setting as `key = value`.
pub fn render_settings(settings: &Settings<'_>) -> Result<String, SettingsError> {
    let entries = settings.list()?;
    if entries.is_empty() {
        return Ok(format!("\n{}\n", style("No settings stored.").dim()));
    }

    let mut out = format!("\n{}\n\n", style("Settings").bold());
    for (key, value) in entries {
        out.push_str(&format!("  {} = {}\n", style(key).cyan(), value));
    }
    Ok(out)
}

pub fn show_settings(db: &Database) -> Result<(), SettingsError> {
    print!("{}", render_settings(&Settings::new(db))?);
    Ok(())
}

/// Forget the session's stored model so it falls back to the default.
pub fn clear_selection(db: &Database, roster: &Roster, session: &str) -> Result<(), SettingsError> {
    Settings::new(db).clear_selected_model(session)?;
    println!(
        "{} {}",
        style("✓").green(),
        style(format!(
            "Selection cleared for session {}, using {}",
            session,
            roster.catalog().default_model().name
        ))
        .dim()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterConfig;
    use tempfile::TempDir;

    fn roster() -> Roster {
        Roster::builtin(&RosterConfig::default()).unwrap()
    }

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).to_string()
    }

    #[test]
    fn test_render_guest_models() {
        let roster = roster();
        let resolution = roster.resolver().resolve(UserClass::Guest);
        let out = plain(&render_models(
            &roster,
            UserClass::Guest,
            &resolution,
            "gpt-4o-mini",
            None,
        ));

        assert!(out.contains("(guest, 20 messages/day)"));
        assert!(out.contains("Google Gemini (Default):"));
        assert!(out.contains("→ gpt-4o-mini"));
        assert!(out.contains("  claude-3-5-haiku"));
        assert!(!out.contains("OpenRouter:"));
        assert!(!out.contains("claude-3-opus"));
    }

    #[test]
    fn test_render_groups_in_priority_order() {
        let roster = roster();
        let resolution = roster.resolver().resolve(UserClass::Regular);
        let out = plain(&render_models(
            &roster,
            UserClass::Regular,
            &resolution,
            "gemini-2.0-flash-exp",
            None,
        ));

        let google = out.find("Google Gemini (Default):").unwrap();
        let openai = out.find("OpenAI:").unwrap();
        let anthropic = out.find("Anthropic:").unwrap();
        let openrouter = out.find("OpenRouter:").unwrap();
        assert!(google < openai && openai < anthropic && anthropic < openrouter);
    }

    #[test]
    fn test_render_provider_filter() {
        let roster = roster();
        let resolution = roster.resolver().resolve(UserClass::Guest);

        let out = plain(&render_models(
            &roster,
            UserClass::Guest,
            &resolution,
            "gemini-2.0-flash-exp",
            Some("anthropic"),
        ));
        assert!(out.contains("claude-3-5-haiku"));
        assert!(!out.contains("gpt-4o-mini"));

        let out = plain(&render_models(
            &roster,
            UserClass::Guest,
            &resolution,
            "gemini-2.0-flash-exp",
            Some("openrouter"),
        ));
        assert!(out.contains("No models available for guest users."));
    }

    #[test]
    fn test_render_settings_lists_selections() {
        let temp = TempDir::new().unwrap();
        let db = Database::open_at(temp.path().join("test.db")).unwrap();
        db.migrate().unwrap();
        let settings = Settings::new(&db);

        let out = plain(&render_settings(&settings).unwrap());
        assert!(out.contains("No settings stored."));

        settings.set_selected_model("work", "o1").unwrap();
        let out = plain(&render_settings(&settings).unwrap());
        assert!(out.contains("chat_model.work = o1"));
    }

    #[test]
    fn test_clear_selection_restores_default() {
        let temp = TempDir::new().unwrap();
        let db = Database::open_at(temp.path().join("test.db")).unwrap();
        db.migrate().unwrap();
        let roster = roster();
        let settings = Settings::new(&db);
        settings.set_selected_model("s1", "gpt-4o-mini").unwrap();
        settings.set_selected_model("s2", "o1").unwrap();

        clear_selection(&db, &roster, "s1").unwrap();

        assert_eq!(settings.selected_model("s1"), None);
        assert_eq!(settings.selected_model("s2"), Some("o1".to_string()));
        let resolution = roster.resolver().resolve(UserClass::Guest);
        let state = load_session_selection(&settings, "s1", roster.catalog(), &resolution);
        assert_eq!(state.confirmed(), "gemini-2.0-flash-exp");
    }
}
