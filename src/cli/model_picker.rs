//! Interactive model selection using dialoguer.

use console::style;
use dialoguer::{theme::ColorfulTheme, FuzzySelect};

use crate::config::Settings;
use crate::db::Database;
use crate::entitlements::UserClass;
use crate::roster::Roster;
use crate::selection::{
    build_menu, group_by_provider, load_session_selection, save_session_selection, MenuEntry,
};

/// Picker rows built from the grouped menu: (model id, display text).
pub fn picker_items(entries: &[MenuEntry<'_>]) -> Vec<(String, String)> {
    let mut current_label = "";
    let mut items = Vec::new();

    for entry in entries {
        match entry {
            MenuEntry::Label(label) => current_label = *label,
            MenuEntry::Item { model, active } => {
                let mut display = format!("{} / {} - {}", current_label, model.name, model.description);
                if *active {
                    display.push_str(" (current)");
                }
                items.push((model.id.clone(), display));
            }
            MenuEntry::Separator => {}
        }
    }

    items
}

/// Show an interactive model picker and persist the choice for the session.
///
/// Returns the selected model id, or `None` if the user cancelled.
pub fn pick_model(
    db: &Database,
    roster: &Roster,
    class: UserClass,
    session: &str,
) -> anyhow::Result<Option<String>> {
    let resolution = roster.resolver().resolve(class);
    if resolution.available_models.is_empty() {
        println!("No models available.");
        return Ok(None);
    }

    let settings = Settings::new(db);
    let mut state = load_session_selection(&settings, session, roster.catalog(), &resolution);

    let groups = group_by_provider(roster.catalog(), &resolution.available_models);
    let menu = build_menu(&groups, state.confirmed());
    let items = picker_items(&menu);

    let default = items
        .iter()
        .position(|(id, _)| id == state.confirmed())
        .unwrap_or(0);
    let display: Vec<&str> = items.iter().map(|(_, d)| d.as_str()).collect();

    let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "Select model (type to filter) [{}]",
            state.trigger_label(roster.catalog())
        ))
        .items(&display)
        .default(default)
        .interact_opt()?;

    let Some(idx) = selection else {
        return Ok(None);
    };
    let Some((id, _)) = items.get(idx) else {
        return Ok(None);
    };

    match save_session_selection(&settings, session, &mut state, id) {
        Ok(()) => {
            println!(
                "{} {}",
                style("Model set to").green(),
                style(state.trigger_label(roster.catalog())).bold()
            );
            Ok(Some(id.clone()))
        }
        Err(e) => {
            println!(
                "{} {}",
                style("Could not save selection, keeping").red(),
                style(state.trigger_label(roster.catalog())).bold()
            );
            Err(e.into())
        }
    }
}
