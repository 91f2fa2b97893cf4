//! Provider grouping and picker menu layout.

use crate::models::{ModelCatalog, ModelDescriptor, Provider};

/// Models of one provider, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderGroup<'a> {
    pub provider: Provider,
    pub models: Vec<&'a ModelDescriptor>,
}

impl ProviderGroup<'_> {
    pub fn label(&self) -> &'static str {
        self.provider.label()
    }
}

/// Group models by provider in display priority order.
///
/// Providers with no models are omitted. Within a group, models follow
/// catalog order whatever order `models` lists them in.
pub fn group_by_provider<'a>(
    catalog: &'a ModelCatalog,
    models: &[&ModelDescriptor],
) -> Vec<ProviderGroup<'a>> {
    Provider::ALL
        .into_iter()
        .filter_map(|provider| {
            let grouped: Vec<&ModelDescriptor> = catalog
                .find_by_provider(provider)
                .into_iter()
                .filter(|m| models.iter().any(|wanted| wanted.id == m.id))
                .collect();
            (!grouped.is_empty()).then_some(ProviderGroup {
                provider,
                models: grouped,
            })
        })
        .collect()
}

/// One row of the picker menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry<'a> {
    /// Group heading
    Label(&'static str),
    Item {
        model: &'a ModelDescriptor,
        active: bool,
    },
    /// Divider between two groups
    Separator,
}

impl MenuEntry<'_> {
    pub fn is_selectable(&self) -> bool {
        matches!(self, MenuEntry::Item { .. })
    }
}

/// Lay out grouped models as menu rows with the selected id marked active.
pub fn build_menu<'a>(groups: &[ProviderGroup<'a>], selected_id: &str) -> Vec<MenuEntry<'a>> {
    let mut entries = Vec::new();

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            entries.push(MenuEntry::Separator);
        }
        entries.push(MenuEntry::Label(group.label()));
        entries.extend(group.models.iter().map(|&model| MenuEntry::Item {
            model,
            active: model.id == selected_id,
        }));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick<'a>(catalog: &'a ModelCatalog, ids: &[&str]) -> Vec<&'a ModelDescriptor> {
        ids.iter().filter_map(|id| catalog.find_by_id(id)).collect()
    }

    fn separators(entries: &[MenuEntry<'_>]) -> usize {
        entries.iter().filter(|e| **e == MenuEntry::Separator).count()
    }

    #[test]
    fn test_group_order_is_fixed() {
        let catalog = ModelCatalog::builtin().unwrap();
        let models = pick(&catalog, &["deepseek-chat", "claude-3-opus", "gpt-4o", "gemini-1.5-pro"]);

        let providers: Vec<Provider> = group_by_provider(&catalog, &models).iter().map(|g| g.provider).collect();
        assert_eq!(
            providers,
            vec![Provider::Google, Provider::Openai, Provider::Anthropic, Provider::Openrouter]
        );
    }

    #[test]
    fn test_group_follows_catalog_order() {
        let catalog = ModelCatalog::builtin().unwrap();
        let models = pick(&catalog, &["o1", "gpt-4o", "gemini-1.5-flash", "gemini-2.0-flash-exp"]);
        let groups = group_by_provider(&catalog, &models);

        let ids: Vec<Vec<&str>> = groups
            .iter()
            .map(|g| g.models.iter().map(|m| m.id.as_str()).collect())
            .collect();
        assert_eq!(
            ids,
            vec![vec!["gemini-2.0-flash-exp", "gemini-1.5-flash"], vec!["gpt-4o", "o1"]]
        );
    }

    #[test]
    fn test_google_and_anthropic_only() {
        let catalog = ModelCatalog::builtin().unwrap();
        let models = pick(&catalog, &["gemini-2.0-flash-exp", "claude-3-5-haiku"]);
        let groups = group_by_provider(&catalog, &models);
        let menu = build_menu(&groups, "gemini-2.0-flash-exp");

        assert_eq!(separators(&menu), 1);
        assert!(!menu.contains(&MenuEntry::Label("OpenAI")));
        assert!(!menu.contains(&MenuEntry::Label("OpenRouter")));
        assert_eq!(menu[0], MenuEntry::Label("Google Gemini (Default)"));
        assert_eq!(menu[2], MenuEntry::Separator);
        assert_eq!(menu[3], MenuEntry::Label("Anthropic"));
    }

    #[test]
    fn test_single_group_has_no_separator() {
        let catalog = ModelCatalog::builtin().unwrap();
        let models = pick(&catalog, &["claude-3-5-haiku"]);
        let menu = build_menu(&group_by_provider(&catalog, &models), "claude-3-5-haiku");
        assert_eq!(separators(&menu), 0);
        assert_eq!(menu.len(), 2);
    }

    #[test]
    fn test_empty_list() {
        let catalog = ModelCatalog::builtin().unwrap();
        assert!(group_by_provider(&catalog, &[]).is_empty());
        assert!(build_menu(&[], "gpt-4o").is_empty());
    }

    #[test]
    fn test_exactly_one_active_item() {
        let catalog = ModelCatalog::builtin().unwrap();
        let models: Vec<&ModelDescriptor> = catalog.all().iter().collect();
        let menu = build_menu(&group_by_provider(&catalog, &models), "o1-mini");

        let active: Vec<&str> = menu
            .iter()
            .filter_map(|e| match e {
                MenuEntry::Item { model, active: true } => Some(model.id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(active, vec!["o1-mini"]);
        assert_eq!(separators(&menu), 3);
        assert_eq!(menu.iter().filter(|e| e.is_selectable()).count(), 14);
    }
}
