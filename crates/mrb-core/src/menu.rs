use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{errors::Error, Result};

/// Canned response behind a menu label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CannedResponse {
    Text { text: String },
    Photo { url: String, caption: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub label: String,
    pub response: CannedResponse,
}

/// The static menu: a small set of label -> canned-response mappings.
///
/// Menu dispatch is stateless; selecting an entry never touches the session
/// store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuCatalog {
    entries: Vec<MenuEntry>,
}

impl MenuCatalog {
    /// Load a catalog from a JSON file (array of entries).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let catalog: MenuCatalog = serde_json::from_str(&raw)?;
        if catalog.entries.is_empty() {
            return Err(Error::Config(format!(
                "menu file {} contains no entries",
                path.display()
            )));
        }
        Ok(catalog)
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label.clone()).collect()
    }

    /// Exact label match, as selections arrive verbatim from the keyboard.
    pub fn find(&self, text: &str) -> Option<&MenuEntry> {
        self.entries.iter().find(|e| e.label == text)
    }
}

impl Default for MenuCatalog {
    fn default() -> Self {
        let text = |label: &str, text: &str| MenuEntry {
            label: label.to_string(),
            response: CannedResponse::Text {
                text: text.to_string(),
            },
        };
        let photo = |label: &str, url: &str, caption: &str| MenuEntry {
            label: label.to_string(),
            response: CannedResponse::Photo {
                url: url.to_string(),
                caption: caption.to_string(),
            },
        };

        MenuCatalog {
            entries: vec![
                photo(
                    "📍 Location",
                    "https://example.com/img/market.png",
                    "📍 We're located at: 123 Market St, Townsville",
                ),
                photo(
                    "☎ Contact",
                    "https://example.com/img/market.png",
                    "📞 Contact us at: +123 456 789",
                ),
                text(
                    "🛒 Book Items",
                    "📝 Please reply to this message with the item(s) you wish to book.\n\
                     Include quantity, preferred time, and any special requests.",
                ),
                photo(
                    "🌐 Website",
                    "https://example.com/img/market.png",
                    "🌐 Visit our site: https://example.com",
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_unique_labels() {
        let menu = MenuCatalog::default();
        let labels = menu.labels();
        for (i, label) in labels.iter().enumerate() {
            assert!(!labels[i + 1..].contains(label), "duplicate label {label}");
        }
    }

    #[test]
    fn find_is_exact_match_only() {
        let menu = MenuCatalog::default();
        assert!(menu.find("🛒 Book Items").is_some());
        assert!(menu.find("Book Items").is_none());
        assert!(menu.find("🛒 book items").is_none());
    }

    #[test]
    fn catalog_round_trips_through_json() {
        let menu = MenuCatalog::default();
        let json = serde_json::to_string(&menu).unwrap();
        let back: MenuCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(menu, back);
    }

    #[test]
    fn load_rejects_empty_catalog() {
        let path = std::env::temp_dir().join(format!("mrb-menu-{}.json", std::process::id()));
        std::fs::write(&path, "[]").unwrap();
        let err = MenuCatalog::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let _ = std::fs::remove_file(&path);
    }
}
