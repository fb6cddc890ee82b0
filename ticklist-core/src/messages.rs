//! Caller-visible text
//!
//! Every string a client sees (resource names, read-outs, tool
//! confirmations and error messages) is rendered here so the wording can
//! follow the configured locale.

use crate::catalog::{CatalogError, TodoItem, TodoStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Glyph shown before a completed record's title
pub const COMPLETED_GLYPH: &str = "✓";

/// Glyph shown before a pending record's title
pub const PENDING_GLYPH: &str = "□";

/// Supported display locales
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::Ja => f.write_str("ja"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "ja" | "japanese" => Ok(Locale::Ja),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

/// Renders caller-visible text for one locale
#[derive(Debug, Clone, Copy, Default)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Localized label for a status
    pub fn status_label(&self, status: TodoStatus) -> &'static str {
        match (self.locale, status) {
            (Locale::En, TodoStatus::Completed) => "Completed",
            (Locale::En, TodoStatus::Pending) => "Pending",
            (Locale::Ja, TodoStatus::Completed) => "完了",
            (Locale::Ja, TodoStatus::Pending) => "未完了",
        }
    }

    /// Display name for a resource: glyph followed by the title
    pub fn resource_name(&self, item: &TodoItem) -> String {
        let glyph = match item.status() {
            TodoStatus::Completed => COMPLETED_GLYPH,
            TodoStatus::Pending => PENDING_GLYPH,
        };
        format!("{} {}", glyph, item.title)
    }

    /// One-line description stating the completion state
    pub fn resource_description(&self, item: &TodoItem) -> String {
        let label = self.status_label(item.status());
        match self.locale {
            Locale::En => format!("Status: {}", label),
            Locale::Ja => format!("状態: {}", label),
        }
    }

    /// Plain-text read-out of a record
    pub fn resource_text(&self, item: &TodoItem) -> String {
        let label = self.status_label(item.status());
        match self.locale {
            Locale::En => format!("ID: {}\nTitle: {}\nStatus: {}", item.id, item.title, label),
            Locale::Ja => format!("ID: {}\nタイトル: {}\n状態: {}", item.id, item.title, label),
        }
    }

    pub fn added(&self, item: &TodoItem) -> String {
        match self.locale {
            Locale::En => format!("Added TODO - ID: {}, Title: {}", item.id, item.title),
            Locale::Ja => format!("TODOを追加しました - ID: {}, タイトル: {}", item.id, item.title),
        }
    }

    pub fn completed(&self, item: &TodoItem) -> String {
        match self.locale {
            Locale::En => format!("Completed TODO {} \"{}\"", item.id, item.title),
            Locale::Ja => format!("ID {} のTODO「{}」を完了しました", item.id, item.title),
        }
    }

    pub fn already_completed(&self, item: &TodoItem) -> String {
        match self.locale {
            Locale::En => format!("TODO {} is already completed", item.id),
            Locale::Ja => format!("ID {} のTODOはすでに完了しています", item.id),
        }
    }

    pub fn title_required(&self) -> String {
        match self.locale {
            Locale::En => "Title is required".to_string(),
            Locale::Ja => "タイトルは必須です".to_string(),
        }
    }

    pub fn id_required(&self) -> String {
        match self.locale {
            Locale::En => "ID is required".to_string(),
            Locale::Ja => "IDは必須です".to_string(),
        }
    }

    pub fn unknown_tool(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!("Unknown tool: {}", name),
            Locale::Ja => format!("不明なツールです: {}", name),
        }
    }

    /// Caller-facing text for a catalog failure
    pub fn catalog_error(&self, error: &CatalogError) -> String {
        match (self.locale, error) {
            (Locale::En, CatalogError::NotFound(id)) => format!("Todo {} not found", id),
            (Locale::Ja, CatalogError::NotFound(id)) => format!("ID {} のTODOは見つかりません", id),
            (Locale::En, CatalogError::IdsExhausted) => {
                "No TODO ids left to allocate".to_string()
            }
            (Locale::Ja, CatalogError::IdsExhausted) => "割り当て可能なIDがありません".to_string(),
            (_, CatalogError::InvalidArgument(detail)) => match self.locale {
                Locale::En => format!("Invalid argument: {}", detail),
                Locale::Ja => format!("不正な引数です: {}", detail),
            },
        }
    }
}
