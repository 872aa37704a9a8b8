//! List rows and the per-row update mini-protocol
//!
//! Rows are addressed by title. Titles are not unique by construction; every
//! lookup takes the first row with a matching title, so writers that reuse a
//! title only ever reach the earliest of those rows.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Status icon vocabulary for a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    Wait,
    Success,
    Fail,
    Error,
    Pending,
    Progress,
}

impl StatusIcon {
    /// Parse a status token; `None` when it isn't part of the vocabulary
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "wait" => Some(StatusIcon::Wait),
            "success" => Some(StatusIcon::Success),
            "fail" => Some(StatusIcon::Fail),
            "error" => Some(StatusIcon::Error),
            "pending" => Some(StatusIcon::Pending),
            "progress" => Some(StatusIcon::Progress),
            _ => None,
        }
    }
}

/// One row of the list view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListItem {
    pub title: String,
    pub subtitle: String,
    pub icon: String,
    pub status_icon: Option<StatusIcon>,
    pub status_text: String,
    /// Progress fraction, meaningful when the status icon is `progress`
    pub progress: f64,
}

impl ListItem {
    /// Row with only a title set
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Legacy `<title>: <status or text>` form
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyStatus {
    pub title: String,
    pub status: String,
}

/// Ways a structured line names its row
#[derive(Debug, Clone, PartialEq)]
pub enum RowSelector {
    Index(i64),
    Title(String),
}

/// Structured `key: value, ...` form
///
/// Each field is `Some` only when its key appeared in the line, so an update
/// touches exactly the fields the writer named.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowUpdate {
    /// Applied in line order; the last one that resolves wins
    pub selectors: Vec<RowSelector>,
    pub subtitle: Option<String>,
    pub icon: Option<String>,
    pub status_text: Option<String>,
    /// `Some(None)` clears the status icon
    pub status_icon: Option<Option<StatusIcon>>,
    pub progress: Option<f64>,
    pub delete: bool,
    pub add: bool,
}

impl RowUpdate {
    /// Resolve the addressed title against the current rows
    pub fn resolve_title(&self, rows: &ListItems) -> String {
        let mut title = String::new();
        for selector in &self.selectors {
            match selector {
                RowSelector::Index(index) => {
                    match usize::try_from(*index).ok().and_then(|i| rows.get(i)) {
                        Some(item) => title = item.title.clone(),
                        None => debug!("List index {} out of range", index),
                    }
                }
                RowSelector::Title(t) => title = t.clone(),
            }
        }
        title
    }

    fn apply_to(&self, item: &mut ListItem) {
        if let Some(subtitle) = &self.subtitle {
            item.subtitle = subtitle.clone();
        }
        if let Some(icon) = &self.icon {
            item.icon = icon.clone();
        }
        if let Some(status_icon) = self.status_icon {
            item.status_icon = status_icon;
        }
        if let Some(status_text) = &self.status_text {
            item.status_text = status_text.clone();
        }
        if let Some(progress) = self.progress {
            item.progress = progress;
        }
    }

    fn to_item(&self, title: String) -> ListItem {
        ListItem {
            title,
            subtitle: self.subtitle.clone().unwrap_or_default(),
            icon: self.icon.clone().unwrap_or_default(),
            status_icon: self.status_icon.flatten(),
            status_text: self.status_text.clone().unwrap_or_default(),
            progress: self.progress.unwrap_or_default(),
        }
    }
}

/// A parsed `listitem:` line; the legacy form is tried first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItemCommand {
    pub legacy: Option<LegacyStatus>,
    pub update: RowUpdate,
}

/// Ordered list rows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListItems(Vec<ListItem>);

impl ListItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh rows carrying only titles
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(titles.into_iter().map(ListItem::titled).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ListItem> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListItem> {
        self.0.iter()
    }

    pub fn push(&mut self, item: ListItem) {
        self.0.push(item);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Index of the first row with this title
    pub fn position(&self, title: &str) -> Option<usize> {
        self.0.iter().position(|item| item.title == title)
    }

    /// Apply a `listitem:` line, returning the row it updated or added
    pub fn apply(&mut self, command: &ListItemCommand) -> Option<usize> {
        if let Some(legacy) = &command.legacy {
            if let Some(row) = self.position(&legacy.title) {
                let item = &mut self.0[row];
                match StatusIcon::parse(&legacy.status) {
                    Some(icon) => {
                        item.status_icon = Some(icon);
                        item.status_text.clear();
                    }
                    None => {
                        item.status_icon = None;
                        item.status_text = legacy.status.clone();
                    }
                }
                return Some(row);
            }
        }

        self.apply_update(&command.update)
    }

    fn apply_update(&mut self, update: &RowUpdate) -> Option<usize> {
        let title = update.resolve_title(self);
        let mut touched = None;

        if let Some(row) = self.position(&title) {
            if update.delete {
                self.0.remove(row);
                debug!("Deleted list row at index {}", row);
            } else {
                update.apply_to(&mut self.0[row]);
                touched = Some(row);
            }
        }

        if update.add {
            let item = update.to_item(title.clone());
            debug!(
                "List row added: title={:?} status={:?}",
                item.title, item.status_icon
            );
            self.0.push(item);
            touched = self.position(&title);
        }

        touched
    }
}
