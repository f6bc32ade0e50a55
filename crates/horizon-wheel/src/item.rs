//! Items shown in a wheel lane.

use std::fmt;

/// A selectable entry in a wheel lane.
///
/// Items are identified by their `key`; two items with the same key are the
/// same item even if their labels differ.
#[derive(Debug, Clone, Eq)]
pub struct WheelItem {
    key: String,
    label: String,
}

impl WheelItem {
    /// Create an item with an explicit key and display label.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    /// Build a lane from labels, keying each item by its position.
    pub fn indexed<I, S>(labels: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| Self::new(i.to_string(), label))
            .collect()
    }

    /// The stable identity of this item.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The text shown for this item.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for WheelItem {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl std::hash::Hash for WheelItem {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for WheelItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
