//! Bounded, de-duplicated entry lists used by the product form.
//!
//! Images, tags and features are each an [`EntryList`]: ordered, unique,
//! with a fixed capacity. Blank input is refused first. Images then check
//! capacity before duplicates; tags and features check duplicates first.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which sub-collection an [`EntryList`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Image,
    Tag,
    Feature,
}

impl EntryKind {
    /// Every kind, in form order.
    pub const ALL: [Self; 3] = [Self::Image, Self::Tag, Self::Feature];

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            Self::Image => 5,
            Self::Tag | Self::Feature => 10,
        }
    }

    /// Canonical form of a raw input, or `None` if it is blank.
    ///
    /// Tags are lowercased, which makes tag de-duplication case-insensitive.
    #[must_use]
    pub fn normalize(self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match self {
            Self::Tag => trimmed.to_lowercase(),
            Self::Image | Self::Feature => trimmed.to_owned(),
        })
    }

    /// Message shown after a successful insert.
    #[must_use]
    pub const fn added_message(self) -> &'static str {
        match self {
            Self::Image => "Image URL added",
            Self::Tag => "Tag added",
            Self::Feature => "Feature added",
        }
    }

    /// Message shown after a removal.
    #[must_use]
    pub const fn removed_message(self) -> &'static str {
        match self {
            Self::Image => "Image URL removed",
            Self::Tag => "Tag removed",
            Self::Feature => "Feature removed",
        }
    }

    /// Whether a full list is reported ahead of a duplicate.
    #[must_use]
    pub const fn capacity_checked_first(self) -> bool {
        matches!(self, Self::Image)
    }

    const fn noun(self) -> &'static str {
        match self {
            Self::Image => "image URL",
            Self::Tag => "tag",
            Self::Feature => "feature",
        }
    }

    const fn plural(self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Tag => "tags",
            Self::Feature => "features",
        }
    }
}

/// Why an insert was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryRejection {
    /// Input was blank after trimming.
    #[error("Please enter a valid {}", .0.noun())]
    Empty(EntryKind),
    /// An equal entry already exists.
    #[error("This {} is already added", .0.noun())]
    Duplicate(EntryKind),
    /// The list is at capacity.
    #[error("Maximum {} {} allowed", .0.capacity(), .0.plural())]
    Full(EntryKind),
}

/// Ordered list of unique entries with a fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryList {
    kind: EntryKind,
    items: Vec<String>,
}

impl EntryList {
    /// An empty list of `kind`.
    #[must_use]
    pub const fn new(kind: EntryKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// What this list holds.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether no more entries fit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.kind.capacity()
    }

    /// Insert `raw` after normalizing it.
    ///
    /// Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`EntryRejection`] if the input is blank, already present,
    /// or the list is full. The list is unchanged on error.
    pub fn try_add(&mut self, raw: &str) -> Result<&str, EntryRejection> {
        let value = self
            .kind
            .normalize(raw)
            .ok_or(EntryRejection::Empty(self.kind))?;

        if self.kind.capacity_checked_first() && self.is_full() {
            return Err(EntryRejection::Full(self.kind));
        }

        if self.items.contains(&value) {
            return Err(EntryRejection::Duplicate(self.kind));
        }

        if self.is_full() {
            return Err(EntryRejection::Full(self.kind));
        }

        self.items.push(value);
        Ok(self.items.last().map_or("", String::as_str))
    }

    /// Remove an entry by exact value. Returns whether it was present.
    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item != value);
        self.items.len() != before
    }
}
