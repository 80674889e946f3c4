// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Segment draft domain model: the editable name plus the ordered, duplicate-free
//! list of schema keys chosen from the catalog.
//!
//! All rules that keep the draft valid live here so the UI layer only has to
//! forward user intent.

use thiserror::Error;

use crate::models::catalog::{SchemaCatalog, SchemaField};

/// Rejected draft mutation. The draft is left untouched when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Unknown schema field '{0}'.")]
    UnknownField(String),
    #[error("Schema '{0}' is already part of this segment.")]
    AlreadyAdded(String),
    #[error("No schema row at position {index} (segment has {len}).")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Non-fatal condition raised when "add schema" is triggered too early.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SelectionWarning {
    #[error("Please select a schema first!")]
    NothingPending,
}

/// In-progress segment composed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentDraft {
    name: String,
    pending_selection: Option<String>,
    added_fields: Vec<String>,
}

impl SegmentDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key chosen in the "add" selector but not yet committed.
    pub fn pending_selection(&self) -> Option<&str> {
        self.pending_selection.as_deref()
    }

    /// Committed schema keys in insertion order.
    pub fn added_fields(&self) -> &[String] {
        &self.added_fields
    }

    /// Replace the segment name. Validation happens at submit time.
    pub fn set_name(&mut self, text: impl Into<String>) {
        self.name = text.into();
    }

    /// Stage `key` for the next [`commit_pending`](Self::commit_pending).
    pub fn select_pending(&mut self, catalog: &SchemaCatalog, key: &str) -> Result<(), DraftError> {
        if !catalog.contains(key) {
            return Err(DraftError::UnknownField(key.to_string()));
        }
        if self.is_added(key) {
            return Err(DraftError::AlreadyAdded(key.to_string()));
        }
        self.pending_selection = Some(key.to_string());
        Ok(())
    }

    pub fn clear_pending(&mut self) {
        self.pending_selection = None;
    }

    /// Move the pending key to the end of the added list.
    pub fn commit_pending(&mut self) -> Result<(), SelectionWarning> {
        let key = self
            .pending_selection
            .take()
            .ok_or(SelectionWarning::NothingPending)?;
        self.added_fields.push(key);
        Ok(())
    }

    /// Swap the key at `index` for `new_key`, keeping every other row in place.
    pub fn replace_field(
        &mut self,
        catalog: &SchemaCatalog,
        index: usize,
        new_key: &str,
    ) -> Result<(), DraftError> {
        let len = self.added_fields.len();
        if index >= len {
            return Err(DraftError::IndexOutOfRange { index, len });
        }
        if !catalog.contains(new_key) {
            return Err(DraftError::UnknownField(new_key.to_string()));
        }
        let used_elsewhere = self
            .added_fields
            .iter()
            .enumerate()
            .any(|(i, key)| i != index && key == new_key);
        if used_elsewhere {
            return Err(DraftError::AlreadyAdded(new_key.to_string()));
        }

        // A staged key that just became a row would be added twice on commit.
        if self.pending_selection.as_deref() == Some(new_key) {
            self.pending_selection = None;
        }
        self.added_fields[index] = new_key.to_string();
        Ok(())
    }

    /// Catalog fields not yet added, in catalog order.
    pub fn remaining_candidates<'a>(&self, catalog: &'a SchemaCatalog) -> Vec<&'a SchemaField> {
        catalog
            .fields()
            .iter()
            .filter(|f| !self.is_added(&f.key))
            .collect()
    }

    /// Options for the row editor at `index`: remaining fields plus the row's own key.
    pub fn row_candidates<'a>(
        &self,
        catalog: &'a SchemaCatalog,
        index: usize,
    ) -> Vec<&'a SchemaField> {
        let own = self.added_fields.get(index).map(String::as_str);
        catalog
            .fields()
            .iter()
            .filter(|f| !self.is_added(&f.key) || Some(f.key.as_str()) == own)
            .collect()
    }

    /// True until the user has typed a name or touched the schema list.
    pub fn is_pristine(&self) -> bool {
        self.name.is_empty() && self.pending_selection.is_none() && self.added_fields.is_empty()
    }

    fn is_added(&self, key: &str) -> bool {
        self.added_fields.iter().any(|k| k == key)
    }
}
