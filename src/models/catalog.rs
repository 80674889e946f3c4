// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Schema field catalog: the fixed set of selectable `{key, label}` pairs.
//! Loaded once at startup from JSON configuration data and never mutated.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// Catalog shipped with the binary.
const DEFAULT_CATALOG_JSON: &str = include_str!("../../assets/schema_catalog.json");

/// Single selectable schema field.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SchemaField {
    /// Stable identifier sent on the wire (e.g. `first_name`).
    pub key: String,
    /// Human-readable display name (e.g. `First Name`).
    pub label: String,
}

/// Ordered, duplicate-free list of schema fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaCatalog {
    fields: Vec<SchemaField>,
}

impl SchemaCatalog {
    /// Build a catalog, rejecting empty lists, blank keys and duplicate keys.
    pub fn new(fields: Vec<SchemaField>) -> Result<Self> {
        if fields.is_empty() {
            return Err(anyhow!("Schema catalog must contain at least one field"));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if field.key.trim().is_empty() {
                return Err(anyhow!(
                    "Schema catalog contains a field with an empty key (label '{}')",
                    field.label
                ));
            }
            if !seen.insert(field.key.as_str()) {
                return Err(anyhow!("Duplicate schema key in catalog: {}", field.key));
            }
        }

        Ok(Self { fields })
    }

    /// Parse a catalog from a JSON array of `{ "key": ..., "label": ... }` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let fields: Vec<SchemaField> =
            serde_json::from_str(json).context("Failed to parse schema catalog JSON")?;
        Self::new(fields)
    }

    /// Catalog shipped with the binary, validated like any other source.
    pub fn builtin() -> Result<Self> {
        Self::from_json(DEFAULT_CATALOG_JSON).context("Built-in schema catalog is invalid")
    }

    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema catalog {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid schema catalog {}", path.display()))
    }

    /// All fields in catalog order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Whether `key` names a catalog field.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.key == key)
    }

    /// Display label for `key`, if it is part of the catalog.
    pub fn label_of(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.label.as_str())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_has_seven_entries_in_order() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let keys: Vec<&str> = catalog.fields().iter().map(|f| f.key.as_str()).collect();

        assert_eq!(
            keys,
            vec![
                "first_name",
                "last_name",
                "gender",
                "age",
                "account_name",
                "city",
                "state"
            ]
        );
        assert_eq!(catalog.label_of("account_name"), Some("Account Name"));
    }

    #[test]
    fn builtin_catalog_goes_through_validation() {
        let catalog = SchemaCatalog::builtin().unwrap();
        assert_eq!(SchemaCatalog::from_json(DEFAULT_CATALOG_JSON).unwrap(), catalog);

        let duplicated = [catalog.fields(), &catalog.fields()[..1]].concat();
        assert!(SchemaCatalog::new(duplicated).is_err());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let json = r#"[{"key":"age","label":"Age"},{"key":"age","label":"Years"}]"#;

        let err = SchemaCatalog::from_json(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate schema key"));
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(SchemaCatalog::from_json("[]").is_err());
    }

    #[test]
    fn label_lookup_misses_unknown_keys() {
        let catalog = SchemaCatalog::builtin().unwrap();
        assert!(catalog.contains("city"));
        assert!(!catalog.contains("zip"));
        assert_eq!(catalog.label_of("zip"), None);
    }

    #[test]
    fn load_reads_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"key":"plan","label":"Plan"}},{{"key":"region","label":"Region"}}]"#
        )
        .unwrap();

        let catalog = SchemaCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.fields().len(), 2);
        assert_eq!(catalog.label_of("region"), Some("Region"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = SchemaCatalog::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read schema catalog"));
    }
}
