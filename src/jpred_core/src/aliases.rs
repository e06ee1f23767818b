use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// Mapping from team names as written on the entry form to the names used
/// in the league tables.
///
/// Names without an alias pass through unchanged.
#[derive(Clone, Debug, Default)]
pub struct TeamAliases {
    aliases: HashMap<String, String>,
}

#[derive(Deserialize)]
struct AliasRow {
    #[serde(rename = "FormName")]
    form_name: String,
    #[serde(rename = "TableName")]
    table_name: String,
}

impl TeamAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read aliases from a CSV file.
    /// Format: FormName,TableName (with header)
    pub fn read_from_file(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        let mut aliases = Self::new();

        for row in reader.deserialize() {
            let row: AliasRow = row?;
            if row.form_name.is_empty() {
                continue;
            }
            aliases.add_alias(&row.form_name, &row.table_name);
        }

        Ok(aliases)
    }

    /// Add or update an alias.
    pub fn add_alias(&mut self, form_name: &str, table_name: &str) {
        self.aliases
            .insert(form_name.to_string(), table_name.to_string());
    }

    /// Table name for a form name.
    pub fn resolve<'a>(&'a self, form_name: &'a str) -> &'a str {
        self.aliases
            .get(form_name)
            .map(String::as_str)
            .unwrap_or(form_name)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
