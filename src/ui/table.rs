use tabled::{settings::Style, Table, Tabled};
use crate::entry::LocalizedString;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
pub struct StringRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Found")]
    pub found: &'static str,
}

/// Table of resolved strings, missing ones marked
pub struct StringsTable {
    rows: Vec<StringRow>,
}

impl StringsTable {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add(&mut self, string: &LocalizedString) {
        self.rows.push(StringRow {
            key: string.name.clone(),
            value: string.value.clone(),
            found: if string.found { "yes" } else { "no" },
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for StringsTable {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let rows: Vec<TableRow> = stats
        .iter()
        .map(|(label, value)| TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        })
        .collect();

    if rows.is_empty() {
        return String::new();
    }

    Table::new(&rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings_table_marks_missing() {
        let mut table = StringsTable::new();
        table.add(&LocalizedString::new("Hello", "你好", true));
        table.add(&LocalizedString::new("Bye", "Bye", false));

        let rendered = table.build();
        assert_eq!(table.len(), 2);
        assert!(rendered.contains("你好"));
        assert!(rendered.contains("no"));
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        assert!(StringsTable::new().build().is_empty());
        assert!(stats_table(&[]).is_empty());
    }
}
