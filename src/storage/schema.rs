//! Database schema definitions

/// SQL to create the localization records table
pub const CREATE_RECORDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS localization_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    resource_culture TEXT NOT NULL,
    resource_name TEXT NOT NULL,
    content_key TEXT NOT NULL,
    localized_content TEXT
)
"#;

/// SQL to create indexes
/// The unique index is what makes racing auto-create inserts safe
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_records_identity ON localization_records(resource_name, resource_culture, content_key)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_RECORDS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
