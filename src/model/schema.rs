//! The relational schema of the service, described as data.
//! `DbManager::ensure_schema` renders it into DDL at startup.

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub constraints: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
}

/// Email subscriptions.
/// `id` is an identity column so values are never handed out twice,
/// the UNIQUE constraint on `email_name` is what settles concurrent inserts.
pub const EMAILS: Table = Table {
    name: "emails",
    columns: &[
        Column {
            name: "id",
            sql_type: "INTEGER",
            constraints: "GENERATED ALWAYS AS IDENTITY PRIMARY KEY",
        },
        Column {
            name: "email_name",
            sql_type: "TEXT",
            constraints: "NOT NULL UNIQUE",
        },
    ],
};

pub const TABLES: &[Table] = &[EMAILS];

impl Table {
    pub fn create_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("{} {} {}", c.name, c.sql_type, c.constraints))
            .collect::<Vec<_>>()
            .join(", ");

        format!("CREATE TABLE IF NOT EXISTS {} ({columns})", self.name)
    }
}
