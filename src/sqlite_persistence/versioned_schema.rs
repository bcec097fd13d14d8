use anyhow::{bail, Result};
use rusqlite::{params, Connection};

/// Offset added to schema versions before writing `PRAGMA user_version`, so a
/// database never touched by this crate (user_version = 0) is recognizable.
pub const BASE_DB_VERSION: usize = 99999;

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Only mutated when optional field assignments are passed in
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                default_value: None,
                check: None,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
        }
    }

    fn from_sql(s: &str) -> Option<&'static SqlType> {
        match s {
            "TEXT" => Some(&SqlType::Text),
            "INTEGER" => Some(&SqlType::Integer),
            "REAL" => Some(&SqlType::Real),
            _ => None,
        }
    }
}

#[allow(unused)]
pub enum ForeignKeyOnChange {
    NoAction,
    Restrict,
    Cascade,
}

impl ForeignKeyOnChange {
    fn as_sql(&self) -> &'static str {
        match self {
            ForeignKeyOnChange::NoAction => "NO ACTION",
            ForeignKeyOnChange::Restrict => "RESTRICT",
            ForeignKeyOnChange::Cascade => "CASCADE",
        }
    }
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
    pub on_delete: ForeignKeyOnChange,
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub default_value: Option<&'static str>,
    /// Raw SQL expression placed inside `CHECK (...)`.
    pub check: Option<&'static str>,
    pub foreign_key: Option<&'static ForeignKey>,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub indices: &'static [(&'static str, &'static str)],
    pub unique_constraints: &'static [&'static [&'static str]],
}

impl Table {
    fn create_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let mut sql = format!("{} {}", column.name, column.sql_type.as_sql());
                if column.is_primary_key {
                    sql.push_str(" PRIMARY KEY");
                }
                if column.non_null {
                    sql.push_str(" NOT NULL");
                }
                if let Some(default_value) = column.default_value {
                    sql.push_str(&format!(" DEFAULT {}", default_value));
                }
                if let Some(check) = column.check {
                    sql.push_str(&format!(" CHECK ({})", check));
                }
                if let Some(fk) = column.foreign_key {
                    sql.push_str(&format!(
                        " REFERENCES {}({}) ON DELETE {}",
                        fk.foreign_table,
                        fk.foreign_column,
                        fk.on_delete.as_sql()
                    ));
                }
                sql
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("CREATE TABLE {} ({}", self.name, columns);
        for unique_constraint in self.unique_constraints {
            sql.push_str(&format!(", UNIQUE ({})", unique_constraint.join(", ")));
        }
        sql.push_str(");");
        sql
    }

    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute(&self.create_sql(), params![])?;
        for (index_name, column_name) in self.indices {
            conn.execute(
                &format!(
                    "CREATE INDEX {} ON {}({});",
                    index_name, self.name, column_name
                ),
                params![],
            )?;
        }
        Ok(())
    }

    fn validate_columns(&self, conn: &Connection) -> Result<()> {
        struct ActualColumn {
            name: String,
            sql_type: String,
            non_null: bool,
            default_value: Option<String>,
            is_primary_key: bool,
        }

        let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", self.name))?;
        let actual: Vec<ActualColumn> = stmt
            .query_map([], |row| {
                Ok(ActualColumn {
                    name: row.get(1)?,
                    sql_type: row.get(2)?,
                    non_null: row.get::<_, i32>(3)? == 1,
                    default_value: row.get(4)?,
                    is_primary_key: row.get::<_, i32>(5)? == 1,
                })
            })?
            .collect::<Result<_, _>>()?;

        if actual.len() != self.columns.len() {
            bail!(
                "Table {} has {} columns, expected {}. Found: [{}], expected: [{}]",
                self.name,
                actual.len(),
                self.columns.len(),
                actual
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                self.columns
                    .iter()
                    .map(|c| c.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        for (actual, expected) in actual.iter().zip(self.columns.iter()) {
            if actual.name != expected.name {
                bail!(
                    "Table {} column name mismatch: expected {}, got {}",
                    self.name,
                    expected.name,
                    actual.name
                );
            }
            if SqlType::from_sql(&actual.sql_type) != Some(expected.sql_type) {
                bail!(
                    "Table {} column {} type mismatch: expected {:?}, got {}",
                    self.name,
                    expected.name,
                    expected.sql_type,
                    actual.sql_type
                );
            }
            if actual.non_null != expected.non_null {
                bail!(
                    "Table {} column {} non-null mismatch: expected {}, got {}",
                    self.name,
                    expected.name,
                    expected.non_null,
                    actual.non_null
                );
            }
            // SQLite may report defaults wrapped in parentheses
            if actual.default_value.as_deref().map(strip_parentheses)
                != expected.default_value.map(strip_parentheses)
            {
                bail!(
                    "Table {} column {} default value mismatch: expected {:?}, got {:?}",
                    self.name,
                    expected.name,
                    expected.default_value,
                    actual.default_value
                );
            }
            if actual.is_primary_key != expected.is_primary_key {
                bail!(
                    "Table {} column {} primary key mismatch: expected {}, got {}",
                    self.name,
                    expected.name,
                    expected.is_primary_key,
                    actual.is_primary_key
                );
            }
        }
        Ok(())
    }

    fn validate_indices(&self, conn: &Connection) -> Result<()> {
        for (index_name, _) in self.indices {
            let exists = conn
                .query_row(
                    "SELECT 1 FROM sqlite_master WHERE type='index' AND name=?1 AND tbl_name=?2",
                    params![index_name, self.name],
                    |_| Ok(()),
                )
                .is_ok();
            if !exists {
                bail!("Table {} is missing index '{}'", self.name, index_name);
            }
        }

        if self.unique_constraints.is_empty() {
            return Ok(());
        }

        let mut stmt = conn.prepare(&format!("PRAGMA index_list({})", self.name))?;
        let unique_indices: Vec<String> = stmt
            .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i32>(2)?)))?
            .filter_map(|r| r.ok())
            .filter(|(_, unique)| *unique == 1)
            .map(|(name, _)| name)
            .collect();

        let mut unique_column_sets: Vec<Vec<String>> = Vec::with_capacity(unique_indices.len());
        for index_name in &unique_indices {
            let mut stmt = conn.prepare(&format!("PRAGMA index_info({})", index_name))?;
            let mut columns: Vec<String> = stmt
                .query_map([], |row| row.get::<_, String>(2))?
                .filter_map(|r| r.ok())
                .collect();
            columns.sort();
            unique_column_sets.push(columns);
        }

        for expected in self.unique_constraints {
            let mut expected_sorted: Vec<&str> = expected.to_vec();
            expected_sorted.sort();
            let found = unique_column_sets
                .iter()
                .any(|actual| actual.iter().map(String::as_str).eq(expected_sorted.iter().copied()));
            if !found {
                bail!(
                    "Table {} is missing unique constraint on columns ({})",
                    self.name,
                    expected.join(", ")
                );
            }
        }
        Ok(())
    }

    fn validate_foreign_keys(&self, conn: &Connection) -> Result<()> {
        // PRAGMA foreign_key_list: id, seq, table, from, to, on_update, on_delete, match
        let mut stmt = conn.prepare(&format!("PRAGMA foreign_key_list({})", self.name))?;
        let actual: Vec<(String, String, String, String)> = stmt
            .query_map([], |row| Ok((row.get(3)?, row.get(2)?, row.get(4)?, row.get(6)?)))?
            .filter_map(|r| r.ok())
            .collect();

        for column in self.columns {
            let Some(expected) = column.foreign_key else {
                continue;
            };
            let on_delete = expected.on_delete.as_sql();
            let matching = actual.iter().find(|(from, _, _, _)| from == column.name);
            match matching {
                Some((_, table, to, actual_on_delete))
                    if table == expected.foreign_table
                        && to == expected.foreign_column
                        && actual_on_delete == on_delete => {}
                Some((_, table, to, actual_on_delete)) => bail!(
                    "Table {} column {} has foreign key mismatch: expected REFERENCES {}({}) ON DELETE {}, got REFERENCES {}({}) ON DELETE {}",
                    self.name,
                    column.name,
                    expected.foreign_table,
                    expected.foreign_column,
                    on_delete,
                    table,
                    to,
                    actual_on_delete
                ),
                None => bail!(
                    "Table {} column {} is missing foreign key: expected REFERENCES {}({}) ON DELETE {}",
                    self.name,
                    column.name,
                    expected.foreign_table,
                    expected.foreign_column,
                    on_delete
                ),
            }
        }
        Ok(())
    }
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
    pub migration: Option<fn(&Connection) -> Result<()>>,
}

fn strip_parentheses(s: &str) -> &str {
    s.strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(s)
}

impl VersionedSchema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.create(conn)?;
        }
        conn.pragma_update(None, "user_version", BASE_DB_VERSION + self.version)?;
        Ok(())
    }

    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.validate_columns(conn)?;
            table.validate_indices(conn)?;
            table.validate_foreign_keys(conn)?;
        }
        Ok(())
    }
}
