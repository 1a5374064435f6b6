//! Idempotent bootstrap of the `users` table.

use sea_query::{ColumnDef, PostgresQueryBuilder, Table, TableCreateStatement};

use crate::executor::{ExecError, SqlExecutor};
use crate::model::{UserColumn, Users};

/// `CREATE TABLE IF NOT EXISTS users (...)`
#[must_use]
pub fn users_table() -> TableCreateStatement {
    Table::create()
        .table(Users)
        .if_not_exists()
        .col(
            ColumnDef::new(UserColumn::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(UserColumn::Name).text().not_null())
        .col(ColumnDef::new(UserColumn::Email).text().not_null().unique_key())
        .col(ColumnDef::new(UserColumn::Age).integer().not_null())
        .col(ColumnDef::new(UserColumn::Phone).string_len(20).null())
        .col(ColumnDef::new(UserColumn::Active).boolean().not_null().default(true))
        .col(ColumnDef::new(UserColumn::Bio).text().not_null().default(""))
        .col(
            ColumnDef::new(UserColumn::Role)
                .string_len(20)
                .not_null()
                .default("user"),
        )
        .col(ColumnDef::new(UserColumn::Score).double().not_null().default(0.0))
        .to_owned()
}

/// Create the `users` table if it does not exist yet
///
/// # Errors
///
/// Returns `ExecError` when the DDL statement fails.
pub fn ensure_schema(executor: &dyn SqlExecutor) -> Result<(), ExecError> {
    let sql = users_table().build(PostgresQueryBuilder);
    executor.execute(&sql, &[])?;
    log::info!("Schema ready: users");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_table_sql() {
        let sql = users_table().build(PostgresQueryBuilder);
        assert!(sql.starts_with(r#"CREATE TABLE IF NOT EXISTS "users""#), "{sql}");
        assert!(sql.contains(r#""email" text"#), "{sql}");
        assert!(sql.contains("UNIQUE"), "{sql}");
        assert!(sql.contains(r#""phone" varchar(20)"#), "{sql}");
        assert!(sql.contains("DEFAULT 'user'"), "{sql}");
    }
}
