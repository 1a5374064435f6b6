//! PostgreSQL `UserStore`.
//!
//! Statements are built with `sea-query` and bound through
//! [`with_converted_params`], so every `NULL` is typed for its column.

use may_postgres::error::SqlState;
use sea_query::{Asterisk, Expr, ExprTrait, Order, PostgresQueryBuilder, Query, Values};

use super::{StoreError, UserStore};
use crate::executor::{ExecError, SqlExecutor};
use crate::model::{NewUser, User, UserColumn, Users};
use crate::patch::UpdateMapping;
use crate::pool::PgPool;
use crate::value_conversion::with_converted_params;

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `SELECT ... FROM users WHERE id = $1`
pub fn select_by_id(id: i64) -> (String, Values) {
    Query::select()
        .columns(UserColumn::ALL)
        .from(Users)
        .and_where(Expr::col(UserColumn::Id).eq(id))
        .build(PostgresQueryBuilder)
}

/// `SELECT ... FROM users ORDER BY id`
pub fn select_all() -> (String, Values) {
    Query::select()
        .columns(UserColumn::ALL)
        .from(Users)
        .order_by(UserColumn::Id, Order::Asc)
        .build(PostgresQueryBuilder)
}

/// `INSERT INTO users (...) VALUES (...) RETURNING *`
pub fn insert_user(user: &NewUser) -> (String, Values) {
    let (columns, values): (Vec<_>, Vec<_>) = user.values().into_iter().unzip();
    let mut query = sea_query::InsertStatement::default();
    query.into_table(Users);
    query.columns(columns);
    query.values_panic(values.into_iter().map(Expr::val));
    query.returning_col(Asterisk);
    query.build(PostgresQueryBuilder)
}

/// `UPDATE users SET <mapped columns> WHERE id = $n`
///
/// Only the columns in `mapping` appear in the `SET` list.
pub fn update_user(id: i64, mapping: &UpdateMapping<UserColumn>) -> (String, Values) {
    let mut query = sea_query::UpdateStatement::default();
    query.table(Users);
    for (column, value) in mapping.values() {
        query.value(column, Expr::val(value));
    }
    query.and_where(Expr::col(UserColumn::Id).eq(id));
    query.build(PostgresQueryBuilder)
}

fn parse_row(row: &may_postgres::Row) -> Result<User, StoreError> {
    User::from_row(row)
        .map_err(|e| ExecError::ParseError(format!("Failed to parse user row: {}", e)).into())
}

fn is_unique_violation(err: &ExecError) -> bool {
    matches!(err, ExecError::PostgresError(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION))
}

impl UserStore for PgUserStore {
    fn find_by_id(&self, id: i64) -> Result<User, StoreError> {
        let (sql, values) = select_by_id(id);
        let rows = with_converted_params(&values, |params| self.pool.query_all(&sql, params))?;
        match rows.first() {
            Some(row) => parse_row(row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    fn list(&self) -> Result<Vec<User>, StoreError> {
        let (sql, values) = select_all();
        let rows = with_converted_params(&values, |params| self.pool.query_all(&sql, params))?;
        rows.iter().map(parse_row).collect()
    }

    fn insert(&self, user: &NewUser) -> Result<User, StoreError> {
        let (sql, values) = insert_user(user);
        let row = with_converted_params(&values, |params| self.pool.query_one(&sql, params))
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict(format!("email {} is already registered", user.email))
                } else {
                    StoreError::Exec(e)
                }
            })?;
        parse_row(&row)
    }

    fn update_columns(&self, id: i64, mapping: &UpdateMapping<UserColumn>) -> Result<u64, StoreError> {
        let (sql, values) = update_user(id, mapping);
        let affected = with_converted_params(&values, |params| self.pool.execute(&sql, params))?;
        log::debug!("Updated user {} ({} row(s))", id, affected);
        Ok(affected)
    }
}
