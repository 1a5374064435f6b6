//! Conversion of `sea-query` values into `may_postgres` parameters.
//!
//! Every value is boxed as its own Rust type, `NULL`s included: a
//! `Value::String(None)` binds as `Option<String>`, so Postgres sees a typed
//! `NULL` for the column it is assigned to.

use crate::executor::ExecError;
use may_postgres::types::ToSql;
use sea_query::Value;

/// Convert one value into an owned, bindable parameter
///
/// # Errors
///
/// Returns `ExecError::Other` for value types the store never produces.
pub fn to_param(value: &Value) -> Result<Box<dyn ToSql>, ExecError> {
    let param: Box<dyn ToSql> = match value {
        Value::Bool(v) => Box::new(*v),
        Value::SmallInt(v) => Box::new(*v),
        Value::Int(v) => Box::new(*v),
        Value::BigInt(v) => Box::new(*v),
        Value::Float(v) => Box::new(*v),
        Value::Double(v) => Box::new(*v),
        Value::String(v) => Box::new(v.clone()),
        Value::Bytes(v) => Box::new(v.clone()),
        _ => {
            return Err(ExecError::Other(format!(
                "Unsupported value type in query: {:?}",
                value
            )))
        }
    };
    Ok(param)
}

/// Convert `values` and run `f` with them bound as `$1..$n`
///
/// The converted parameters live for the duration of the closure.
///
/// # Errors
///
/// Returns the conversion error, or whatever `f` returns.
pub fn with_converted_params<F, R>(values: &sea_query::Values, f: F) -> Result<R, ExecError>
where
    F: FnOnce(&[&dyn ToSql]) -> Result<R, ExecError>,
{
    let owned = values
        .iter()
        .map(to_param)
        .collect::<Result<Vec<_>, _>>()?;
    let params: Vec<&dyn ToSql> = owned.iter().map(|p| &**p).collect();
    f(&params)
}
