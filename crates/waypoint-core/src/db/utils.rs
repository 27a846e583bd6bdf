//! Row decoding helpers and path handling shared by the query modules.

use std::{
    env::current_dir,
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use jiff::Timestamp;
use rusqlite::{types::Type, Row};
use uuid::Uuid;

use crate::error::{PlannerError, Result};

/// Generates a fresh entity or edge identifier.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Reads a required RFC 3339 timestamp column.
pub(crate) fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(idx)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Reads a nullable RFC 3339 timestamp column.
pub(crate) fn optional_timestamp_column(
    row: &Row,
    idx: usize,
) -> rusqlite::Result<Option<Timestamp>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| {
            s.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

/// Reads a text column holding one of our closed enum values.
pub(crate) fn enum_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let value: String = row.get(idx)?;
    value
        .parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

/// Normalizes a path by resolving "." and ".." components without requiring
/// the path to exist
fn normalize_path(path: &Path) -> PathBuf {
    path.components()
        .fold(PathBuf::new(), |mut acc, component| match component {
            Component::CurDir => acc,
            Component::ParentDir => {
                acc.pop();
                acc
            }
            _ => {
                acc.push(component);
                acc
            }
        })
}

/// Ensures a plan directory is absolute, resolving relative paths against
/// the current working directory. `None` stays `None`.
pub(crate) fn ensure_absolute_directory(directory: Option<&str>) -> Result<Option<String>> {
    let Some(dir) = directory else {
        return Ok(None);
    };

    let path = Path::new(dir);
    if path.is_absolute() {
        return Ok(Some(normalize_path(path).to_string_lossy().into_owned()));
    }

    let cwd = current_dir().map_err(|_| {
        PlannerError::invalid_input("directory")
            .with_reason("Cannot resolve current working directory to make path absolute")
    })?;
    Ok(Some(
        normalize_path(&cwd.join(path)).to_string_lossy().into_owned(),
    ))
}
