// sqlx::Error -> AppError mapping shared by the three repositories

use uneventful_core::error::AppError;

// SQLite extended result codes: https://www.sqlite.org/rescode.html
const UNIQUE_VIOLATION: &str = "2067";
const PRIMARY_KEY_VIOLATION: &str = "1555";
const FK_VIOLATION: &str = "787";
const FK_VIOLATION_LEGACY: &str = "3850";
const BUSY: &str = "5";
const FULL: &str = "13";

pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            match db_err.code().as_deref() {
                // Unique/PK violations surface as conflicts so callers can
                // answer "already exists" instead of a 500
                Some(UNIQUE_VIOLATION) | Some(PRIMARY_KEY_VIOLATION) => {
                    AppError::Conflict(message)
                }
                Some(FK_VIOLATION) | Some(FK_VIOLATION_LEGACY) => {
                    AppError::Database(format!("Foreign key violation: {}", message))
                }
                Some(BUSY) => AppError::Database(format!("Database locked: {}", message)),
                Some(FULL) => AppError::Database(format!("Database full: {}", message)),
                Some(code) => AppError::Database(format!("[{}] {}", code, message)),
                None => AppError::Database(message),
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => AppError::Database(err.to_string()),
    }
}
