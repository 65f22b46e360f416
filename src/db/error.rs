#[derive(Debug)]
pub enum DbError {
    /// Anything the driver or the store reported, passed through as-is.
    Sqlx(sqlx::Error),
    /// An id-keyed statement matched more than one row.
    MultipleRows { id: String, count: usize },
    /// An update carried no fields to set.
    EmptyUpdate { id: String },
    /// Negative offset or limit.
    InvalidPage { offset: i64, limit: i64 },
}

impl DbError {
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::Sqlx(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

impl std::fmt::Display for DbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbError::Sqlx(err) => write!(f, "Database error: {err}"),
            DbError::MultipleRows { id, count } => {
                write!(f, "Expected at most one row for user {id}, found {count}")
            }
            DbError::EmptyUpdate { id } => write!(f, "Update for user {id} sets no fields"),
            DbError::InvalidPage { offset, limit } => {
                write!(f, "Invalid page: offset {offset}, limit {limit}")
            }
        }
    }
}

impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DbError::Sqlx(err) => Some(err),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::Sqlx(err)
    }
}
