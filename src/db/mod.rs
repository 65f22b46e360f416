pub mod error;
pub mod users;

pub use error::DbError;
pub use users::UserDbClient;

/// Collapses the result of an id-keyed statement: no rows is `None`, one row
/// is the value, anything more means the key is not unique in the store.
pub(crate) fn at_most_one<T>(id: &str, mut rows: Vec<T>) -> Result<Option<T>, DbError> {
    match rows.len() {
        0 | 1 => Ok(rows.pop()),
        count => {
            tracing::error!("Id-keyed lookup for {id} matched {count} rows");
            Err(DbError::MultipleRows {
                id: id.to_string(),
                count,
            })
        }
    }
}
