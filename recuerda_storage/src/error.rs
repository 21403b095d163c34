use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: i64 },
}
