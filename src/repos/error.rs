/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - 制約違反 (unique / foreign key) は Conflict として返す
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(&'static str),
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e {
            match dbe.code().as_deref() {
                Some("23505") => return RepoError::Conflict("record already exists"),
                Some("23503") => return RepoError::Conflict("organization does not exist"),
                _ => {}
            }
        }
        RepoError::Db(e)
    }
}
