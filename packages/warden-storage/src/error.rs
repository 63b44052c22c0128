pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Store unavailable: {source}")]
	Unavailable { source: sqlx::Error },
	#[error("Query failed: {source}")]
	Query { source: sqlx::Error },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Query { source: err }
	}
}
