pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read config file at {path:?}.")]
	ReadConfig { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse config file at {path:?}.")]
	ParseConfig { path: std::path::PathBuf, source: toml::de::Error },
	#[error("{message}")]
	Validation { message: String },
	#[error("Failed to encode the config cache.")]
	EncodeCache { source: serde_json::Error },
	#[error("Failed to write the config cache at {path:?}.")]
	WriteCache { path: std::path::PathBuf, source: std::io::Error },
}
