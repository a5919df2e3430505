use mailsift_domain::input::InvalidInput;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
}
impl From<InvalidInput> for Error {
	fn from(_: InvalidInput) -> Self {
		Self::InvalidInput { message: "Text must be a non-empty string.".to_string() }
	}
}

impl From<mailsift_providers::Error> for Error {
	fn from(err: mailsift_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<mailsift_storage::Error> for Error {
	fn from(err: mailsift_storage::Error) -> Self {
		match err {
			mailsift_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			mailsift_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}
