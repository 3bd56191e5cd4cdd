pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Failed to fetch {resource} ({status}).")]
	Status { resource: &'static str, status: u16 },
	#[error("Invalid catalog URL: {message}")]
	InvalidUrl { message: String },
	#[error("{message}")]
	InvalidConfig { message: String },
}
