//! Errors for the fallible edges of the app: configuration, routes and DOM access.

/// Failures the app logs and recovers from.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The configuration override is not valid JSON for `AppConfig`.
	#[error("invalid configuration: {0}")]
	Config(#[source] serde_json::Error),
	/// The configured log level has no `log::Level`.
	#[error("unknown log level `{0}`")]
	LogLevel(String),
	/// The URL hash is not a `#!/state/` route.
	#[error("hash `{0}` is not a state route")]
	NotAStateRoute(String),
	/// The route payload is not URL-safe base64.
	#[error("route state is not valid base64: {0}")]
	RouteEncoding(#[from] base64::DecodeError),
	/// The route payload does not decode to a route state.
	#[error("route state is not valid json: {0}")]
	RouteJson(#[source] serde_json::Error),
	/// A browser API call failed or was unavailable.
	#[error("dom access failed: {0}")]
	Dom(String),
}

/// Result alias over [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
