use thiserror::Error;

/// Errors surfaced by network configuration, generation and rendering.
///
/// Bound exhaustion during traversal is not an error: a generation that stops
/// at `limit` or `depth` succeeds with whatever it reached.
#[derive(Debug, Error)]
pub enum NetworkError {
	/// A whitelist or blacklist entry does not compile.
	#[error("invalid pattern `{pattern}`: {source}")]
	InvalidPattern {
		/// The rejected source text.
		pattern: String,
		/// Compilation failure reported by the regex engine.
		#[source]
		source: regex::Error,
	},
	/// Algorithm index outside the registry.
	#[error("no traversal algorithm registered at index {0}")]
	UnknownAlgorithm(usize),
	/// Layout index outside the registry.
	#[error("no layout registered at index {0}")]
	UnknownLayout(usize),
	/// The target stack carries no identifier.
	#[error("target stack has no item names")]
	EmptyTarget,
	/// Reload was requested before any generation.
	#[error("network has not been generated yet")]
	NotGenerated,
	/// The render container could not be found or prepared.
	#[error("cannot bind render surface to `{0}`")]
	RenderBinding(String),
	/// Generation was cancelled before completion.
	#[error("generation cancelled")]
	Cancelled,
	/// Persisted state could not be parsed.
	#[error("malformed network state: {0}")]
	Malformed(#[from] serde_json::Error),
}

/// Result alias used throughout the network module.
pub type Result<T, E = NetworkError> = std::result::Result<T, E>;
