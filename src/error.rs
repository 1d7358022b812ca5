use thiserror::Error;

/// Errors returned by the analysis engine.
///
/// An empty category filter is deliberately *not* in this taxonomy: it
/// degrades to empty outputs (empty label set, zero-node graph, empty
/// summary tables) rather than failing.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A configuration value is outside its valid range.
    #[error("invalid config: {name} {message} (got {value})")]
    InvalidConfig {
        /// Parameter name.
        name: &'static str,
        /// Human-readable constraint.
        message: &'static str,
        /// The offending value, rendered.
        value: String,
    },

    /// An incident with unusable coordinates or timestamp reached the
    /// engine. Cleaning is the loader's responsibility, so this means an
    /// upstream contract violation; we fail loudly instead of silently
    /// corrupting distances and centroids.
    #[error("malformed record {case_number}: {message}")]
    MalformedRecord {
        /// Case identifier of the offending incident.
        case_number: String,
        /// What was wrong with it.
        message: &'static str,
    },
}

/// Result type used by the analysis engine.
pub type Result<T> = std::result::Result<T, AnalysisError>;
