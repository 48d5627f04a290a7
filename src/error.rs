use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    /// The denominator of a rate is zero, e.g. the symbol of interest never occurs.
    #[error("undefined rate '{metric}': {message}")]
    UndefinedRate {
        metric: &'static str,
        message: String,
    },
    /// Label filtering removed every token from every hypothesis.
    #[error("every hypothesis is empty after label filtering ({utterances} utterances)")]
    EmptyAfterFilter { utterances: usize },
}

impl EvalError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn undefined_rate(metric: &'static str, message: impl Into<String>) -> Self {
        Self::UndefinedRate {
            metric,
            message: message.into(),
        }
    }
}
