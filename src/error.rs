use crate::io::OutputError;

/// Errors surfaced by the synthesis and playback engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A synthesis input or an octave selection outside its supported range
    InvalidParameter { parameter: &'static str, value: f64 },
    /// The audio output refused or lost a buffer
    Output(OutputError),
}

impl EngineError {
    pub(crate) fn invalid(parameter: &'static str, value: impl Into<f64>) -> Self {
        EngineError::InvalidParameter {
            parameter,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidParameter { parameter, value } => {
                write!(f, "invalid {}: {}", parameter, value)
            }
            EngineError::Output(err) => write!(f, "audio output failed: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Output(err) => Some(err),
            EngineError::InvalidParameter { .. } => None,
        }
    }
}

impl From<OutputError> for EngineError {
    fn from(err: OutputError) -> Self {
        EngineError::Output(err)
    }
}
