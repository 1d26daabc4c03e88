use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error(
        "Invalid feedback ({exact}, {color_only}): both counts must be within 0..={code_length} and their sum may not exceed {code_length}"
    )]
    InvalidFeedback {
        exact: i64,
        color_only: i64,
        code_length: usize,
    },

    #[error("Feedback contradicts every one of the {remaining} remaining candidates")]
    Contradiction { remaining: usize },

    #[error("Expected a code of {expected} colors, found {found}")]
    WrongLength { expected: usize, found: usize },

    #[error("Unknown color \"{color}\". Valid colors are: {valid}")]
    UnknownColor { color: String, valid: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
