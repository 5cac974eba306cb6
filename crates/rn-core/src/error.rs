use thiserror::Error;

pub type RnResult<T> = Result<T, RnError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RnError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
