use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MetricError {
    #[error("counter '{field}' is not a number: {raw:?}")]
    NotNumeric { field: &'static str, raw: String },

    #[error("counter '{field}' is negative: {raw:?}")]
    Negative { field: &'static str, raw: String },

    #[error("unrecognised date: {raw:?}")]
    InvalidDate { raw: String },
}
