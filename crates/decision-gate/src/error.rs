use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    /// An input report is structurally invalid. The message names the
    /// offending document and, through serde, the missing or malformed field.
    #[error("Invalid {report} report: {source}")]
    InvalidReport {
        report: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
