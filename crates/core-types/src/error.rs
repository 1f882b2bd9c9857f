use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown template name: '{0}'")]
    UnknownTemplate(String),

    #[error("Unknown risk profile: '{0}' (expected one of: concentrated, stable, fast)")]
    UnknownRiskProfile(String),
}
