use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template '{template}' declares an empty candidate list for parameter '{parameter}'")]
    EmptyGrid {
        template: String,
        parameter: String,
    },
}
