use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("JSON error: {0}")]
    Json(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("Unknown component type '{component_type}'")]
    UnknownComponentType { component_type: String },

    #[error("Invalid props for {component_type} '{id}': {reason}")]
    InvalidProps {
        id: String,
        component_type: String,
        reason: String,
    },

    #[error("Props for component '{id}' must be a JSON object")]
    PropsNotObject { id: String },
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for ModelError {
    fn from(err: serde_yaml::Error) -> Self {
        ModelError::Yaml(err.to_string())
    }
}
