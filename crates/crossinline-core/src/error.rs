use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid program manifest: {0}")]
    InvalidManifest(String),

    #[error("Unknown declaration: {0}")]
    UnknownDeclaration(String),

    #[error("Unknown compilation unit: {0}")]
    UnknownUnit(String),
}
