#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read hospital directory: {0}")]
    DirectoryRead(std::io::Error),
    #[error("failed to deserialize hospital directory: {0}")]
    DirectoryDeserialization(serde_yaml::Error),
    #[error("duplicate hospital id in directory: {0}")]
    DuplicateHospital(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
