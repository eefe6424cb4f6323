#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Data directory not found")]
    NoDataDir,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed upload: {0}")]
    MalformedUpload(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unsupported image '{0}', expected jpg, jpeg or png")]
    UnsupportedImage(String),

    #[error("Could not read image '{path}': {reason}")]
    ImageDecode { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
