use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid roster for team `{team}`: {reason}")]
    InvalidRoster { team: String, reason: String },

    #[error("weapon `{0}` is versatile but carries no physical damage die")]
    VersatileWithoutPhysicalDie(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("roster file error: {0}")]
    RosterParseError(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
