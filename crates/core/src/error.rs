use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
  #[error("Scenario: {0}")]
  Scenario(String),

  #[error("Config: {0}")]
  Config(String),

  #[error("TOML parse error: {0}")]
  Toml(#[from] toml::de::Error),

  #[error("IO: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
