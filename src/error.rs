use thiserror::Error;

#[derive(Error, Debug)]
pub enum BloomcamError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    #[error("Detector bootstrap failed: {message}")]
    Bootstrap { message: String },

    #[error("Camera unavailable: {message}")]
    Camera { message: String },

    #[error("Detection failed: {message}")]
    Detection { message: String },

    #[error("Audio playback refused: {message}")]
    Audio { message: String },

    #[error("System error: {message}")]
    System { message: String },

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

impl BloomcamError {
    pub fn bootstrap<S: Into<String>>(message: S) -> Self {
        Self::Bootstrap {
            message: message.into(),
        }
    }

    pub fn camera<S: Into<String>>(message: S) -> Self {
        Self::Camera {
            message: message.into(),
        }
    }

    pub fn detection<S: Into<String>>(message: S) -> Self {
        Self::Detection {
            message: message.into(),
        }
    }

    pub fn audio<S: Into<String>>(message: S) -> Self {
        Self::Audio {
            message: message.into(),
        }
    }

    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn component<S: Into<String>>(component: S, message: S) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether this error is fatal to the whole feature rather than a
    /// transient per-tick or soft audio condition.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            BloomcamError::Detection { .. } | BloomcamError::Audio { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BloomcamError>;
