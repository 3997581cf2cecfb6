//! Error types for configuration, asset loading and level lifecycle

use std::fmt;

/// Misconfiguration detected when settings or objects are set up.
#[derive(Debug)]
pub enum ConfigError {
    /// Max health must be even so the health bar splits into whole hearts.
    OddMaxHealth(i32),
    /// A speed, size or interval that must be strictly positive.
    NonPositive { field: &'static str, value: f32 },
    /// A value outside its allowed range. An infinite `max` means no upper bound.
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    /// Settings file could not be parsed.
    Parse(serde_json::Error),
    /// Settings file could not be read or written.
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OddMaxHealth(v) => {
                write!(f, "max health must be even, got {v}")
            }
            ConfigError::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                if max.is_finite() {
                    write!(f, "{field} must be between {min} and {max}, got {value}")
                } else {
                    write!(f, "{field} must be at least {min}, got {value}")
                }
            }
            ConfigError::Parse(e) => write!(f, "settings parse error: {e}"),
            ConfigError::Io(e) => write!(f, "settings IO error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

/// Failure to resolve or decode a named image.
#[derive(Debug)]
pub enum AssetError {
    /// No asset registered under this name.
    NotFound(String),
    /// The file exists but is not a decodable image.
    Decode { name: String, message: String },
    /// The file could not be read.
    Io {
        name: String,
        source: std::io::Error,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound(name) => write!(f, "asset not found: {name}"),
            AssetError::Decode { name, message } => {
                write!(f, "failed to decode {name}: {message}")
            }
            AssetError::Io { name, source } => write!(f, "failed to read {name}: {source}"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Anything that aborts level startup or a frame.
#[derive(Debug)]
pub enum LevelError {
    Config(ConfigError),
    Asset(AssetError),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Config(e) => write!(f, "configuration error: {e}"),
            LevelError::Asset(e) => write!(f, "asset error: {e}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Config(e) => Some(e),
            LevelError::Asset(e) => Some(e),
        }
    }
}

impl From<ConfigError> for LevelError {
    fn from(e: ConfigError) -> Self {
        LevelError::Config(e)
    }
}

impl From<AssetError> for LevelError {
    fn from(e: AssetError) -> Self {
        LevelError::Asset(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ConfigError::OddMaxHealth(5).to_string(),
            "max health must be even, got 5"
        );
        let damping = ConfigError::OutOfRange {
            field: "player.land_damping",
            value: 1.0,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(
            damping.to_string(),
            "player.land_damping must be between 0 and 1, got 1"
        );
        let err: LevelError = AssetError::NotFound("map.png".into()).into();
        assert_eq!(err.to_string(), "asset error: asset not found: map.png");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err: LevelError = ConfigError::OddMaxHealth(3).into();
        assert!(err.source().is_some());
    }
}
