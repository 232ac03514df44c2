use std::path::PathBuf;
use thiserror::Error;

/// Return the default path of the file in which persisted key-value data
/// (e.g., the best score) is stored
pub fn scores_file_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("snake-engine").join("scores.json"))
}

#[derive(Debug, Error)]
#[error("failed to save {what}")]
pub struct SaveError {
    what: &'static str,
    #[source]
    source: SaveErrorSource,
}

impl SaveError {
    pub fn no_path(what: &'static str) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::NoPath,
        }
    }

    pub(crate) fn existing(what: &'static str, e: LoadError) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Existing(e),
        }
    }

    pub(crate) fn mkdir(what: &'static str, e: std::io::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Mkdir(e),
        }
    }

    pub(crate) fn serialize(what: &'static str, e: serde_json::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Serialize(e),
        }
    }

    pub(crate) fn write(what: &'static str, e: std::io::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Write(e),
        }
    }

    /// The kind of data that failed to save
    pub fn what(&self) -> &'static str {
        self.what
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to read existing data")]
    Existing(#[source] LoadError),
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize data")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write file")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("failed to load {what}")]
pub struct LoadError {
    what: &'static str,
    #[source]
    source: LoadErrorSource,
}

impl LoadError {
    pub fn no_path(what: &'static str) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::NoPath,
        }
    }

    pub(crate) fn read(what: &'static str, e: std::io::Error) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::Read(e),
        }
    }

    pub(crate) fn deserialize(what: &'static str, e: serde_json::Error) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::Deserialize(e),
        }
    }

    pub(crate) fn parse(what: &'static str, value: String) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::Parse(value),
        }
    }

    /// The kind of data that failed to load
    pub fn what(&self) -> &'static str {
        self.what
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to read file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize data")]
    Deserialize(#[source] serde_json::Error),
    #[error("invalid stored value {0:?}")]
    Parse(String),
}

/// Render an error and its chain of sources as a single line
pub fn error_chain(e: &dyn std::error::Error) -> String {
    let mut s = e.to_string();
    let mut source = e.source();
    while let Some(src) = source {
        s.push_str(": ");
        s.push_str(&src.to_string());
        source = src.source();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_includes_sources() {
        let e = LoadError::parse("best score", String::from("many"));
        assert_eq!(
            error_chain(&e),
            r#"failed to load best score: invalid stored value "many""#
        );
    }

    #[test]
    fn chain_of_io_error() {
        let e = SaveError::write(
            "best score",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert_eq!(
            error_chain(&e),
            "failed to save best score: failed to write file: nope"
        );
        assert_eq!(e.what(), "best score");
    }
}
