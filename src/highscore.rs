use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage for the best score ever achieved, as a single JSON integer in a
/// file.  If the file can't be used, the store is switched off and the high
/// score only lives in memory for the rest of the session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HighScoreStore {
    path: Option<PathBuf>,
}

impl HighScoreStore {
    pub(crate) fn new(path: PathBuf) -> HighScoreStore {
        HighScoreStore { path: Some(path) }
    }

    /// A store that never touches the disk
    pub(crate) fn in_memory() -> HighScoreStore {
        HighScoreStore { path: None }
    }

    /// The default high score file path
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("gridsnake").join("highscore.json"))
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    /// Stop reading from & writing to disk
    pub(crate) fn disable(&mut self) {
        self.path = None;
    }

    /// Read the saved high score.  A missing file (or an in-memory store)
    /// counts as a high score of 0.
    pub(crate) fn load(&self) -> Result<u32, LoadError> {
        let Some(path) = self.path() else {
            return Ok(0);
        };
        let src = match fs_err::read(path) {
            Ok(src) => src,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(LoadError::read(e)),
        };
        serde_json::from_slice(&src).map_err(LoadError::deserialize)
    }

    pub(crate) fn save(&self, score: u32) -> Result<(), SaveError> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string(&score).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(path, &src).map_err(SaveError::write)?;
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("Failed to save high score to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize high score")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write high score to disk")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read high score from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read high score file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize high score")]
    Deserialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_zero() {
        let tmp = tempdir().expect("tempdir should be created");
        let store = HighScoreStore::new(tmp.path().join("nope.json"));
        assert_eq!(store.load().expect("load should succeed"), 0);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempdir().expect("tempdir should be created");
        let path = tmp.path().join("sub").join("dir").join("highscore.json");
        let store = HighScoreStore::new(path.clone());
        store.save(42).expect("save should succeed");
        assert_eq!(
            fs_err::read_to_string(&path).expect("file should exist"),
            "42\n"
        );
        assert_eq!(store.load().expect("load should succeed"), 42);
        store.save(57).expect("save should succeed");
        assert_eq!(store.load().expect("load should succeed"), 57);
    }

    #[test]
    fn corrupt_file() {
        let tmp = tempdir().expect("tempdir should be created");
        let path = tmp.path().join("highscore.json");
        fs_err::write(&path, "{\"score\": \"lots\"}").expect("write should succeed");
        let err = HighScoreStore::new(path).load().unwrap_err();
        assert_eq!(err.to_string(), "Failed to read high score from disk");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("failed to deserialize high score")
        );
    }

    #[test]
    fn negative_score_is_corrupt() {
        let tmp = tempdir().expect("tempdir should be created");
        let path = tmp.path().join("highscore.json");
        fs_err::write(&path, "-3\n").expect("write should succeed");
        assert!(HighScoreStore::new(path).load().is_err());
    }

    #[test]
    fn unwritable_path() {
        let tmp = tempdir().expect("tempdir should be created");
        let blocker = tmp.path().join("blocker");
        fs_err::write(&blocker, "").expect("write should succeed");
        let store = HighScoreStore::new(blocker.join("highscore.json"));
        let err = store.save(3).unwrap_err();
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("failed to create parent directories")
        );
    }

    #[test]
    fn in_memory() {
        let mut store = HighScoreStore::new(PathBuf::from("unused.json"));
        assert!(store.is_persistent());
        store.disable();
        assert!(!store.is_persistent());
        assert_eq!(store, HighScoreStore::in_memory());
        store.save(10).expect("in-memory save should succeed");
        assert_eq!(store.load().expect("in-memory load should succeed"), 0);
    }
}
