use crate::consts;
use crate::util::{error_chain, LoadError, SaveError};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

/// A string-to-string storage provider
pub trait KeyValueStore: fmt::Debug {
    /// Fetch the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<String>, LoadError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
}

/// A [`KeyValueStore`] that lives only as long as the value itself
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryStore(HashMap<String, String>);

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, LoadError> {
        Ok(self.0.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.0.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// A [`KeyValueStore`] backed by a JSON file containing a single object that
/// maps keys to string values.  A file that does not exist is treated as
/// empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    const WHAT: &'static str = "stored data";

    pub fn new<P: Into<PathBuf>>(path: P) -> FileStore {
        FileStore { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, LoadError> {
        let src = match fs_err::read(&self.path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(LoadError::read(Self::WHAT, e)),
        };
        serde_json::from_slice(&src).map_err(|e| LoadError::deserialize(Self::WHAT, e))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, LoadError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        let mut data = self
            .read_all()
            .map_err(|e| SaveError::existing(Self::WHAT, e))?;
        data.insert(key.to_owned(), value.to_owned());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(|e| SaveError::mkdir(Self::WHAT, e))?;
        }
        let mut src =
            serde_json::to_string_pretty(&data).map_err(|e| SaveError::serialize(Self::WHAT, e))?;
        src.push('\n');
        fs_err::write(&self.path, &src).map_err(|e| SaveError::write(Self::WHAT, e))?;
        Ok(())
    }
}

/// Keeps track of the best score, persisting it through a [`KeyValueStore`]
/// when one is available.
///
/// Storage failures are never fatal: the first failure is logged, the backend
/// is dropped, and the best score is kept in memory from then on.
#[derive(Debug)]
pub struct ScoreStore {
    backend: Option<Box<dyn KeyValueStore>>,
    key: String,
    best: u32,
}

impl ScoreStore {
    const WHAT: &'static str = "best score";

    /// Create a store that persists to `backend` and load the best score from
    /// it
    pub fn open(backend: Box<dyn KeyValueStore>) -> ScoreStore {
        ScoreStore::open_with_key(backend, consts::BEST_SCORE_KEY)
    }

    pub fn open_with_key<K: Into<String>>(backend: Box<dyn KeyValueStore>, key: K) -> ScoreStore {
        let mut store = ScoreStore {
            backend: Some(backend),
            key: key.into(),
            best: 0,
        };
        store.load();
        store
    }

    /// Create a store that does not persist anything
    pub fn in_memory() -> ScoreStore {
        ScoreStore {
            backend: None,
            key: String::from(consts::BEST_SCORE_KEY),
            best: 0,
        }
    }

    /// Read the best score from the backend, defaulting to 0 if nothing has
    /// been stored yet.  Without a backend, the in-memory value is returned.
    pub fn load(&mut self) -> u32 {
        let Some(backend) = self.backend.as_ref() else {
            return self.best;
        };
        let r = backend.get_item(&self.key).and_then(|value| match value {
            Some(s) => s
                .trim()
                .parse::<u32>()
                .map_err(|_| LoadError::parse(Self::WHAT, s)),
            None => Ok(0),
        });
        match r {
            Ok(best) => self.best = best,
            Err(e) => self.degrade(&e),
        }
        self.best
    }

    /// Record `value` as the best score.  It is the caller's responsibility to
    /// only call this with a value greater than [`ScoreStore::best()`].
    pub fn save(&mut self, value: u32) {
        self.best = value;
        if let Some(backend) = self.backend.as_mut() {
            if let Err(e) = backend.set_item(&self.key, &value.to_string()) {
                self.degrade(&e);
            }
        }
    }

    /// Return the best score seen so far
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Is the best score being written to a backend?
    pub fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    fn degrade(&mut self, e: &dyn std::error::Error) {
        tracing::warn!(
            error = %error_chain(e),
            "Best score storage unavailable; keeping best score in memory only"
        );
        self.backend = None;
    }
}
