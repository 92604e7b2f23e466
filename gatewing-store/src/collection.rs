use gatewing_core::repository::RepositoryError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// One JSON file holding a whole entity collection.
///
/// Reads load the full collection; writes serialize the full collection to
/// a sibling temp file and rename it into place, so a reader never observes
/// a partially written snapshot.
pub(crate) struct JsonCollection<T> {
    path: PathBuf,
    _marker: std::marker::PhantomData<T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _marker: std::marker::PhantomData,
        }
    }

    pub(crate) async fn load(&self) -> Result<Vec<T>, RepositoryError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path).await?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    pub(crate) async fn save(&self, items: &[T]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
