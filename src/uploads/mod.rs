use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, AppResult};

/// Directory that receives uploaded files under their client-supplied names.
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    /// Opens the directory, creating it (and any parents) if needed.
    pub async fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` verbatim, replacing any file with the same name.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        let path = self.resolve(filename)?;
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "Stored upload");
        Ok(path)
    }

    fn resolve(&self, filename: &str) -> AppResult<PathBuf> {
        if !is_plain_file_name(filename) {
            return Err(AppError::BadRequest(format!(
                "Invalid file name: {:?}",
                filename
            )));
        }
        Ok(self.root.join(filename))
    }
}

/// A single normal path component: no separators, no `.`/`..`, no NUL.
fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}
