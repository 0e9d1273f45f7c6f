//! Avatar byte sources.

use crate::model::ImageError;
use std::path::{Path, PathBuf};

/// Produces raw (still encoded) avatar bytes for a URL.
///
/// Called from background threads by the image cache; implementations may block.
pub trait AvatarSource: Send + Sync + 'static {
    /// # Errors
    ///
    /// Returns [`ImageError::Source`] when no bytes are available for `url`.
    fn load(&self, url: &str) -> Result<Vec<u8>, ImageError>;
}

impl<F> AvatarSource for F
where
    F: Fn(&str) -> Result<Vec<u8>, ImageError> + Send + Sync + 'static,
{
    fn load(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        self(url)
    }
}

/// Resolves avatar URLs to files in a local directory.
///
/// `https://cdn.example/u/42/avatar.png?size=64` maps to `<dir>/avatar.png`.
#[derive(Debug, Clone)]
pub struct DirectoryAvatarSource {
    dir: PathBuf,
}

impl DirectoryAvatarSource {
    /// Source reading files from `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Local file for `url`, or `None` if the URL has no usable final segment.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let name = path.rsplit('/').find(|segment| !segment.is_empty())?;
        if name == ".." || name == "." || name.contains(':') {
            return None;
        }
        Some(self.dir.join(name))
    }
}

impl AvatarSource for DirectoryAvatarSource {
    fn load(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let path = self.resolve(url).ok_or_else(|| ImageError::Source {
            url: url.to_string(),
            reason: "URL has no file name".to_string(),
        })?;

        std::fs::read(&path).map_err(|err| ImageError::Source {
            url: url.to_string(),
            reason: format!("{}: {}", path.display(), err),
        })
    }
}
