//! Local disk storage for uploaded product images.

use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use tokio::fs;

pub struct LocalStore {
    root: PathBuf,
    public_base: String,
}

impl LocalStore {
    pub fn new(root: PathBuf, public_base: String) -> Self {
        Self { root, public_base }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reduce a client-supplied name to a bare file name. Anything that
    /// would escape the upload directory comes back as `None`.
    pub fn sanitize(name: &str) -> Option<String> {
        let file = Path::new(name).file_name()?.to_str()?;
        if file.is_empty() || file == "." || file == ".." {
            return None;
        }
        Some(file.to_string())
    }

    pub async fn save(&self, filename: &str, body: Bytes) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .context("create upload dir")?;
        let path = self.root.join(filename);
        fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Delete a stored file; `Ok(false)` when it was not there.
    pub async fn delete(&self, name: &str) -> anyhow::Result<bool> {
        let Some(file) = Self::sanitize(name) else {
            return Ok(false);
        };
        let path = self.root.join(file);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }

    pub fn relative_path(&self, filename: &str) -> String {
        format!("/uploads/products/{filename}")
    }

    pub fn public_url(&self, relative: &str) -> String {
        format!("{}{}", self.public_base.trim_end_matches('/'), relative)
    }
}
