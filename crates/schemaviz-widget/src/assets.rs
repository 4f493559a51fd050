//! Attachment point for the front end bundle.
//!
//! The diagram renderer is built separately and dropped into a directory as
//! `index.js` (an ES module exporting `render({ model, el })`) and
//! `index.css`. Only those two names are ever served.

use std::path::PathBuf;

use crate::error::{Result, WidgetError};

pub const ESM_FILE: &str = "index.js";
pub const CSS_FILE: &str = "index.css";

#[derive(Debug, Clone)]
pub struct FrontendAssets {
    dir: PathBuf,
}

/// A loaded asset with its content type.
#[derive(Debug, Clone)]
pub struct Asset {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FrontendAssets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn esm_path(&self) -> PathBuf {
        self.dir.join(ESM_FILE)
    }

    /// Whether the renderer bundle is present.
    pub fn is_built(&self) -> bool {
        self.esm_path().is_file()
    }

    /// Load one of the bundle files by name.
    pub async fn load(&self, name: &str) -> Result<Asset> {
        if name != ESM_FILE && name != CSS_FILE {
            return Err(WidgetError::AssetNotFound(name.to_string()));
        }

        let path = self.dir.join(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(WidgetError::AssetNotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let content_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .to_string();

        Ok(Asset {
            content_type,
            bytes,
        })
    }
}

impl Default for FrontendAssets {
    fn default() -> Self {
        Self::new("static")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_bundle_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ESM_FILE), "export default {};").unwrap();
        let assets = FrontendAssets::new(dir.path());

        assert!(assets.is_built());
        let esm = assets.load(ESM_FILE).await.unwrap();
        assert!(esm.content_type.contains("javascript"));
        assert_eq!(esm.bytes, b"export default {};");

        assert!(matches!(
            assets.load(CSS_FILE).await,
            Err(WidgetError::AssetNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_only_bundle_names_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("secret.txt"), "x").unwrap();
        let assets = FrontendAssets::new(dir.path());

        assert!(matches!(
            assets.load("secret.txt").await,
            Err(WidgetError::AssetNotFound(_))
        ));
        assert!(matches!(
            assets.load("../index.js").await,
            Err(WidgetError::AssetNotFound(_))
        ));
    }
}
