//! Output tree layout and result sinks
//!
//! Everything the crawl produces lands under one configured directory:
//! typed media subdirectories, saved pages, and the two top-level text
//! sinks for findings and email addresses.

mod sink;

pub use sink::{Finding, ResultSink};

use crate::config::{
    SAVE_AUDIO_DIR, SAVE_DOCUMENTS_DIR, SAVE_IMAGES_DIR, SAVE_PAGES_DIR, SAVE_VIDEOS_DIR,
};
use crate::extract::MediaKind;
use std::path::{Path, PathBuf};

/// The fixed directory layout rooted at the configured output directory
#[derive(Debug, Clone)]
pub struct OutputTree {
    pub root: PathBuf,
    pub pages: PathBuf,
    pub images: PathBuf,
    pub videos: PathBuf,
    pub audio: PathBuf,
    pub documents: PathBuf,
}

impl OutputTree {
    /// Creates the whole tree on disk, missing parents included.
    pub fn create(root: &Path) -> std::io::Result<Self> {
        let tree = Self {
            root: root.to_path_buf(),
            pages: root.join(SAVE_PAGES_DIR),
            images: root.join(SAVE_IMAGES_DIR),
            videos: root.join(SAVE_VIDEOS_DIR),
            audio: root.join(SAVE_AUDIO_DIR),
            documents: root.join(SAVE_DOCUMENTS_DIR),
        };

        for dir in [
            &tree.root,
            &tree.pages,
            &tree.images,
            &tree.videos,
            &tree.audio,
            &tree.documents,
        ] {
            std::fs::create_dir_all(dir)?;
        }

        Ok(tree)
    }

    /// Returns the directory where content of the given kind belongs;
    /// unclassified content goes to the tree root.
    pub fn dir_for(&self, kind: Option<MediaKind>) -> &Path {
        match kind {
            Some(MediaKind::Image) => &self.images,
            Some(MediaKind::Video) => &self.videos,
            Some(MediaKind::Audio) => &self.audio,
            Some(MediaKind::Document) => &self.documents,
            None => &self.root,
        }
    }
}
