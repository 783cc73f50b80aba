//! Where artifacts live on disk.

use std::path::{Path, PathBuf};

use cspace_build::MazeKey;

/// File extension of every artifact.
pub const EXTENSION: &str = "cspace";

/// Artifact paths for one maze/load combination.
///
/// ```text
/// <root>/<shape>/<size>_<shape>_<geometry>.cspace
/// <root>/<shape>/<size>_<shape>_<geometry>_labeled_erosion_<r>.cspace
/// <root>/<shape>/<size>_<shape>_<geometry>_labeled_erosion_<r>_small.cspace
/// ```
///
/// `"Small Far"` and `"Small Near"` share the `"Small"` files.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use cspace_build::MazeKey;
/// use cspace_core::LoadShape;
/// use cspace_store::ArtifactLayout;
///
/// let key = MazeKey::new("human", "Small Near", LoadShape::H, "MazeDimensions_human");
/// let layout = ArtifactLayout::new("/data", &key);
/// assert_eq!(
///     layout.labels_path(6),
///     Path::new("/data/H/Small_H_MazeDimensions_human_labeled_erosion_6_small.cspace"),
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactLayout {
    dir: PathBuf,
    stem: String,
}

impl ArtifactLayout {
    /// Layout for `key` under `root`.
    pub fn new(root: impl AsRef<Path>, key: &MazeKey) -> Self {
        Self {
            dir: root.as_ref().join(key.shape.code()),
            stem: format!("{}_{}_{}", key.size_stem(), key.shape, key.geometry),
        }
    }

    /// Directory holding every artifact of this key.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Base occupancy and boundary.
    pub fn space_path(&self) -> PathBuf {
        self.file(&self.stem)
    }

    /// Eroded space, regions and labels for `erosion_radius`.
    pub fn labeled_path(&self, erosion_radius: usize) -> PathBuf {
        self.file(&format!("{}_labeled_erosion_{erosion_radius}", self.stem))
    }

    /// Labels alone for `erosion_radius`.
    pub fn labels_path(&self, erosion_radius: usize) -> PathBuf {
        self.file(&format!("{}_labeled_erosion_{erosion_radius}_small", self.stem))
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{EXTENSION}"))
    }
}
