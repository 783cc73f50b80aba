//! Selection of canonical regions from the eroded free space.

use std::error::Error;
use std::fmt;

use cspace_build::ConfigError;
use cspace_core::RegionName;
use cspace_morph::{label_components, Component, MorphError};
use cspace_space::{BoolGrid, GridSpace, ThetaFace};

use crate::region::Region;

// ── SegmentConfig ──────────────────────────────────────────────────

/// Parameters of region selection.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentConfig {
    /// Number of regions kept after dropping the background. Default: 10.
    pub regions_to_keep: usize,
    /// Largest centroid x difference (maze units) for two seam halves to
    /// be re-joined. Default: 0.1.
    pub seam_merge_tolerance: f64,
    /// Components smaller than this are ignored entirely. Default: 1.
    pub min_component_voxels: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            regions_to_keep: 10,
            seam_merge_tolerance: 0.1,
            min_component_voxels: 1,
        }
    }
}

impl SegmentConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=RegionName::MAX_COUNT).contains(&self.regions_to_keep) {
            return Err(ConfigError::InvalidParameter {
                name: "regions_to_keep",
                reason: format!(
                    "must be in 1..={}, got {}",
                    RegionName::MAX_COUNT,
                    self.regions_to_keep
                ),
            });
        }
        if !(self.seam_merge_tolerance.is_finite() && self.seam_merge_tolerance >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "seam_merge_tolerance",
                reason: format!(
                    "must be finite and non-negative, got {}",
                    self.seam_merge_tolerance
                ),
            });
        }
        if self.min_component_voxels == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "min_component_voxels",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

// ── SegmentError ───────────────────────────────────────────────────

/// Errors from region selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// Fewer candidate components than regions requested.
    TooFewComponents {
        /// Candidates left after dropping the background.
        found: usize,
        /// Configured `regions_to_keep`.
        required: usize,
    },
    /// Labeling failed, e.g. on a grid/space shape mismatch.
    Morph(MorphError),
    /// The segment configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewComponents { found, required } => write!(
                f,
                "found {found} candidate components besides the background, need {required}"
            ),
            Self::Morph(e) => write!(f, "component labeling: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for SegmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Morph(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::TooFewComponents { .. } => None,
        }
    }
}

impl From<MorphError> for SegmentError {
    fn from(e: MorphError) -> Self {
        Self::Morph(e)
    }
}

impl From<ConfigError> for SegmentError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<cspace_space::SpaceError> for SegmentError {
    fn from(e: cspace_space::SpaceError) -> Self {
        Self::Morph(MorphError::Space(e))
    }
}

// ── ComponentSegmenter ─────────────────────────────────────────────

/// Turns an eroded free space into named canonical regions.
///
/// The largest component is the open background and is dropped. Of the
/// rest, the `regions_to_keep` largest survive. A survivor touching only
/// one θ face is folded into an earlier survivor touching only the other
/// face when their centroid x coordinates are within
/// `seam_merge_tolerance`. Survivors are named `a`, `b`, ... in discovery
/// order.
#[derive(Clone, Debug, Default)]
pub struct ComponentSegmenter {
    config: SegmentConfig,
}

struct Candidate {
    component: Component,
    mask: BoolGrid,
}

impl Candidate {
    fn single_face(&self) -> Option<ThetaFace> {
        self.component.single_theta_face()
    }
}

fn opposite(face: ThetaFace) -> ThetaFace {
    match face {
        ThetaFace::Bottom => ThetaFace::Top,
        ThetaFace::Top => ThetaFace::Bottom,
    }
}

impl ComponentSegmenter {
    /// Create a segmenter after validating `config`.
    pub fn new(config: SegmentConfig) -> Result<Self, SegmentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Select, merge and name the canonical regions of `eroded`.
    pub fn segment(&self, eroded: &BoolGrid, space: &GridSpace) -> Result<Vec<Region>, SegmentError> {
        let labels = label_components(eroded, space)?;
        let mut candidates: Vec<&Component> = labels
            .components()
            .iter()
            .filter(|c| c.voxels >= self.config.min_component_voxels)
            .collect();
        let required = self.config.regions_to_keep;

        // Background: the largest component, earliest on ties.
        let background = candidates
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, usize)>, (i, c)| match best {
                Some((_, v)) if v >= c.voxels => best,
                _ => Some((i, c.voxels)),
            })
            .map(|(i, _)| i)
            .ok_or(SegmentError::TooFewComponents { found: 0, required })?;
        let dropped = candidates.remove(background);
        log::debug!(
            "{} components; background #{} has {} cells",
            labels.components().len(),
            dropped.id,
            dropped.voxels
        );

        if candidates.len() < required {
            return Err(SegmentError::TooFewComponents {
                found: candidates.len(),
                required,
            });
        }
        // Stable: equal counts keep discovery order.
        candidates.sort_by(|a, b| b.voxels.cmp(&a.voxels));
        candidates.truncate(required);
        candidates.sort_by_key(|c| c.id);

        let mut survivors: Vec<Candidate> = Vec::with_capacity(required);
        for component in candidates {
            let mask = labels.mask(component.id);
            let partner = component.single_theta_face().and_then(|face| {
                survivors.iter().position(|s| {
                    s.single_face() == Some(opposite(face))
                        && (s.component.centroid.x - component.centroid.x).abs()
                            < self.config.seam_merge_tolerance
                })
            });
            match partner {
                Some(i) => {
                    log::debug!(
                        "merging component #{} into #{} across the θ seam",
                        component.id,
                        survivors[i].component.id
                    );
                    let target = &mut survivors[i];
                    target.mask = target.mask.or(&mask)?;
                    target.component.touches_bottom = true;
                    target.component.touches_top = true;
                }
                None => survivors.push(Candidate {
                    component: component.clone(),
                    mask,
                }),
            }
        }

        let regions = survivors
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let name = RegionName::from_index(i).ok_or_else(|| {
                    SegmentError::Config(ConfigError::InvalidParameter {
                        name: "regions_to_keep",
                        reason: format!("more than {} regions", RegionName::MAX_COUNT),
                    })
                })?;
                Ok(Region::from_mask(name, c.mask, space)?)
            })
            .collect::<Result<Vec<_>, SegmentError>>()?;
        log::info!("segmented {} canonical regions", regions.len());
        Ok(regions)
    }
}
