//! External collaborator traits: the collision oracle and maze geometry.

use crate::error::OracleError;
use crate::geometry::LoadShape;
use crate::id::Pose;

/// Decides whether a pose of the load is collision-free.
///
/// Implementations own the load polygon and the maze wall corners; the
/// builder only hands over poses. `Sync` is required because the sweep
/// queries the oracle from several worker threads at once.
pub trait CollisionOracle: Sync {
    /// Cheap conservative pre-check against a bounding-box approximation
    /// of the load.
    ///
    /// `Ok(true)` means the bounding box is clear, so the exact test can
    /// be skipped. The default never short-circuits.
    fn bounding_box_free(&self, pose: &Pose) -> Result<bool, OracleError> {
        let _ = pose;
        Ok(false)
    }

    /// Exact collision test. `Ok(true)` means the pose is free.
    fn is_free(&self, pose: &Pose) -> Result<bool, OracleError>;
}

/// Physical description of a maze and the load moving through it.
///
/// All lengths share one unit (centimetres in the recorded experiments).
pub trait MazeGeometry {
    /// x positions of the slit walls, ascending.
    fn slits(&self) -> &[f64];

    /// Height of the arena (y extent).
    fn arena_height(&self) -> f64;

    /// Width of the exit opening.
    fn exit_size(&self) -> f64;

    /// Average distance of the load's outline from its centre of mass.
    ///
    /// Scales the angular resolution so that one θ step moves the load's
    /// rim about as far as one positional step.
    fn average_radius(&self) -> f64;

    /// Characteristic dimensions of the load (e.g. length, width).
    fn load_dimensions(&self) -> &[f64];

    /// Shape of the load.
    fn load_shape(&self) -> LoadShape;

    /// Physical gap used to size transition corridors.
    ///
    /// SPT loads use one third of the gap between the first two slits,
    /// every other shape uses half the exit width.
    fn transition_gap(&self) -> f64 {
        match (self.load_shape(), self.slits()) {
            (LoadShape::Spt, [first, second, ..]) => (second - first) / 3.0,
            _ => self.exit_size() / 2.0,
        }
    }
}
