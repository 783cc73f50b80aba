//! Axis edge (boundary) behavior.

/// How an axis handles indices that fall off either end.
///
/// The maze walls make x and y [`Absorb`](Self::Absorb); orientation is
/// [`Wrap`](Self::Wrap). [`Clamp`](Self::Clamp) is only used when a
/// caller explicitly asks for a clamped coordinate mapping.
///
/// # Examples
///
/// ```
/// use cspace_space::{resolve_axis, EdgeBehavior};
///
/// assert_eq!(resolve_axis(-1, 8, EdgeBehavior::Wrap), Some(7));
/// assert_eq!(resolve_axis(-1, 8, EdgeBehavior::Absorb), None);
/// assert_eq!(resolve_axis(9, 8, EdgeBehavior::Clamp), Some(7));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds index maps to the nearest boundary cell.
    Clamp,
    /// Out-of-bounds index wraps to the opposite side (periodic).
    Wrap,
    /// Out-of-bounds index does not exist.
    Absorb,
}

/// Resolve a single axis index under the given edge behavior.
///
/// Returns `Some(resolved)`, or `None` for an absorbed out-of-bounds
/// index. `len` must be non-zero.
pub fn resolve_axis(val: i64, len: usize, edge: EdgeBehavior) -> Option<usize> {
    let len_i = len as i64;
    if val >= 0 && val < len_i {
        return Some(val as usize);
    }
    match edge {
        EdgeBehavior::Absorb => None,
        EdgeBehavior::Clamp => Some(val.clamp(0, len_i - 1) as usize),
        EdgeBehavior::Wrap => Some(val.rem_euclid(len_i) as usize),
    }
}
