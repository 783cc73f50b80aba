//! Per-cell symbolic labels.

use crate::id::RegionName;
use std::fmt;

/// The symbolic label of one configuration-space cell.
///
/// Renders as the short strings consumed by the network layer:
/// `""` (unassigned), `"0"` (occupied), `"a"` (inside region `a`) or
/// `"ab"` (transition cell, nearest region first).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Label {
    /// Not yet labeled. Only valid as an intermediate state.
    #[default]
    Unassigned,
    /// The pose collides with the maze.
    Occupied,
    /// Inside (or closest to only) one canonical region.
    Region(RegionName),
    /// Between two regions, ordered nearest to farthest.
    Transition(RegionName, RegionName),
}

impl Label {
    /// Build a label from up to two region names ranked nearest first.
    ///
    /// Returns `Unassigned` for an empty ranking.
    pub fn from_ranked(ranked: &[RegionName]) -> Self {
        match ranked {
            [] => Self::Unassigned,
            [a] => Self::Region(*a),
            [a, b, ..] => Self::Transition(*a, *b),
        }
    }

    /// Parse the string form produced by [`Display`](fmt::Display).
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (None, _, _) => Some(Self::Unassigned),
            (Some('0'), None, _) => Some(Self::Occupied),
            (Some(a), None, _) => RegionName::from_char(a).map(Self::Region),
            (Some(a), Some(b), None) => Some(Self::Transition(
                RegionName::from_char(a)?,
                RegionName::from_char(b)?,
            )),
            _ => None,
        }
    }

    /// Two-byte storage form: `[0, 0]`, `[b'0', 0]`, `[a, 0]` or `[a, b]`.
    pub fn to_bytes(self) -> [u8; 2] {
        match self {
            Self::Unassigned => [0, 0],
            Self::Occupied => [b'0', 0],
            Self::Region(a) => [a.as_char() as u8, 0],
            Self::Transition(a, b) => [a.as_char() as u8, b.as_char() as u8],
        }
    }

    /// Inverse of [`to_bytes`](Self::to_bytes). `None` for unknown bytes.
    pub fn from_bytes(bytes: [u8; 2]) -> Option<Self> {
        match bytes {
            [0, 0] => Some(Self::Unassigned),
            [b'0', 0] => Some(Self::Occupied),
            [a, 0] => RegionName::from_char(a as char).map(Self::Region),
            [a, b] => Some(Self::Transition(
                RegionName::from_char(a as char)?,
                RegionName::from_char(b as char)?,
            )),
        }
    }

    /// Region names mentioned by this label, nearest first.
    pub fn regions(self) -> impl Iterator<Item = RegionName> {
        let (a, b) = match self {
            Self::Unassigned | Self::Occupied => (None, None),
            Self::Region(a) => (Some(a), None),
            Self::Transition(a, b) => (Some(a), Some(b)),
        };
        a.into_iter().chain(b)
    }

    /// Whether this is a two-region transition label.
    pub fn is_transition(self) -> bool {
        matches!(self, Self::Transition(..))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => Ok(()),
            Self::Occupied => write!(f, "0"),
            Self::Region(a) => write!(f, "{a}"),
            Self::Transition(a, b) => write!(f, "{a}{b}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(c: char) -> RegionName {
        RegionName::from_char(c).unwrap()
    }

    #[test]
    fn display_matches_short_strings() {
        assert_eq!(Label::Unassigned.to_string(), "");
        assert_eq!(Label::Occupied.to_string(), "0");
        assert_eq!(Label::Region(n('c')).to_string(), "c");
        assert_eq!(Label::Transition(n('b'), n('a')).to_string(), "ba");
    }

    #[test]
    fn parse_accepts_every_display_form() {
        for label in [
            Label::Unassigned,
            Label::Occupied,
            Label::Region(n('e')),
            Label::Transition(n('a'), n('j')),
        ] {
            assert_eq!(Label::parse(&label.to_string()), Some(label));
        }
        assert_eq!(Label::parse("abc"), None);
        assert_eq!(Label::parse("A"), None);
    }

    #[test]
    fn bytes_reject_garbage() {
        assert_eq!(Label::from_bytes([b'Z', 0]), None);
        assert_eq!(Label::from_bytes([b'a', b'!']), None);
        assert_eq!(
            Label::from_bytes(Label::Transition(n('d'), n('b')).to_bytes()),
            Some(Label::Transition(n('d'), n('b')))
        );
    }

    #[test]
    fn from_ranked_takes_at_most_two() {
        assert_eq!(Label::from_ranked(&[]), Label::Unassigned);
        assert_eq!(Label::from_ranked(&[n('a')]), Label::Region(n('a')));
        assert_eq!(
            Label::from_ranked(&[n('c'), n('a'), n('b')]),
            Label::Transition(n('c'), n('a'))
        );
    }

    #[test]
    fn regions_lists_nearest_first() {
        let names: Vec<_> = Label::Transition(n('f'), n('b')).regions().collect();
        assert_eq!(names, vec![n('f'), n('b')]);
        assert_eq!(Label::Occupied.regions().count(), 0);
    }
}
