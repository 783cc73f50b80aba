//! Binary encode/decode primitives.
//!
//! All integers are little-endian. Grids are prefixed with their shape
//! as three `u32`s.

use std::io::{Read, Write};

use cspace_core::{Label, Pose};
use cspace_space::{BoolGrid, Extent, Grid3, LabelGrid, Resolution};

use crate::error::StoreError;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), StoreError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), StoreError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), StoreError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), StoreError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, StoreError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, StoreError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, StoreError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub fn read_f64_le(r: &mut dyn Read) -> Result<f64, StoreError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

fn malformed(detail: impl Into<String>) -> StoreError {
    StoreError::Malformed {
        detail: detail.into(),
    }
}

// ── Composite values ────────────────────────────────────────────

fn write_range(w: &mut dyn Write, (min, max): (f64, f64)) -> Result<(), StoreError> {
    write_f64_le(w, min)?;
    write_f64_le(w, max)
}

fn read_range(r: &mut dyn Read) -> Result<(f64, f64), StoreError> {
    Ok((read_f64_le(r)?, read_f64_le(r)?))
}

/// Write the three axis ranges.
pub fn write_extent(w: &mut dyn Write, extent: &Extent) -> Result<(), StoreError> {
    write_range(w, extent.x)?;
    write_range(w, extent.y)?;
    write_range(w, extent.theta)
}

/// Read the three axis ranges. θ is returned as stored.
pub fn read_extent(r: &mut dyn Read) -> Result<Extent, StoreError> {
    Ok(Extent {
        x: read_range(r)?,
        y: read_range(r)?,
        theta: read_range(r)?,
    })
}

/// Write the position and angular steps.
pub fn write_resolution(w: &mut dyn Write, res: &Resolution) -> Result<(), StoreError> {
    write_f64_le(w, res.position)?;
    write_f64_le(w, res.theta)
}

/// Read the position and angular steps.
pub fn read_resolution(r: &mut dyn Read) -> Result<Resolution, StoreError> {
    Ok(Resolution {
        position: read_f64_le(r)?,
        theta: read_f64_le(r)?,
    })
}

/// Write a pose as three f64s.
pub fn write_pose(w: &mut dyn Write, pose: &Pose) -> Result<(), StoreError> {
    write_f64_le(w, pose.x)?;
    write_f64_le(w, pose.y)?;
    write_f64_le(w, pose.theta)
}

/// Read a pose.
pub fn read_pose(r: &mut dyn Read) -> Result<Pose, StoreError> {
    Ok(Pose::new(read_f64_le(r)?, read_f64_le(r)?, read_f64_le(r)?))
}

/// Write a grid shape.
pub fn write_shape(w: &mut dyn Write, shape: [usize; 3]) -> Result<(), StoreError> {
    for n in shape {
        let n = u32::try_from(n).map_err(|_| malformed(format!("axis length {n} exceeds u32")))?;
        write_u32_le(w, n)?;
    }
    Ok(())
}

/// Read a grid shape, rejecting empty axes.
pub fn read_shape(r: &mut dyn Read) -> Result<[usize; 3], StoreError> {
    let shape = [
        read_u32_le(r)? as usize,
        read_u32_le(r)? as usize,
        read_u32_le(r)? as usize,
    ];
    if shape.contains(&0) {
        return Err(malformed(format!("grid shape {shape:?} has an empty axis")));
    }
    Ok(shape)
}

fn cell_count(shape: [usize; 3]) -> Result<usize, StoreError> {
    shape
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| malformed(format!("grid shape {shape:?} overflows")))
}

fn read_bytes(r: &mut dyn Read, len: usize) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    (&mut *r).take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(malformed(format!(
            "truncated grid: expected {len} bytes, got {}",
            buf.len()
        )));
    }
    Ok(buf)
}

// ── Grids ───────────────────────────────────────────────────────

/// Write a boolean grid: shape, then one bit per cell.
pub fn write_bool_grid(w: &mut dyn Write, grid: &BoolGrid) -> Result<(), StoreError> {
    write_shape(w, grid.shape())?;
    let packed: Vec<u8> = grid
        .as_slice()
        .chunks(8)
        .map(|bits| {
            bits.iter()
                .enumerate()
                .fold(0u8, |byte, (i, &b)| byte | (u8::from(b) << i))
        })
        .collect();
    w.write_all(&packed)?;
    Ok(())
}

/// Read a boolean grid written by [`write_bool_grid`].
pub fn read_bool_grid(r: &mut dyn Read) -> Result<BoolGrid, StoreError> {
    let shape = read_shape(r)?;
    let cells = cell_count(shape)?;
    let packed = read_bytes(r, cells.div_ceil(8))?;
    let data = (0..cells)
        .map(|i| packed[i / 8] & (1 << (i % 8)) != 0)
        .collect();
    Grid3::from_vec(shape, data).map_err(|e| malformed(e.to_string()))
}

/// Write a label grid: shape, then two bytes per cell.
pub fn write_label_grid(w: &mut dyn Write, grid: &LabelGrid) -> Result<(), StoreError> {
    write_shape(w, grid.shape())?;
    let bytes: Vec<u8> = grid
        .as_slice()
        .iter()
        .flat_map(|label| label.to_bytes())
        .collect();
    w.write_all(&bytes)?;
    Ok(())
}

/// Read a label grid written by [`write_label_grid`].
pub fn read_label_grid(r: &mut dyn Read) -> Result<LabelGrid, StoreError> {
    let shape = read_shape(r)?;
    let bytes = read_bytes(r, cell_count(shape)? * 2)?;
    let data = bytes
        .chunks_exact(2)
        .map(|pair| {
            Label::from_bytes([pair[0], pair[1]])
                .ok_or_else(|| malformed(format!("invalid label bytes {pair:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Grid3::from_vec(shape, data).map_err(|e| malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cspace_core::RegionName;

    #[test]
    fn bool_grid_packs_eight_cells_per_byte() {
        let mut grid = BoolGrid::filled([3, 1, 3], false);
        grid[[0, 0, 0]] = true;
        grid[[2, 0, 2]] = true;
        let mut buf = Vec::new();
        write_bool_grid(&mut buf, &grid).unwrap();
        // 12-byte shape + ceil(9 / 8) bytes.
        assert_eq!(buf.len(), 12 + 2);
        assert_eq!(&buf[12..], &[0b0000_0001, 0b0000_0001]);
        assert_eq!(read_bool_grid(&mut buf.as_slice()).unwrap(), grid);
    }

    #[test]
    fn labels_use_two_bytes_each() {
        let a = RegionName::from_char('a').unwrap();
        let b = RegionName::from_char('b').unwrap();
        let mut grid = LabelGrid::filled([1, 1, 3], Label::Occupied);
        grid[[0, 0, 1]] = Label::Region(a);
        grid[[0, 0, 2]] = Label::Transition(b, a);
        let mut buf = Vec::new();
        write_label_grid(&mut buf, &grid).unwrap();
        assert_eq!(&buf[12..], b"0\0a\0ba");
        assert_eq!(read_label_grid(&mut buf.as_slice()).unwrap(), grid);
    }

    #[test]
    fn truncated_grid_is_malformed() {
        let grid = BoolGrid::filled([4, 4, 4], true);
        let mut buf = Vec::new();
        write_bool_grid(&mut buf, &grid).unwrap();
        buf.pop();
        assert!(matches!(
            read_bool_grid(&mut buf.as_slice()),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn unknown_label_bytes_are_malformed() {
        let mut buf = Vec::new();
        write_shape(&mut buf, [1, 1, 1]).unwrap();
        buf.extend_from_slice(b"#\0");
        assert!(matches!(
            read_label_grid(&mut buf.as_slice()),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn empty_axis_is_rejected() {
        let mut buf = Vec::new();
        write_shape(&mut buf, [2, 0, 2]).unwrap();
        assert!(read_shape(&mut buf.as_slice()).is_err());
    }
}
