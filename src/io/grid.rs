//! Text grid format for shapes.
//!
//! ```text
//! 3 2 2
//!
//! X_X
//! XXX
//!
//! __X
//! ___
//! ```
//!
//! A header line with the three extents, then one block per `z` layer: `SIZEY`
//! rows of `SIZEX` characters each, `X` for a present cell and `_` for an
//! absent one, blocks separated by blank lines. Rows are listed in increasing
//! `y`, characters in increasing `x`, so reading the characters in order visits
//! vertex ids `0, 1, 2, ...`.
//!
//! [`format_shape`] always writes the header. [`parse_shape`] accepts input with
//! or without it; without one, the extents are taken from the layout.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::graph::{Dimensions, VertexId};
use crate::subtree::Shape;

/// Character for a present cell.
pub const PRESENT: char = 'X';
/// Character for an absent cell.
pub const ABSENT: char = '_';

/// Renders `shape` in grid format.
pub fn format_shape(shape: &Shape) -> String {
    let dims = shape.dims();
    let mut out = String::with_capacity((dims.x as usize + 1) * (dims.y as usize + 1) * dims.z as usize + 32);
    out.push_str(&format!("{} {} {}\n\n", dims.x, dims.y, dims.z));

    let mut v: VertexId = 0;
    for _z in 0..dims.z {
        for _y in 0..dims.y {
            for _x in 0..dims.x {
                out.push(if shape.contains(v) { PRESENT } else { ABSENT });
                v += 1;
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Parses a grid, with or without a header line.
///
/// # Errors
/// [`Error::Grid`] for unexpected characters, ragged rows or layers, a header
/// that disagrees with the layout, or an input with no cells.
pub fn parse_shape(text: &str) -> Result<Shape> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim_end()));

    // Optional header: the first non-blank line, if it consists of numbers.
    let mut header = None;
    let mut pending = None;
    for (no, line) in lines.by_ref() {
        if line.trim().is_empty() {
            continue;
        }
        if line.trim_start().starts_with(|c: char| c.is_ascii_digit()) {
            header = Some(parse_header(no, line)?);
        } else {
            pending = Some((no, line));
        }
        break;
    }

    // Group the remaining rows into blank-separated layers.
    let mut layers: Vec<Vec<(usize, &str)>> = Vec::new();
    let mut current: Vec<(usize, &str)> = Vec::new();
    for (no, line) in pending.into_iter().chain(lines) {
        if line.trim().is_empty() {
            if !current.is_empty() {
                layers.push(std::mem::take(&mut current));
            }
        } else {
            current.push((no, line));
        }
    }
    if !current.is_empty() {
        layers.push(current);
    }

    let first = layers.first().ok_or_else(|| Error::grid(0, "no cells found"))?;
    let width = first[0].1.chars().count();
    let depth = first.len();
    let inferred = Dimensions::new(
        u32::try_from(width).map_err(|_| Error::grid(first[0].0, "row too long"))?,
        u32::try_from(depth).map_err(|_| Error::grid(first[0].0, "layer too tall"))?,
        u32::try_from(layers.len()).map_err(|_| Error::grid(0, "too many layers"))?,
    )?;

    if let Some((no, dims)) = header {
        if dims != inferred {
            return Err(Error::grid(
                no,
                format!("header says {dims} but the grid is {inferred}"),
            ));
        }
    }

    let mut shape = Shape::empty(inferred);
    let mut v: VertexId = 0;
    for layer in &layers {
        if layer.len() != depth {
            return Err(Error::grid(
                layer[0].0,
                format!("layer has {} rows, expected {depth}", layer.len()),
            ));
        }
        for &(no, row) in layer {
            let count = row.chars().count();
            if count != width {
                return Err(Error::grid(no, format!("row has {count} cells, expected {width}")));
            }
            for ch in row.chars() {
                match ch {
                    PRESENT => {
                        shape.insert(v);
                    }
                    ABSENT => {}
                    other => {
                        return Err(Error::grid(
                            no,
                            format!("unexpected character {other:?}, expected '{PRESENT}' or '{ABSENT}'"),
                        ))
                    }
                }
                v += 1;
            }
        }
    }

    Ok(shape)
}

fn parse_header(no: usize, line: &str) -> Result<(usize, Dimensions)> {
    let bad = || Error::grid(no, format!("malformed header {line:?}, expected three extents"));
    let extents: Vec<u32> = line
        .split_whitespace()
        .map(|t| t.parse().map_err(|_| bad()))
        .collect::<Result<_>>()?;
    match extents[..] {
        [x, y, z] => Ok((no, Dimensions::new(x, y, z)?)),
        _ => Err(bad()),
    }
}

/// Reads and parses a grid file.
pub fn read_shape(path: impl AsRef<Path>) -> Result<Shape> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_shape(&text)
}

/// Writes `shape` to `path`, replacing any previous contents.
pub fn write_shape(path: impl AsRef<Path>, shape: &Shape) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, format_shape(shape)).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_layout() {
        let dims = Dimensions::new(3, 2, 2).unwrap();
        let shape = Shape::from_cells(dims, [0, 2, 3, 4, 5, 8]);
        let text = format_shape(&shape);
        assert_eq!(text, "3 2 2\n\nX_X\nXXX\n\n__X\n___\n\n");
    }

    #[test]
    fn test_parse_with_header() {
        let shape = parse_shape("3 2 2\n\nX_X\nXXX\n\n__X\n___\n\n").unwrap();
        assert_eq!(shape.dims(), Dimensions::new(3, 2, 2).unwrap());
        assert_eq!(shape.iter().collect::<Vec<_>>(), vec![0, 2, 3, 4, 5, 8]);
    }

    #[test]
    fn test_parse_without_header_infers_dims() {
        let shape = parse_shape("XX\n_X\nXX\n\nX_\n__\n__\n").unwrap();
        assert_eq!(shape.dims(), Dimensions::new(2, 3, 2).unwrap());
        assert_eq!(shape.len(), 6);
        assert!(shape.contains(6));
        assert!(!shape.contains(7));
    }

    #[test]
    fn test_round_trip() {
        let dims = Dimensions::new(4, 3, 2).unwrap();
        let shape = Shape::from_cells(dims, (0..24).filter(|v| v % 5 != 1));
        assert_eq!(parse_shape(&format_shape(&shape)).unwrap(), shape);
    }

    #[test]
    fn test_rejects_bad_character() {
        let err = parse_shape("XX\nXo\n").unwrap_err();
        assert!(matches!(err, Error::Grid { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_rejects_ragged_row() {
        let err = parse_shape("XXX\nXX\n").unwrap_err();
        assert!(matches!(err, Error::Grid { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_rejects_ragged_layer() {
        let err = parse_shape("XX\nXX\n\nXX\n").unwrap_err();
        assert!(matches!(err, Error::Grid { line: 4, .. }), "{err}");
    }

    #[test]
    fn test_rejects_header_mismatch() {
        let err = parse_shape("2 2 2\n\nXX\nXX\n").unwrap_err();
        assert!(matches!(err, Error::Grid { line: 1, .. }), "{err}");
        assert!(parse_shape("2 2\n\nXX\nXX\n").is_err());
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(matches!(parse_shape("\n\n"), Err(Error::Grid { line: 0, .. })));
    }
}
