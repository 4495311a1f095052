//! Reading point clouds from whitespace separated text files.
//!
//! Each line holds one point: `x y z` optionally followed by `r g b`, with colors given in the
//! range 0 to 255. Lines that do not start with three numbers are skipped.

use crate::scene::{Point, PointSet};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PointFileError {
    #[error("Could not read point file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("The point file {path} does not contain any valid points.")]
    NoPoints { path: PathBuf },
}

/// Parses a single line.
/// Returns [None], if the line does not describe a point.
pub fn parse_point(line: &str) -> Option<Point> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }

    let x = coordinate(tokens[0])?;
    let y = coordinate(tokens[1])?;
    let z = coordinate(tokens[2])?;

    let color = if tokens.len() >= 6 {
        [
            color_component(tokens[3]),
            color_component(tokens[4]),
            color_component(tokens[5]),
        ]
    } else {
        Point::DEFAULT_COLOR
    };

    Some(Point::new([x, y, z], color))
}

/// NaN, infinity and values out of the f32 range are not coordinates.
fn coordinate(token: &str) -> Option<f32> {
    token.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Unparseable or non-finite color tokens count as 0.
fn color_component(token: &str) -> f32 {
    match token.parse::<f32>() {
        Ok(value) if value.is_finite() => (value / 255.0).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

impl PointSet {
    /// Reads all points from the given reader. Invalid lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<PointSet> {
        let mut set = PointSet::new();
        let mut skipped = 0_usize;
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_point(line) {
                Some(point) => set.push(point),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("Skipped {} invalid lines.", skipped);
        }
        Ok(set)
    }
}

/// Reads a point file from disk.
///
/// Fails, if the file cannot be read or contains no valid point at all.
pub fn read_point_file(path: &Path) -> Result<PointSet, PointFileError> {
    let io_error = |source| PointFileError::Io {
        path: path.to_owned(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let set = PointSet::from_reader(BufReader::new(file)).map_err(io_error)?;
    if set.is_empty() {
        return Err(PointFileError::NoPoints {
            path: path.to_owned(),
        });
    }
    debug!("Read {} points from {}", set.len(), path.display());
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::{PointFileError, parse_point, read_point_file};
    use crate::scene::{Point, PointSet};
    use nalgebra::point;
    use std::io::{Cursor, Write};

    #[test]
    fn test_parse_rgb_point() {
        let p = parse_point("1.5 -2 3 255 0 127.5").unwrap();
        assert_eq!(p.position, [1.5, -2.0, 3.0]);
        assert_eq!(p.color, [1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_parse_defaults_to_white() {
        assert_eq!(parse_point("1 2 3").unwrap().color, Point::DEFAULT_COLOR);
        assert_eq!(parse_point("1 2 3 4 5").unwrap().color, Point::DEFAULT_COLOR);
    }

    #[test]
    fn test_parse_clamps_colors() {
        let p = parse_point("0 0 0 300 -20 abc").unwrap();
        assert_eq!(p.color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_parse_rejects_invalid_lines() {
        assert_eq!(parse_point("1 2"), None);
        assert_eq!(parse_point("x 2 3"), None);
        assert_eq!(parse_point("1 2 z 255 255 255"), None);
        assert_eq!(parse_point("# comment"), None);
    }

    #[test]
    fn test_parse_rejects_non_finite_coordinates() {
        assert_eq!(parse_point("nan 0 0"), None);
        assert_eq!(parse_point("0 inf 0"), None);
        assert_eq!(parse_point("0 0 -infinity"), None);
        assert_eq!(parse_point("1e39 0 0"), None);
        assert!(parse_point("3e38 0 0").is_some());
    }

    #[test]
    fn test_parse_non_finite_colors_are_zero() {
        let p = parse_point("0 0 0 nan inf 255").unwrap();
        assert_eq!(p.color, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_from_reader_bounds_stay_finite() {
        let data = "1e39 0 0\nnan 1 1\n0 0 0\n2 inf 1\n1 2 3\n";
        let set = PointSet::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(set.len(), 2);
        let bounds = set.bounds();
        assert!(!bounds.is_empty());
        assert_eq!(bounds.min, point![0.0, 0.0, 0.0]);
        assert_eq!(bounds.max, point![1.0, 2.0, 3.0]);
        assert!(bounds.radius().is_finite());
    }

    #[test]
    fn test_from_reader_skips_bad_lines() {
        let data = "0 0 0 255 0 0\n\n   \nnot a point\n1 2\n1\t1  1 0 255 0\n";
        let set = PointSet::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.points()[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(set.points()[1].color, [0.0, 1.0, 0.0]);
        assert_eq!(set.bounds().min, point![0.0, 0.0, 0.0]);
        assert_eq!(set.bounds().max, point![1.0, 1.0, 1.0]);
        assert_eq!(set.bounds().center(), point![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_read_point_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 0 0").unwrap();
        writeln!(file, "2 4 6 10 20 30").unwrap();
        let set = read_point_file(file.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.bounds().max, point![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_read_empty_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "just text").unwrap();
        let result = read_point_file(file.path());
        assert!(matches!(result, Err(PointFileError::NoPoints { .. })));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_point_file(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(PointFileError::Io { .. })));
    }
}
