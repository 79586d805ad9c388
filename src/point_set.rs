//! Loading and describing the point sets fed to the planner.
//!
//! Files hold one point per line as `x y` or `x,y`. Blank lines and lines
//! starting with `#` are skipped, and a single non-numeric header line is allowed.

use crate::point::Point;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A named, ordered collection of points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSet {
    pub name: String,
    pub points: Vec<Point>,
}

impl PointSet {
    pub fn new(name: &str, points: Vec<Point>) -> Self {
        PointSet {
            name: name.to_string(),
            points,
        }
    }

    /// Parse a point file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(&path).map_err(|e| format!("Cannot open file: {}", e))?;
        let reader = BufReader::new(file);

        let name = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line.map_err(|e| format!("Read error: {}", e))?);
        }
        Self::parse(&name, lines.iter().map(|l| l.as_str()))
    }

    /// Parse point lines already in memory.
    pub fn parse<'a, I>(name: &str, lines: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut points = Vec::new();

        for (lineno, line) in lines.into_iter().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect();
            if parts.len() < 2 {
                return Err(format!("Line {}: expected two coordinates", lineno + 1));
            }

            match (parts[0].parse::<i32>(), parts[1].parse::<i32>()) {
                (Ok(x), Ok(y)) => points.push(Point::new(x, y)),
                // header row
                _ if points.is_empty() && lineno == 0 => continue,
                _ => return Err(format!("Line {}: invalid coordinates {:?}", lineno + 1, line)),
            }
        }

        Ok(PointSet::new(name, points))
    }

    /// `n` points drawn uniformly from `[0, extent)^2`.
    pub fn random(n: usize, extent: i32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let extent = extent.max(1);
        let points = (0..n)
            .map(|_| Point::new(rng.gen_range(0..extent), rng.gen_range(0..extent)))
            .collect();
        PointSet::new(&format!("random-{}-{}", n, seed), points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index`, if present.
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Get statistics about the point set
    pub fn statistics(&self) -> PointSetStatistics {
        let min_x = self.points.iter().map(|p| p.x).min().unwrap_or(0);
        let max_x = self.points.iter().map(|p| p.x).max().unwrap_or(0);
        let min_y = self.points.iter().map(|p| p.y).min().unwrap_or(0);
        let max_y = self.points.iter().map(|p| p.y).max().unwrap_or(0);

        let mut sum = 0.0;
        let mut count = 0usize;
        let mut max_distance: f64 = 0.0;
        for i in 0..self.points.len() {
            for j in i + 1..self.points.len() {
                let d = Point::distance(self.points[i], self.points[j]);
                sum += d;
                count += 1;
                max_distance = max_distance.max(d);
            }
        }
        let avg_distance = if count > 0 { sum / count as f64 } else { 0.0 };

        let mut unique = self.points.clone();
        unique.sort();
        unique.dedup();

        PointSetStatistics {
            name: self.name.clone(),
            num_points: self.points.len(),
            num_unique: unique.len(),
            min_x,
            max_x,
            min_y,
            max_y,
            avg_distance,
            max_distance,
        }
    }
}

/// Statistics about a point set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSetStatistics {
    pub name: String,
    pub num_points: usize,
    pub num_unique: usize,
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub avg_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for PointSetStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Point set: {}", self.name)?;
        writeln!(f, "  Points: {} ({} unique)", self.num_points, self.num_unique)?;
        writeln!(f, "  X range: [{}, {}]", self.min_x, self.max_x)?;
        writeln!(f, "  Y range: [{}, {}]", self.min_y, self.max_y)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_separators() {
        let text = "x,y\n# comment\n1 2\n\n3,4\n-5\t6\n";
        let set = PointSet::parse("test", text.lines()).unwrap();
        assert_eq!(
            set.points,
            vec![Point::new(1, 2), Point::new(3, 4), Point::new(-5, 6)]
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PointSet::parse("bad", "1 2\nfoo bar\n".lines()).is_err());
        assert!(PointSet::parse("bad", "7\n".lines()).is_err());
    }

    #[test]
    fn test_random_is_seeded() {
        let a = PointSet::random(50, 100, 9);
        let b = PointSet::random(50, 100, 9);
        assert_eq!(a.points, b.points);
        assert!(a.points.iter().all(|p| (0..100).contains(&p.x) && (0..100).contains(&p.y)));
    }

    #[test]
    fn test_statistics() {
        let set = PointSet::new(
            "square",
            vec![Point::new(0, 0), Point::new(3, 4), Point::new(3, 4)],
        );
        let stats = set.statistics();
        assert_eq!(stats.num_points, 3);
        assert_eq!(stats.num_unique, 2);
        assert_eq!(stats.max_distance, 5.0);
        assert_eq!((stats.min_x, stats.max_x, stats.min_y, stats.max_y), (0, 3, 0, 4));
    }
}
