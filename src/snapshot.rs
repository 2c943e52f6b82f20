use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::stats::YearStats;

#[derive(Debug, Serialize, Deserialize)]
pub struct YearSnapshot {
    pub scenario: String,
    pub stats: YearStats,
}

/// Writes `<dir>/<scenario>/year_NNNNNN.json` every `interval_years` years.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_years: u32,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_years: u32) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_years,
        }
    }

    pub fn maybe_write(&self, stats: &YearStats, scenario_name: &str) -> Result<Option<PathBuf>> {
        if self.interval_years == 0 || stats.year % self.interval_years != 0 {
            return Ok(None);
        }

        let dir = self.dir.join(scenario_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("year_{:06}.json", stats.year));
        let snapshot = YearSnapshot {
            scenario: scenario_name.to_string(),
            stats: stats.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}

/// Reads a snapshot written by [`SnapshotWriter`].
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<YearSnapshot> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::island::Island;

    #[test]
    fn writes_only_on_interval_years() {
        let temp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 5);
        let island = Island::from_map("OOO\nOJO\nOOO").unwrap();
        let mut stats = YearStats::collect(&island);

        stats.year = 3;
        assert!(writer.maybe_write(&stats, "tiny").unwrap().is_none());

        stats.year = 10;
        let path = writer.maybe_write(&stats, "tiny").unwrap().unwrap();
        assert_eq!(path, temp.path().join("tiny").join("year_000010.json"));

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.scenario, "tiny");
        assert_eq!(loaded.stats, stats);
    }

    #[test]
    fn zero_interval_disables_writes() {
        let temp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 0);
        let island = Island::from_map("OOO\nOJO\nOOO").unwrap();
        let stats = YearStats::collect(&island);
        assert!(writer.maybe_write(&stats, "tiny").unwrap().is_none());
    }
}
