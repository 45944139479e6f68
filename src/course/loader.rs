use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use super::catalog::CourseCatalog;
use super::types::{Act, ActTable, Level};

pub fn load_level(path: &Path) -> Result<Level> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading level file {}", path.display()))?;
    let level: Level =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(level)
}

pub fn load_acts(path: &Path) -> Result<Vec<Act>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading act table {}", path.display()))?;
    let table: ActTable =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(table.acts)
}

pub fn load_levels(course_dir: &Path) -> Result<Vec<Level>> {
    let pattern = course_dir.join("level_*.toml");
    let pattern = pattern.to_string_lossy();

    let mut paths: Vec<_> = glob::glob(&pattern)
        .with_context(|| format!("bad course directory {}", course_dir.display()))?
        .filter_map(|e| e.ok())
        .collect();

    // Sort by filename so level_01, level_02, level_03 are in order
    paths.sort();

    let mut levels = Vec::with_capacity(paths.len());
    for path in paths {
        debug!(path = %path.display(), "loading level");
        levels.push(load_level(&path)?);
    }

    Ok(levels)
}

/// Loads `acts.toml` and every `level_*.toml` in `course_dir` and validates
/// them into a catalog.
pub fn load_course(course_dir: &Path) -> Result<CourseCatalog> {
    let acts = load_acts(&course_dir.join("acts.toml"))?;
    let levels = load_levels(course_dir)?;
    let catalog = CourseCatalog::new(levels, acts)
        .with_context(|| format!("invalid course in {}", course_dir.display()))?;
    Ok(catalog)
}
