//! Bake configuration loading.

use std::path::Path;

use anyhow::{Context, Result};
use platformer_nav::{NavConfig, TileMap};

/// Load a YAML configuration; missing fields take their defaults.
pub fn load(path: &Path) -> Result<NavConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: NavConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;
    Ok(config)
}

/// Load `path` if given; otherwise use defaults with the grid fitted over `map`.
pub fn load_or_fit(path: Option<&Path>, map: &TileMap) -> Result<NavConfig> {
    match path {
        Some(path) => load(path),
        None => {
            let mut config = NavConfig::default();
            fit_grid(&mut config, map);
            Ok(config)
        }
    }
}

/// Place the grid over the whole map with one cell per `spacing`.
pub fn fit_grid(config: &mut NavConfig, map: &TileMap) {
    let grid = &mut config.grid;
    let extent = map.extent();
    grid.origin = map.origin();
    grid.width = ((extent.x / grid.spacing).ceil() as u32).max(1);
    // One spare row so the top tile row still gets cells to stand in.
    grid.height = ((extent.y / grid.spacing).ceil() as u32).max(1) + 1;
}

/// Default configuration as a YAML document.
pub fn default_yaml() -> Result<String> {
    serde_yaml::to_string(&NavConfig::default()).context("Failed to serialize default config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitted_grid_covers_the_map_plus_a_row() {
        let map: TileMap = "......\n######".parse().expect("level");
        let config = load_or_fit(None, &map).expect("config");
        assert_eq!(config.grid.width, 6);
        assert_eq!(config.grid.height, 3);
        assert_eq!(config.grid.origin, map.origin());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: NavConfig =
            serde_yaml::from_str("jump:\n  max_jump_height: 3.0\n").expect("parse");
        assert_eq!(config.jump.max_jump_height, 3.0);
        assert_eq!(config.grid, NavConfig::default().grid);
    }

    #[test]
    fn default_document_parses_back() {
        let yaml = default_yaml().expect("yaml");
        let config: NavConfig = serde_yaml::from_str(&yaml).expect("parse");
        assert_eq!(config, NavConfig::default());
    }
}
