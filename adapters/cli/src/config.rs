//! Simulation configuration assembled from a TOML file and command-line overrides.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use snake_pilot_core::{Cell, SimulationConfig, TileCount};

/// Values supplied on the command line that take precedence over the file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) tile_count: Option<u32>,
    pub(crate) seed: Option<u64>,
}

/// Loads the configuration, applies overrides and validates the result.
pub(crate) fn load(path: Option<&Path>, overrides: Overrides) -> Result<SimulationConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("failed to load config file {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    apply_overrides(&mut config, overrides);
    config
        .validate()
        .context("invalid simulation configuration")?;
    Ok(config)
}

fn parse(contents: &str) -> Result<SimulationConfig> {
    toml::from_str(contents).context("failed to parse simulation config toml")
}

fn apply_overrides(config: &mut SimulationConfig, overrides: Overrides) {
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }

    if let Some(tile_count) = overrides.tile_count {
        config.tile_count = TileCount::new(tile_count);
        // A smaller grid would strand the default start cell outside it.
        if !config.tile_count.contains(config.start) {
            let center = tile_count / 2;
            config.start = Cell::new(center, center);
            tracing::info!(start = ?config.start, "start cell moved to grid center");
        }
        if config
            .initial_target
            .is_some_and(|target| !config.tile_count.contains(target) || target == config.start)
        {
            config.initial_target = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(parse("").expect("parse"), SimulationConfig::default());
    }

    #[test]
    fn file_fields_override_defaults() {
        let config = parse(
            r#"
            tile_count = 12
            seed = 7
            search_iteration_cap = 250
            start = { column = 3, row = 4 }
            initial_target = { column = 8, row = 8 }
            "#,
        )
        .expect("parse");

        assert_eq!(config.tile_count, TileCount::new(12));
        assert_eq!(config.seed, 7);
        assert_eq!(config.search_iteration_cap, 250);
        assert_eq!(config.start, Cell::new(3, 4));
        assert_eq!(config.initial_target, Some(Cell::new(8, 8)));
        assert_eq!(
            config.placement_attempts,
            SimulationConfig::default().placement_attempts
        );
    }

    #[test]
    fn unknown_shapes_are_rejected() {
        assert!(parse("tile_count = \"big\"").is_err());
    }

    #[test]
    fn shrinking_grid_recenters_start() {
        let config = load(
            None,
            Overrides {
                tile_count: Some(6),
                seed: Some(1),
            },
        )
        .expect("valid config");

        assert_eq!(config.tile_count, TileCount::new(6));
        assert_eq!(config.start, Cell::new(3, 3));
        assert_eq!(config.seed, 1);
    }

    #[test]
    fn invalid_overrides_fail_validation() {
        let error = load(
            None,
            Overrides {
                tile_count: Some(0),
                seed: None,
            },
        )
        .expect_err("empty grid");

        assert!(format!("{error:#}").contains("tile count must be at least 1"));
    }
}
