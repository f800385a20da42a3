//! Corridor file loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use signal_timing::optimizer::DEFAULT_YELLOW_S;
use signal_timing::{Intersection, OptimizerConfig};
use std::fs;
use std::path::Path;

/// A corridor description (loaded from corridor.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorridorConfig {
    pub corridor: CorridorSettings,
    pub intersections: Vec<Intersection>,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorridorSettings {
    /// Reference travel speed
    pub speed_kmh: f64,
    #[serde(default = "default_yellow")]
    pub yellow_s: f64,
}

fn default_yellow() -> f64 {
    DEFAULT_YELLOW_S
}

/// Load a corridor file
pub fn load_config(path: &Path) -> Result<CorridorConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read corridor file: {:?}", path))?;

    let config: CorridorConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse corridor file: {:?}", path))?;

    log::debug!(
        "Corridor {:?}: {} intersections at {} km/h",
        path,
        config.intersections.len(),
        config.corridor.speed_kmh
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CORRIDOR: &str = r#"
        [corridor]
        speed_kmh = 40

        [[intersections]]
        id = 1
        name = "수청4R"
        cycle = 160
        offset = 145
        green = 120
        distance = 0

        [[intersections]]
        id = 2
        name = "대천중"
        cycle = 160
        offset = 40
        green = 80
        distance = 214.5
    "#;

    #[test]
    fn test_corridor_deserialization() {
        let config: CorridorConfig = toml::from_str(CORRIDOR).unwrap();
        assert_eq!(config.intersections.len(), 2);
        assert_eq!(config.corridor.speed_kmh, 40.0);
        assert_eq!(config.corridor.yellow_s, 3.0);
        assert_eq!(config.intersections[1].distance, 214.5);
        assert_eq!(config.intersections[0].green, 120.0);
        assert_eq!(config.optimizer, OptimizerConfig::default());
    }

    #[test]
    fn test_optimizer_table() {
        let content = format!("{}\n[optimizer]\ntop_n = 5\nparallel = false\n", CORRIDOR);
        let config: CorridorConfig = toml::from_str(&content).unwrap();
        assert_eq!(config.optimizer.top_n, 5);
        assert!(!config.optimizer.parallel);
        assert_eq!(config.optimizer.resolution_s, 0.5);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CORRIDOR.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.intersections[0].name, "수청4R");
    }

    #[test]
    fn test_load_config_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[corridor]\n").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse corridor file"));
    }
}
