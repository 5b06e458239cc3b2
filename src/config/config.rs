use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;

/// rCRS length; positions past this are outside the mitochondrial contig.
pub const RCRS_LENGTH: u32 = 16569;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_contig_length")]
    pub contig_length: u32,
    #[serde(default)]
    pub layout: TreeLayout,
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f64,
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}

/// Display size hints attached to every polymorphism node of a merged tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeLayout {
    #[serde(default = "default_row_height")]
    pub row_height: u32,
    #[serde(default = "default_base_height")]
    pub base_height: u32,
    #[serde(default = "default_node_width")]
    pub node_width: u32,
}

fn default_contig_length() -> u32 {
    RCRS_LENGTH
}

fn default_tie_epsilon() -> f64 {
    1e-9
}

fn default_worker_threads() -> usize {
    4
}

fn default_row_height() -> u32 {
    13
}

fn default_base_height() -> u32 {
    10
}

fn default_node_width() -> u32 {
    50
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            row_height: default_row_height(),
            base_height: default_base_height(),
            node_width: default_node_width(),
        }
    }
}

impl TreeLayout {
    /// Height for a node listing `polys` polymorphisms.
    pub fn height_for(&self, polys: usize) -> u32 {
        polys as u32 * self.row_height + self.base_height
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contig_length: default_contig_length(),
            layout: TreeLayout::default(),
            tie_epsilon: default_tie_epsilon(),
            worker_threads: default_worker_threads(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("com", "haplocheck", "haplocheck-tools") {
            let config_path = proj_dirs.config_dir().join("config.toml");

            if config_path.exists() {
                match fs::read_to_string(&config_path) {
                    Ok(content) => match Self::from_toml_str(&content) {
                        Ok(config) => return config,
                        Err(e) => tracing::warn!(
                            "Ignoring malformed config {}: {}",
                            config_path.display(),
                            e
                        ),
                    },
                    Err(e) => tracing::warn!("Cannot read {}: {}", config_path.display(), e),
                }
            }
        }
        Config::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "haplocheck", "haplocheck-tools") {
            let config_dir = proj_dirs.config_dir();
            fs::create_dir_all(config_dir)?;

            let config_path = config_dir.join("config.toml");
            let content = toml::to_string_pretty(self)?;
            fs::write(config_path, content)?;
        }
        Ok(())
    }
}
