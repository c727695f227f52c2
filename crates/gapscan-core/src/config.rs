use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// DBSCAN parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    /// Neighborhood radius in Euclidean embedding space.
    pub epsilon: f32,
    /// Neighbors (self excluded) a point needs to be a core point.
    pub min_samples: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self { epsilon: 0.15, min_samples: 3 }
    }
}

impl ClusterParams {
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::invalid_config(format!(
                "clustering.epsilon must be a positive number, got {}",
                self.epsilon
            )));
        }
        if self.min_samples == 0 {
            return Err(Error::invalid_config("clustering.min_samples must be >= 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapParams {
    /// A cluster is covered when its best paragraph similarity reaches this value.
    pub coverage_threshold: f32,
}

impl Default for GapParams {
    fn default() -> Self {
        Self { coverage_threshold: 0.65 }
    }
}

impl GapParams {
    pub fn validate(&self) -> Result<()> {
        if !self.coverage_threshold.is_finite() || !(-1.0..=1.0).contains(&self.coverage_threshold) {
            return Err(Error::invalid_config(format!(
                "gaps.coverage_threshold must lie in [-1, 1], got {}",
                self.coverage_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingParams {
    /// Number of ranked gaps kept per page. `0` keeps all of them.
    pub top_n: usize,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self { top_n: 3 }
    }
}

impl RankingParams {
    pub fn limit(&self) -> Option<usize> {
        (self.top_n > 0).then_some(self.top_n)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputParams {
    /// Upper bound on keywords clustered per page; clustering is O(n²).
    pub max_keywords: usize,
    pub min_impressions: u64,
}

impl Default for InputParams {
    fn default() -> Self {
        Self { max_keywords: 500, min_impressions: 0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub clustering: ClusterParams,
    pub gaps: GapParams,
    pub ranking: RankingParams,
    pub input: InputParams,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.clustering.validate()?;
        self.gaps.validate()?;
        if self.input.max_keywords == 0 {
            return Err(Error::invalid_config("input.max_keywords must be >= 1"));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Loads `gapscan.toml` + `gapscan.<env>.toml` from the working directory,
    /// then `GAPSCAN_*` environment variables (`__` separates nested keys).
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("GAPSCAN_ENV").unwrap_or_else(|_| "dev".to_string());
        let config = Self::load_from(Path::new("."), &env_name)?;
        Ok(Self {
            figment: config.figment.merge(Env::prefixed("GAPSCAN_").split("__")),
        })
    }

    /// Same as [`Config::load`] without the environment layer, reading files from `dir`.
    pub fn load_from(dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()))
            .merge(Toml::file(dir.join("gapscan.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("gapscan.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("gapscan.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("gapscan.test.toml"))),
            _ => {}
        }
        Ok(Self { figment })
    }

    /// Extracts and validates the engine parameters.
    pub fn engine(&self) -> anyhow::Result<EngineConfig> {
        let engine: EngineConfig = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read engine config: {}", e))?;
        engine.validate()?;
        Ok(engine)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
