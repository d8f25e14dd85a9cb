//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CATEGORIZER_*` environment variables.
//! Ranking parameters are sanitized on load, so a [`Config`] never carries an
//! out-of-range value.

pub mod error;
pub mod ranking;


pub use error::ConfigError;
pub use ranking::{ClusterConfig, Mode, RankingConfig};

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{DEFAULT_L1_CAPACITY, DEFAULT_STUB_EMBEDDING_DIM};
use crate::scoring::ReviewPolicy;
use crate::vectordb::DimensionPolicy;

/// Default on-disk embedding cache directory.
pub const DEFAULT_CACHE_DIR: &str = "./.data/embeddings";

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CATEGORIZER_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Ranking parameters (already sanitized).
    pub ranking: RankingConfig,

    /// Disk tier directory; `None` keeps the cache in memory only.
    /// Default: `./.data/embeddings`. Set the variable to an empty string to disable.
    pub cache_dir: Option<PathBuf>,

    /// Max entries in the in-memory tier. Default: `50_000`.
    pub l1_capacity: u64,

    /// Seed list file (newline, comma or semicolon separated).
    pub seeds_path: Option<PathBuf>,

    /// JSON keyword rules overlaid on the built-in rules.
    pub rules_path: Option<PathBuf>,

    /// Output dimension of the built-in stub embedder. Default: `256`.
    pub embedding_dim: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ranking: RankingConfig::default(),
            cache_dir: Some(PathBuf::from(DEFAULT_CACHE_DIR)),
            l1_capacity: DEFAULT_L1_CAPACITY,
            seeds_path: None,
            rules_path: None,
            embedding_dim: DEFAULT_STUB_EMBEDDING_DIM,
        }
    }
}

impl Config {
    const ENV_MODE: &'static str = "CATEGORIZER_MODE";
    const ENV_TOP_K: &'static str = "CATEGORIZER_TOP_K";
    const ENV_WEIGHT_TAXONOMY: &'static str = "CATEGORIZER_WEIGHT_TAXONOMY";
    const ENV_SEED_BIAS: &'static str = "CATEGORIZER_SEED_BIAS";
    const ENV_USE_TAXONOMY: &'static str = "CATEGORIZER_USE_TAXONOMY";
    const ENV_CLUSTER_ENABLED: &'static str = "CATEGORIZER_CLUSTER_ENABLED";
    const ENV_CLUSTER_THRESHOLD: &'static str = "CATEGORIZER_CLUSTER_THRESHOLD";
    const ENV_REVIEW_TOP1: &'static str = "CATEGORIZER_REVIEW_TOP1";
    const ENV_REVIEW_MARGIN: &'static str = "CATEGORIZER_REVIEW_MARGIN";
    const ENV_REVIEW_MEAN: &'static str = "CATEGORIZER_REVIEW_MEAN";
    const ENV_REVIEW_POLICY: &'static str = "CATEGORIZER_REVIEW_POLICY";
    const ENV_DIMENSION_POLICY: &'static str = "CATEGORIZER_DIMENSION_POLICY";
    const ENV_CACHE_DIR: &'static str = "CATEGORIZER_CACHE_DIR";
    const ENV_L1_CAPACITY: &'static str = "CATEGORIZER_L1_CAPACITY";
    const ENV_SEEDS_PATH: &'static str = "CATEGORIZER_SEEDS_PATH";
    const ENV_RULES_PATH: &'static str = "CATEGORIZER_RULES_PATH";
    const ENV_EMBEDDING_DIM: &'static str = "CATEGORIZER_EMBEDDING_DIM";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let d = defaults.ranking;

        let mode = env::var(Self::ENV_MODE)
            .map(|v| Mode::parse(&v))
            .unwrap_or(d.mode);

        let review_policy = match Self::non_empty_var(Self::ENV_REVIEW_POLICY) {
            Some(value) => {
                ReviewPolicy::parse(&value).ok_or(ConfigError::InvalidChoice {
                    name: Self::ENV_REVIEW_POLICY,
                    value,
                    expected: "full, margin_only",
                })?
            }
            None => d.review_policy,
        };

        let dimension_policy = match Self::non_empty_var(Self::ENV_DIMENSION_POLICY) {
            Some(value) => {
                DimensionPolicy::parse(&value).ok_or(ConfigError::InvalidChoice {
                    name: Self::ENV_DIMENSION_POLICY,
                    value,
                    expected: "strict, truncate",
                })?
            }
            None => d.dimension_policy,
        };

        let ranking = RankingConfig {
            mode,
            top_k: Self::parse_int_from_env(Self::ENV_TOP_K, d.top_k)?,
            weight_taxonomy: Self::parse_f32_from_env(Self::ENV_WEIGHT_TAXONOMY, d.weight_taxonomy)?,
            seed_bias: Self::parse_f32_from_env(Self::ENV_SEED_BIAS, d.seed_bias)?,
            use_taxonomy: Self::parse_bool_from_env(Self::ENV_USE_TAXONOMY, d.use_taxonomy)?,
            cluster: ClusterConfig {
                enabled: Self::parse_bool_from_env(Self::ENV_CLUSTER_ENABLED, d.cluster.enabled)?,
                threshold: Self::parse_f32_from_env(
                    Self::ENV_CLUSTER_THRESHOLD,
                    d.cluster.threshold,
                )?,
            },
            review: crate::scoring::ReviewThresholds {
                top1: Self::parse_f32_from_env(Self::ENV_REVIEW_TOP1, d.review.top1)?,
                margin: Self::parse_f32_from_env(Self::ENV_REVIEW_MARGIN, d.review.margin)?,
                mean: Self::parse_f32_from_env(Self::ENV_REVIEW_MEAN, d.review.mean)?,
            },
            review_policy,
            dimension_policy,
        }
        .sanitized();

        let cache_dir = match env::var(Self::ENV_CACHE_DIR) {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(PathBuf::from(value.trim())),
            Err(_) => defaults.cache_dir,
        };

        let embedding_dim = Self::parse_int_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        if embedding_dim == 0 {
            return Err(ConfigError::InvalidDimension {
                value: embedding_dim,
            });
        }

        Ok(Self {
            ranking,
            cache_dir,
            l1_capacity: Self::parse_int_from_env(Self::ENV_L1_CAPACITY, defaults.l1_capacity)?,
            seeds_path: Self::parse_optional_path_from_env(Self::ENV_SEEDS_PATH),
            rules_path: Self::parse_optional_path_from_env(Self::ENV_RULES_PATH),
            embedding_dim,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    ///
    /// A missing rules file is allowed; the built-in rules are used instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.cache_dir
            && dir.exists()
            && !dir.is_dir()
        {
            return Err(ConfigError::NotADirectory { path: dir.clone() });
        }

        if let Some(ref path) = self.seeds_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if let Some(ref path) = self.rules_path
            && path.exists()
            && !path.is_file()
        {
            return Err(ConfigError::NotAFile { path: path.clone() });
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidDimension {
                value: self.embedding_dim,
            });
        }

        Ok(())
    }

    fn non_empty_var(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::non_empty_var(var_name).map(PathBuf::from)
    }

    fn parse_int_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr<Err = std::num::ParseIntError>,
    {
        match Self::non_empty_var(var_name) {
            Some(value) => value.parse().map_err(|e| ConfigError::IntParseError {
                name: var_name,
                value,
                source: e,
            }),
            None => Ok(default),
        }
    }

    fn parse_f32_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match Self::non_empty_var(var_name) {
            Some(value) => value.parse().map_err(|e| ConfigError::FloatParseError {
                name: var_name,
                value,
                source: e,
            }),
            None => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Some(value) = Self::non_empty_var(var_name) else {
            return Ok(default);
        };
        match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidBool {
                name: var_name,
                value,
            }),
        }
    }
}
