//! PromptCaller configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::output::Platform;
use crate::template::Keywords;

/// Main PromptCaller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where templates and the dataset live
    pub paths: PathsConfig,

    /// Keyword sets used to type placeholders
    pub keywords: Keywords,

    /// Dataset search settings
    pub search: SearchConfig,

    /// Output targets
    pub output: OutputConfig,

    /// Number of rendered lines shown before choosing an output
    #[serde(rename = "preview-lines")]
    pub preview_lines: usize,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            keywords: Keywords::default(),
            search: SearchConfig::default(),
            output: OutputConfig::default(),
            preview_lines: 10,
            log_level: None,
        }
    }
}

impl Config {
    /// Config files to try, in order: the explicit path alone, or else the
    /// project-local `.promptcaller.yml` then the user config, whichever exist
    pub fn candidate_paths(config_path: Option<&PathBuf>) -> Vec<PathBuf> {
        if let Some(path) = config_path {
            return vec![path.clone()];
        }

        let mut paths = Vec::new();
        let local_config = PathBuf::from(".promptcaller.yml");
        if local_config.exists() {
            paths.push(local_config);
        }
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("promptcaller").join("promptcaller.yml");
            if user_config.exists() {
                paths.push(user_config);
            }
        }
        paths
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::candidate_paths(None) {
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up.
    ///
    /// Walks the same chain as [`Config::load`]; errors are swallowed here
    /// and reported by the full load.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::candidate_paths(config_path)
            .into_iter()
            .find_map(|path| {
                let content = fs::read_to_string(path).ok()?;
                serde_yaml::from_str::<Self>(&content).ok()
            })
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Template and dataset locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base directory for the relative paths below (default: current directory)
    #[serde(rename = "base-dir")]
    pub base_dir: Option<PathBuf>,

    /// Directory holding `*.md` templates
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: PathBuf,

    /// JSON dataset used by lookup placeholders
    #[serde(rename = "dataset-file")]
    pub dataset_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            prompts_dir: PathBuf::from("prompts"),
            dataset_file: PathBuf::from("stocks.json"),
        }
    }
}

impl PathsConfig {
    /// Override the base directory (the positional CLI argument)
    pub fn with_base_dir(mut self, base_dir: Option<PathBuf>) -> Self {
        if base_dir.is_some() {
            self.base_dir = base_dir;
        }
        self
    }

    fn base(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    fn expand(&self, path: &Path) -> PathBuf {
        if let Ok(rest) = path.strip_prefix("~")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        if path.is_absolute() { path.to_path_buf() } else { self.base().join(path) }
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.expand(&self.prompts_dir)
    }

    pub fn dataset_file(&self) -> PathBuf {
        self.expand(&self.dataset_file)
    }
}

/// Dataset search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum matches listed by the plain lookup
    pub limit: usize,

    /// Maximum suggestions shown while typing
    #[serde(rename = "live-limit")]
    pub live_limit: usize,

    /// Use the live-suggesting editor when the terminal allows it
    pub live: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 8,
            live_limit: 10,
            live: true,
        }
    }
}

/// Output targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Target used when the output prompt is left empty ("clipboard" or a platform key)
    pub default: String,

    /// Browser destinations, listed after the clipboard
    pub platforms: Vec<Platform>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let platform = |key: &str, label: &str, url: &str| Platform {
            key: key.to_string(),
            label: label.to_string(),
            url: url.to_string(),
        };

        Self {
            default: "pplx".to_string(),
            platforms: vec![
                platform("pplx", "Perplexity", "https://www.perplexity.ai/"),
                platform("yuanbao", "Yuanbao", "https://yuanbao.tencent.com/"),
                platform("openai", "OpenAI", "https://chat.openai.com/"),
                platform("deepseek", "DeepSeek", "https://chat.deepseek.com/"),
                platform("kimi", "Kimi", "https://kimi.moonshot.cn/"),
                platform("doubao", "Doubao", "https://www.doubao.com/chat/"),
                platform("gemini", "Gemini", "https://gemini.google.com/app"),
                platform("grok", "Grok", "https://x.com/i/grok"),
            ],
        }
    }
}
