//! Configuration loaded from `dallebot.toml`.
//!
//! Values absent from the file fall back to sensible defaults. Credentials
//! from the process environment (`OPENAI_API_KEY`, `OPENAI_ORGANIZATION`,
//! `IMGUR_CLIENT_ID`) take precedence over the file, so secrets never have
//! to live on disk.

use anyhow::{Result, bail};
use tracing::log::LevelFilter;
use serde::Deserialize;
use std::path::Path;

use crate::manipulate::ManipulationSet;

/// Which artifact store backend re-hosts generated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    S3,
    Imgur,
}

/// Top-level configuration loaded from `dallebot.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// OpenAI API key.
    #[serde(default)]
    pub openai_api_key: String,

    /// OpenAI organization header, if the account needs one.
    #[serde(default)]
    pub openai_organization: Option<String>,

    /// Selected artifact store backend.
    #[serde(default = "default_store")]
    pub store: StoreBackend,

    /// Image size requested from the generator.
    #[serde(default = "default_image_size")]
    pub image_size: String,

    /// Run the moderation endpoint over prompts before generating.
    /// Off by default: it flags differently from the image endpoint's own
    /// filtering.
    #[serde(default)]
    pub moderation_enabled: bool,

    #[serde(default)]
    pub s3: S3Config,

    #[serde(default)]
    pub imgur: ImgurConfig,

    /// Per-user prompt manipulation rules.
    #[serde(default)]
    pub manipulations: ManipulationSet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    #[serde(default = "default_region")]
    pub region: String,

    /// Bucket the re-encoded JPEGs land in.
    #[serde(default)]
    pub bucket: String,

    /// Public base URL (CDN distribution) the bucket is served from.
    #[serde(default)]
    pub public_base_url: String,

    /// JPEG quality for the re-encode.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImgurConfig {
    #[serde(default)]
    pub client_id: String,
}

fn default_store() -> StoreBackend {
    StoreBackend::Imgur
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_jpeg_quality() -> u8 {
    50
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: default_region(),
            bucket: String::new(),
            public_base_url: String::new(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_organization: None,
            store: default_store(),
            image_size: default_image_size(),
            moderation_enabled: false,
            s3: S3Config::default(),
            imgur: ImgurConfig::default(),
            manipulations: ManipulationSet::default(),
        }
    }
}

impl BotConfig {
    /// Load configuration from `dallebot.toml` in the current directory,
    /// falling back to defaults if the file does not exist, then overlay
    /// credentials from the environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(Path::new("dallebot.toml"))?;

        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.is_empty()
        {
            config.openai_api_key = key;
        }
        if let Ok(org) = std::env::var("OPENAI_ORGANIZATION")
            && !org.is_empty()
        {
            config.openai_organization = Some(org);
        }
        if let Ok(id) = std::env::var("IMGUR_CLIENT_ID")
            && !id.is_empty()
        {
            config.imgur.client_id = id;
        }

        Ok(config)
    }

    /// Parse configuration from `path`, or defaults if it does not exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<BotConfig>(&contents)?)
    }

    /// Check that everything the selected backend needs is present and that
    /// the manipulation rules are well formed.
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.is_empty() {
            bail!("OPENAI_API_KEY is not set (environment or dallebot.toml)");
        }
        match self.store {
            StoreBackend::S3 => {
                if self.s3.bucket.is_empty() {
                    bail!("store = \"s3\" requires s3.bucket");
                }
                if self.s3.public_base_url.is_empty() {
                    bail!("store = \"s3\" requires s3.public_base_url");
                }
            }
            StoreBackend::Imgur => {
                if self.imgur.client_id.is_empty() {
                    bail!("store = \"imgur\" requires IMGUR_CLIENT_ID or imgur.client_id");
                }
            }
        }
        self.manipulations.validate()?;
        Ok(())
    }
}

/// Initialize logging for the process.
pub fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !verbose {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("hyper_util", LevelFilter::Warn)
            .with_module_level("reqwest", LevelFilter::Warn)
            .with_module_level("aws_config", LevelFilter::Warn);
    }
    logger.init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = BotConfig::default();
        assert_eq!(config.store, StoreBackend::Imgur);
        assert_eq!(config.image_size, "1024x1024");
        assert_eq!(config.s3.jpeg_quality, 50);
        assert!(!config.moderation_enabled);
        assert!(config.manipulations.is_empty());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            openai_api_key = "sk-test-123"
            store = "s3"

            [s3]
            bucket = "dallepics"
            public_base_url = "https://d2jagmvo7k5q5j.cloudfront.net"
        "#;
        let config: BotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.openai_api_key, "sk-test-123");
        assert_eq!(config.store, StoreBackend::S3);
        assert_eq!(config.s3.bucket, "dallepics");
        assert_eq!(config.s3.region, "us-east-1");
        assert_eq!(config.s3.jpeg_quality, 50);
        config.validate().unwrap();
    }

    #[test]
    fn deserialize_manipulations_table() {
        let toml_str = r#"
            openai_api_key = "sk-test-123"

            [imgur]
            client_id = "abc"

            [manipulations]
            [[manipulations.victim]]
            template = "{prompt} with {choice}"
            choices = ["corn", "corn cob", "popcorn"]

            [[manipulations.victim]]
            template = "a mural made of {choice}, depicting {prompt}"
            choices = ["corn kernels"]
        "#;
        let config: BotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.manipulations.rules_for("victim").len(), 2);
        config.validate().unwrap();
    }

    #[test]
    fn from_file_reads_toml_and_defaults_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dallebot.toml");

        let config = BotConfig::from_file(&path).unwrap();
        assert_eq!(config.store, StoreBackend::Imgur);

        std::fs::write(&path, "openai_api_key = \"sk-from-file\"\n").unwrap();
        let config = BotConfig::from_file(&path).unwrap();
        assert_eq!(config.openai_api_key, "sk-from-file");
    }

    #[test]
    fn validate_rejects_missing_api_key() {
        let config = BotConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_s3_without_bucket() {
        let toml_str = r#"
            openai_api_key = "sk-test-123"
            store = "s3"
        "#;
        let config: BotConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_malformed_manipulation() {
        let toml_str = r#"
            openai_api_key = "sk-test-123"

            [imgur]
            client_id = "abc"

            [manipulations]
            [[manipulations.victim]]
            template = "no placeholders here"
            choices = ["corn"]
        "#;
        let config: BotConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_err());
    }
}
