//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `DOCENT_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::fmt::Display;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CHUNK_MAX_CHARS, DEFAULT_CHUNK_MIN_CHARS, DEFAULT_CORS_ORIGIN,
    DEFAULT_GENERATION_MODEL, DEFAULT_GENERATION_TIMEOUT_MS, DEFAULT_MAX_UPLOAD_BYTES,
    DEFAULT_MIN_OVERLAP, DEFAULT_PDFTOTEXT_BIN, DEFAULT_TOP_K,
};
use crate::index::{ChunkerConfig, IndexerConfig};
use crate::ingest::IngestConfig;
use crate::retrieval::RetrieverConfig;
use crate::scope::ScopeConfig;
use crate::synthesis::{GenerativeConfig, SynthesisMode};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `DOCENT_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory for the document archive. Default: `./.data`.
    pub storage_path: PathBuf,

    /// Answer synthesis mode. Default: extractive.
    pub synthesis: SynthesisMode,

    /// Chat model used in generative mode.
    pub generation_model: String,

    /// Upper bound for one generation call. Default: 10s.
    pub generation_timeout: Duration,

    /// Answer generative requests with the offline mock generator.
    pub mock_provider: bool,

    pub chunk_max_chars: usize,
    pub chunk_min_chars: usize,

    /// Scope threshold; overlap must be strictly greater. Default: `0.5`.
    pub min_overlap: f32,

    /// Chunks retrieved per query. Default: `3`.
    pub top_k: usize,

    /// Largest accepted upload. Default: 10 MiB.
    pub max_upload_bytes: usize,

    /// Origin allowed by CORS. Default: `http://localhost:4200`.
    pub cors_origin: String,

    /// `pdftotext` executable. Default: looked up on `PATH`.
    pub pdftotext_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            storage_path: PathBuf::from("./.data"),
            synthesis: SynthesisMode::Extractive,
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            generation_timeout: Duration::from_millis(DEFAULT_GENERATION_TIMEOUT_MS),
            mock_provider: false,
            chunk_max_chars: DEFAULT_CHUNK_MAX_CHARS,
            chunk_min_chars: DEFAULT_CHUNK_MIN_CHARS,
            min_overlap: DEFAULT_MIN_OVERLAP,
            top_k: DEFAULT_TOP_K,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            pdftotext_path: PathBuf::from(DEFAULT_PDFTOTEXT_BIN),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "DOCENT_PORT";
    const ENV_BIND_ADDR: &'static str = "DOCENT_BIND_ADDR";
    const ENV_STORAGE_PATH: &'static str = "DOCENT_STORAGE_PATH";
    const ENV_SYNTHESIS: &'static str = "DOCENT_SYNTHESIS";
    const ENV_GENERATION_MODEL: &'static str = "DOCENT_GENERATION_MODEL";
    const ENV_GENERATION_TIMEOUT_MS: &'static str = "DOCENT_GENERATION_TIMEOUT_MS";
    const ENV_MOCK_PROVIDER: &'static str = "DOCENT_MOCK_PROVIDER";
    const ENV_CHUNK_MAX_CHARS: &'static str = "DOCENT_CHUNK_MAX_CHARS";
    const ENV_CHUNK_MIN_CHARS: &'static str = "DOCENT_CHUNK_MIN_CHARS";
    const ENV_MIN_OVERLAP: &'static str = "DOCENT_MIN_OVERLAP";
    const ENV_TOP_K: &'static str = "DOCENT_TOP_K";
    const ENV_MAX_UPLOAD_BYTES: &'static str = "DOCENT_MAX_UPLOAD_BYTES";
    const ENV_CORS_ORIGIN: &'static str = "DOCENT_CORS_ORIGIN";
    const ENV_PDFTOTEXT_PATH: &'static str = "DOCENT_PDFTOTEXT_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let synthesis = Self::parse_from_env(Self::ENV_SYNTHESIS, defaults.synthesis)?;
        let generation_model =
            Self::parse_string_from_env(Self::ENV_GENERATION_MODEL, defaults.generation_model);
        let generation_timeout = Duration::from_millis(Self::parse_from_env(
            Self::ENV_GENERATION_TIMEOUT_MS,
            defaults.generation_timeout.as_millis() as u64,
        )?);
        let mock_provider = Self::parse_flag_from_env(Self::ENV_MOCK_PROVIDER);
        let chunk_max_chars =
            Self::parse_from_env(Self::ENV_CHUNK_MAX_CHARS, defaults.chunk_max_chars)?;
        let chunk_min_chars =
            Self::parse_from_env(Self::ENV_CHUNK_MIN_CHARS, defaults.chunk_min_chars)?;
        let min_overlap = Self::parse_from_env(Self::ENV_MIN_OVERLAP, defaults.min_overlap)?;
        let top_k = Self::parse_from_env(Self::ENV_TOP_K, defaults.top_k)?;
        let max_upload_bytes =
            Self::parse_from_env(Self::ENV_MAX_UPLOAD_BYTES, defaults.max_upload_bytes)?;
        let cors_origin = Self::parse_string_from_env(Self::ENV_CORS_ORIGIN, defaults.cors_origin);
        let pdftotext_path =
            Self::parse_path_from_env(Self::ENV_PDFTOTEXT_PATH, defaults.pdftotext_path);

        Ok(Self {
            port,
            bind_addr,
            storage_path,
            synthesis,
            generation_model,
            generation_timeout,
            mock_provider,
            chunk_max_chars,
            chunk_min_chars,
            min_overlap,
            top_k,
            max_upload_bytes,
            cors_origin,
            pdftotext_path,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        let component_checks = [
            (Self::ENV_CHUNK_MIN_CHARS, self.indexer_config().chunker.validate()),
            (Self::ENV_MIN_OVERLAP, self.scope_config().validate()),
            (Self::ENV_TOP_K, self.retriever_config().validate()),
            (
                Self::ENV_GENERATION_TIMEOUT_MS,
                self.generative_config().validate(),
            ),
        ];
        for (name, check) in component_checks {
            check.map_err(|reason| ConfigError::InvalidValue {
                name,
                value: self.describe(name),
                reason,
            })?;
        }

        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_UPLOAD_BYTES,
                value: "0".to_string(),
                reason: "upload limit must be greater than zero".to_string(),
            });
        }
        if self.generation_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_GENERATION_MODEL,
                value: self.generation_model.clone(),
                reason: "model name must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig {
            chunker: ChunkerConfig {
                max_chars: self.chunk_max_chars,
                min_chars: self.chunk_min_chars,
            },
            ..Default::default()
        }
    }

    pub fn scope_config(&self) -> ScopeConfig {
        ScopeConfig {
            min_overlap: self.min_overlap,
        }
    }

    pub fn retriever_config(&self) -> RetrieverConfig {
        RetrieverConfig {
            top_k: self.top_k,
            ..Default::default()
        }
    }

    pub fn generative_config(&self) -> GenerativeConfig {
        GenerativeConfig {
            timeout: self.generation_timeout,
            ..Default::default()
        }
    }

    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig {
            max_upload_bytes: self.max_upload_bytes,
            pdftotext_path: self.pdftotext_path.clone(),
        }
    }

    fn describe(&self, name: &str) -> String {
        match name {
            Self::ENV_CHUNK_MIN_CHARS => {
                format!("{} (max {})", self.chunk_min_chars, self.chunk_max_chars)
            }
            Self::ENV_MIN_OVERLAP => self.min_overlap.to_string(),
            Self::ENV_TOP_K => self.top_k.to_string(),
            Self::ENV_GENERATION_TIMEOUT_MS => self.generation_timeout.as_millis().to_string(),
            _ => String::new(),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match env::var(var_name) {
            Ok(value) if !value.trim().is_empty() => {
                value
                    .trim()
                    .parse()
                    .map_err(|e: T::Err| ConfigError::InvalidValue {
                        name: var_name,
                        value: value.clone(),
                        reason: e.to_string(),
                    })
            }
            _ => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    }

    fn parse_flag_from_env(var_name: &str) -> bool {
        env::var_os(var_name).is_some_and(|v| !v.is_empty() && v != "0" && v != "false")
    }
}
