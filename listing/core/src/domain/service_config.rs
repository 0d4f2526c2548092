// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Service Configuration Types
//
// Defines the configuration schema for a ListingGenius service, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Default provider selection
// - Per-backend credentials and endpoint/model overrides
// - HTTP server and observability settings
//
// Backend defaults (endpoints, model ids, timeouts) live with the adapters in
// infrastructure/llm; this file only carries overrides.

use crate::domain::llm::{ProviderKind, FALLBACK_PROVIDER};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "listinggenius/v1";
pub const MANIFEST_KIND: &str = "ServiceConfig";

/// Environment variable that points at a configuration file.
pub const CONFIG_PATH_ENV: &str = "LISTING_GENIUS_CONFIG_PATH";

/// Top-level Kubernetes-style service configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfigManifest {
    /// API version (must be "listinggenius/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ServiceConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: ServiceConfigSpec,
}

/// Manifest metadata (Kubernetes-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable service name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfigSpec {
    #[serde(default)]
    pub llm_selection: LLMSelection,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observability: Option<ObservabilityConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LLMSelection {
    /// Provider used when a request names none ("openai", "gemini", "kimi").
    /// Kept as text so an unknown value degrades to a warning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,

    #[serde(default)]
    pub gemini: ProviderConfig,

    #[serde(default)]
    pub kimi: ProviderConfig,
}

impl ProvidersConfig {
    pub fn get(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::OpenAI => &self.openai,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Kimi => &self.kimi,
        }
    }

    pub fn get_mut(&mut self, kind: ProviderKind) -> &mut ProviderConfig {
        match kind {
            ProviderKind::OpenAI => &mut self.openai,
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::Kimi => &mut self.kimi,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Whether this backend is registered at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// API key (supports "env:VAR_NAME" for environment variables)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides the adapter's built-in endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model used for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Model used for translation (defaults per adapter)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_model: Option<String>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            endpoint: None,
            model: None,
            translation_model: None,
            timeout_secs: None,
        }
    }
}

impl ProviderConfig {
    /// Resolve the API key, following "env:VAR_NAME" indirection.
    ///
    /// A missing variable yields an empty key: the adapter reports
    /// `CredentialMissing` at first use instead of failing startup.
    pub fn resolved_api_key(&self) -> String {
        match self.api_key.as_deref() {
            Some(k) if k.starts_with("env:") => {
                let var_name = &k["env:".len()..];
                match std::env::var(var_name) {
                    Ok(value) => clean_env_value(&value),
                    Err(_) => {
                        tracing::warn!("Environment variable not set: {}", var_name);
                        String::new()
                    }
                }
            }
            Some(k) => clean_env_value(k),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Maximum accepted JSON body size (inline images are large)
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus exposition
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8016
}

fn default_body_limit() -> usize {
    25 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for ServiceConfigManifest {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "listing-genius".to_string());

        Self {
            api_version: API_VERSION.to_string(),
            kind: MANIFEST_KIND.to_string(),
            metadata: ManifestMetadata {
                name: hostname,
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: ServiceConfigSpec::default(),
        }
    }
}

/// Trim a configuration value and strip one layer of matching quotes, so
/// `KEY="sk-..."` in a `.env` file behaves like `KEY=sk-...`.
pub fn clean_env_value(value: &str) -> String {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

impl ServiceConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Candidate configuration paths in precedence order
    /// 1. LISTING_GENIUS_CONFIG_PATH environment variable
    /// 2. ./listing-genius.yaml (working directory)
    /// 3. ~/.listing-genius/config.yaml (user home)
    /// 4. /etc/listing-genius/config.yaml (system, Unix)
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./listing-genius.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".listing-genius").join("config.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/listing-genius/config.yaml"));

        paths
    }

    pub fn discover_config() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(config_path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", config_path);
                Self::from_yaml_file(&config_path).map_err(|e| {
                    anyhow::anyhow!("Failed to load config at {:?}: {}", config_path, e)
                })?
            }
            None => {
                tracing::debug!("No configuration file found in standard locations. Using defaults.");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply process environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source. Empty values are
    /// ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| clean_env_value(&v))
                .filter(|v| !v.is_empty())
        };

        for kind in ProviderKind::ALL {
            if let Some(key) = get(kind.credential_env_var()) {
                tracing::debug!("Environment override: {} credential", kind);
                self.spec.providers.get_mut(kind).api_key = Some(key);
            }
        }

        if let Some(model) = get("KIMI_MODEL") {
            tracing::info!("Environment override: KIMI_MODEL={}", model);
            self.spec.providers.kimi.model = Some(model);
        }

        if let Some(url) = get("KIMI_BASE_URL") {
            tracing::info!("Environment override: KIMI_BASE_URL={}", url);
            self.spec.providers.kimi.endpoint = Some(url);
        }

        if let Some(provider) = get("LLM_PROVIDER") {
            tracing::info!("Environment override: LLM_PROVIDER={}", provider);
            self.spec.llm_selection.default_provider = Some(provider);
        }

        if let Some(port) = get("PORT") {
            match port.parse::<u16>() {
                Ok(port) => {
                    tracing::info!("Environment override: PORT={}", port);
                    self.spec.server.port = port;
                }
                Err(_) => {
                    tracing::warn!("Invalid value for PORT: '{}'. Ignoring.", port);
                }
            }
        }
    }

    /// Provider used when a request names none.
    ///
    /// An unrecognized configured name is not fatal: it logs a warning and
    /// falls back to openai.
    pub fn default_provider(&self) -> ProviderKind {
        match self.spec.llm_selection.default_provider.as_deref() {
            None => FALLBACK_PROVIDER,
            Some(name) => name.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "Unknown default provider '{}', using {}",
                    name,
                    FALLBACK_PROVIDER
                );
                FALLBACK_PROVIDER
            }),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != MANIFEST_KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, MANIFEST_KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if self.spec.server.port == 0 {
            anyhow::bail!("spec.server.port cannot be 0");
        }

        for kind in ProviderKind::ALL {
            let provider = self.spec.providers.get(kind);
            if !provider.enabled {
                continue;
            }

            if let Some(endpoint) = &provider.endpoint {
                url::Url::parse(endpoint).map_err(|e| {
                    anyhow::anyhow!("Invalid endpoint for provider {}: '{}' ({})", kind, endpoint, e)
                })?;
            }

            for model in [&provider.model, &provider.translation_model].into_iter().flatten() {
                if model.trim().is_empty() {
                    anyhow::bail!("Model identifier cannot be empty for provider: {}", kind);
                }
            }

            if provider.timeout_secs == Some(0) {
                anyhow::bail!("timeout_secs must be positive for provider: {}", kind);
            }
        }

        // The default provider must be usable when it is a known name
        let default = self.default_provider();
        if !self.spec.providers.get(default).enabled {
            anyhow::bail!("Default provider '{}' is disabled", default);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_manifest() {
        let manifest = ServiceConfigManifest::default();
        assert_eq!(manifest.api_version, API_VERSION);
        assert_eq!(manifest.kind, MANIFEST_KIND);
        assert!(!manifest.metadata.name.is_empty());
        assert_eq!(manifest.spec.server.port, 8016);
        assert!(manifest.spec.providers.gemini.enabled);
        assert_eq!(manifest.default_provider(), ProviderKind::OpenAI);
    }

    #[test]
    fn test_yaml_parsing_with_partial_providers() {
        let yaml = r#"
apiVersion: listinggenius/v1
kind: ServiceConfig
metadata:
  name: test-service
spec:
  llm_selection:
    default_provider: gemini
  providers:
    gemini:
      api_key: g-key
      model: gemini-3-flash-preview
    kimi:
      enabled: false
  server:
    port: 9000
"#;
        let manifest = ServiceConfigManifest::from_yaml_str(yaml).unwrap();

        assert_eq!(manifest.metadata.name, "test-service");
        assert_eq!(manifest.default_provider(), ProviderKind::Gemini);
        assert_eq!(manifest.spec.providers.gemini.resolved_api_key(), "g-key");
        assert!(manifest.spec.providers.openai.enabled);
        assert!(!manifest.spec.providers.kimi.enabled);
        assert_eq!(manifest.spec.server.port, 9000);
        assert_eq!(manifest.spec.server.bind_address, "0.0.0.0");
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_unknown_default_provider_falls_back() {
        let mut manifest = ServiceConfigManifest::default();
        manifest.spec.llm_selection.default_provider = Some("claude".to_string());

        assert_eq!(manifest.default_provider(), ProviderKind::OpenAI);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut manifest = ServiceConfigManifest::default();
        let vars: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_API_KEY", "  \"sk-test\"  "),
            ("GOOGLE_GEMINI_API_KEY", ""),
            ("KIMI_API_KEY", "'kimi-key'"),
            ("KIMI_MODEL", "kimi-latest"),
            ("KIMI_BASE_URL", "http://localhost:9999/v1/chat/completions"),
            ("LLM_PROVIDER", "KIMI"),
            ("PORT", "not-a-port"),
        ]);

        manifest.apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()));

        let providers = &manifest.spec.providers;
        assert_eq!(providers.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(providers.gemini.api_key, None);
        assert_eq!(providers.kimi.api_key.as_deref(), Some("kimi-key"));
        assert_eq!(providers.kimi.model.as_deref(), Some("kimi-latest"));
        assert_eq!(
            providers.kimi.endpoint.as_deref(),
            Some("http://localhost:9999/v1/chat/completions")
        );
        assert_eq!(manifest.default_provider(), ProviderKind::Kimi);
        assert_eq!(manifest.spec.server.port, 8016);
    }

    #[test]
    fn test_clean_env_value() {
        assert_eq!(clean_env_value("  plain "), "plain");
        assert_eq!(clean_env_value("\"quoted\""), "quoted");
        assert_eq!(clean_env_value("'single'"), "single");
        assert_eq!(clean_env_value("\"mismatched'"), "\"mismatched'");
        assert_eq!(clean_env_value("\""), "\"");
    }

    #[test]
    fn test_api_key_env_indirection() {
        let config = ProviderConfig {
            api_key: Some("env:LISTING_GENIUS_TEST_UNSET_VARIABLE".to_string()),
            ..ProviderConfig::default()
        };
        assert_eq!(config.resolved_api_key(), "");
    }

    #[test]
    fn test_validation() {
        let mut manifest = ServiceConfigManifest::default();
        assert!(manifest.validate().is_ok());

        manifest.api_version = "wrong/v1".to_string();
        assert!(manifest.validate().is_err());
        manifest.api_version = API_VERSION.to_string();

        manifest.kind = "NodeConfig".to_string();
        assert!(manifest.validate().is_err());
        manifest.kind = MANIFEST_KIND.to_string();

        manifest.metadata.name = "".to_string();
        assert!(manifest.validate().is_err());
        manifest.metadata.name = "test".to_string();

        manifest.spec.providers.gemini.endpoint = Some("not a url".to_string());
        assert!(manifest.validate().is_err());
        manifest.spec.providers.gemini.endpoint = None;

        manifest.spec.providers.kimi.model = Some("  ".to_string());
        assert!(manifest.validate().is_err());
        manifest.spec.providers.kimi.model = None;

        manifest.spec.providers.openai.enabled = false;
        assert!(manifest.validate().is_err());
        manifest.spec.llm_selection.default_provider = Some("gemini".to_string());
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "apiVersion: listinggenius/v1\nkind: ServiceConfig\nmetadata:\n  name: from-file\n"
        )
        .unwrap();

        let manifest =
            ServiceConfigManifest::load_or_default(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(manifest.metadata.name, "from-file");

        let missing = ServiceConfigManifest::load_or_default(Some(PathBuf::from(
            "/nonexistent/listing-genius.yaml",
        )));
        assert!(missing.is_err());
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut manifest = ServiceConfigManifest::default();
        manifest.spec.providers.openai.model = Some("gpt-4o-mini".to_string());
        manifest.to_yaml_file(&path).unwrap();

        let parsed = ServiceConfigManifest::from_yaml_file(&path).unwrap();
        assert_eq!(parsed.spec.providers.openai.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(parsed.metadata.name, manifest.metadata.name);
    }
}
