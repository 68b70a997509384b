// ============================================================================
// Configuration
// ============================================================================
// Deux réglages seulement, surchargeables par variables d'environnement :
// - LAZYFX_API_URL : URL de l'API Frankfurter
// - LAZYFX_LOG_DIR : dossier des fichiers de logs
// ============================================================================

use std::path::PathBuf;

use crate::api::DEFAULT_BASE_URL;

/// Variable d'environnement pour l'URL de l'API
pub const API_URL_VAR: &str = "LAZYFX_API_URL";

/// Variable d'environnement pour le dossier des logs
pub const LOG_DIR_VAR: &str = "LAZYFX_LOG_DIR";

/// Configuration de l'application
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// URL de base de l'API (ex: "https://api.frankfurter.app")
    pub api_url: String,

    /// Dossier où écrire les logs
    pub log_dir: PathBuf,
}

impl Config {
    /// Lit la configuration depuis l'environnement du processus
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Lit la configuration via une fonction de lookup
    ///
    /// CONCEPT RUST : Closure en paramètre (impl Fn)
    /// - Les tests passent une fausse source sans toucher à l'environnement
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup(API_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let log_dir = lookup(LOG_DIR_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);

        Self { api_url, log_dir }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Dossier de logs par défaut
///
/// - Linux/WSL : ~/.local/share/lazyfx/logs
/// - macOS : ~/Library/Application Support/lazyfx/logs
/// - Windows : C:\Users\<user>\AppData\Local\lazyfx\logs
/// - Sinon : ./logs
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("lazyfx").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_BASE_URL);
        assert!(config.log_dir.ends_with("logs"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(|key| match key {
            API_URL_VAR => Some("http://127.0.0.1:9000".to_string()),
            LOG_DIR_VAR => Some("/tmp/lazyfx-logs".to_string()),
            _ => None,
        });

        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/lazyfx-logs"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = Config::from_lookup(|_| Some("   ".to_string()));
        assert_eq!(config.api_url, DEFAULT_BASE_URL);
    }
}
