//! Configuration de l’application (TOML).
//!
//! Chemin : variable `FORMULE_CONFIG`, sinon `formule.toml` dans le dossier courant.
//! Fichier absent => valeurs par défaut.
//!
//! ```toml
//! digits = 20
//!
//! [options]
//! url = "https://exemple.org/options"
//! fichier = "options.json"   # prioritaire sur url
//! timeout_secs = 10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::noyau::lecture::{DIGITS_DEFAUT, DIGITS_MAX};

/// Variable d’environnement donnant le chemin du fichier de configuration.
pub const VAR_CONFIG: &str = "FORMULE_CONFIG";

/// Fichier lu quand la variable n’est pas définie.
pub const FICHIER_DEFAUT: &str = "formule.toml";

/// Liste d’options servie par défaut.
pub const URL_OPTIONS_DEFAUT: &str = "https://652f91320b8d8ddac0b2b62b.mockapi.io/autocomplete";

#[derive(Debug, thiserror::Error)]
pub enum ErreurConfig {
    #[error("lecture du fichier de configuration impossible: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML invalide: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("configuration invalide: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigApp {
    /// Précision de la lecture décimale du résultat.
    #[serde(default = "default_digits")]
    pub digits: usize,

    /// Source des options d’autocomplétion.
    #[serde(default)]
    pub options: ConfigOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigOptions {
    /// Liste distante (GET, tableau JSON). Chaîne vide = désactivée.
    #[serde(default = "default_url")]
    pub url: Option<String>,

    /// Fichier JSON local, prioritaire sur `url`.
    #[serde(default)]
    pub fichier: Option<PathBuf>,

    /// Délai maximal de la requête HTTP.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_digits() -> usize {
    DIGITS_DEFAUT
}

fn default_url() -> Option<String> {
    Some(URL_OPTIONS_DEFAUT.to_string())
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ConfigApp {
    fn default() -> Self {
        Self {
            digits: default_digits(),
            options: ConfigOptions::default(),
        }
    }
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            url: default_url(),
            fichier: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ConfigOptions {
    /// URL effective (une chaîne vide désactive la source distante).
    pub fn url_active(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

impl ConfigApp {
    /// Parse et valide un texte TOML.
    pub fn from_toml_str(texte: &str) -> Result<Self, ErreurConfig> {
        let cfg: ConfigApp = toml::from_str(texte)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Lit un fichier TOML.
    pub fn from_file(chemin: &Path) -> Result<Self, ErreurConfig> {
        let texte = std::fs::read_to_string(chemin)?;
        Self::from_toml_str(&texte)
    }

    /// Charge la configuration depuis l’emplacement habituel (absent => défaut).
    pub fn charger() -> Result<Self, ErreurConfig> {
        let chemin = std::env::var_os(VAR_CONFIG)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(FICHIER_DEFAUT));
        Self::charger_depuis(&chemin)
    }

    /// Comme `charger`, avec un chemin explicite.
    pub fn charger_depuis(chemin: &Path) -> Result<Self, ErreurConfig> {
        if !chemin.exists() {
            info!(chemin = %chemin.display(), "pas de fichier de configuration, valeurs par défaut");
            return Ok(Self::default());
        }
        let cfg = Self::from_file(chemin)?;
        info!(chemin = %chemin.display(), "configuration chargée");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ErreurConfig> {
        if self.digits > DIGITS_MAX {
            return Err(ErreurConfig::Validation(format!(
                "digits = {} (maximum {DIGITS_MAX})",
                self.digits
            )));
        }
        if self.options.timeout_secs == 0 {
            return Err(ErreurConfig::Validation(
                "options.timeout_secs doit être > 0".into(),
            ));
        }
        Ok(())
    }
}
