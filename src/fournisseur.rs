//! Fournisseurs d’options d’autocomplétion.
//!
//! Contrat côté appelant : un échec de récupération n’est jamais visible.
//! [`fetch_or_empty`] journalise l’erreur et rend une liste vide.
//!
//! Le rafraîchissement tourne hors du thread UI ([`spawn_refresh`]) et livre
//! un instantané par canal ; l’UI applique chaque instantané reçu, dans l’ordre
//! d’arrivée (dernier arrivé gagnant).

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ConfigOptions;
use crate::formule::OptionAuto;

#[derive(Debug, thiserror::Error)]
pub enum ErreurFournisseur {
    #[error("requête impossible: {0}")]
    Reseau(String),

    #[error("statut HTTP inattendu: {0}")]
    Statut(u16),

    #[error("lecture du fichier impossible: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON invalide: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source de la liste d’options (lecture seule).
pub trait FournisseurOptions: Send + Sync {
    /// Nom court pour le journal.
    fn nom(&self) -> &str;

    fn fetch_options(&self) -> Result<Vec<OptionAuto>, ErreurFournisseur>;
}

/* ------------------------ Statique ------------------------ */

/// Liste fixe (tests, wasm, source désactivée).
#[derive(Debug, Clone, Default)]
pub struct FournisseurStatique {
    options: Vec<OptionAuto>,
}

impl FournisseurStatique {
    pub fn new(options: Vec<OptionAuto>) -> Self {
        Self { options }
    }
}

impl FournisseurOptions for FournisseurStatique {
    fn nom(&self) -> &str {
        "statique"
    }

    fn fetch_options(&self) -> Result<Vec<OptionAuto>, ErreurFournisseur> {
        Ok(self.options.clone())
    }
}

/* ------------------------ Fichier JSON ------------------------ */

#[derive(Debug, Clone)]
pub struct FournisseurFichier {
    chemin: PathBuf,
}

impl FournisseurFichier {
    pub fn new(chemin: impl Into<PathBuf>) -> Self {
        Self {
            chemin: chemin.into(),
        }
    }
}

impl FournisseurOptions for FournisseurFichier {
    fn nom(&self) -> &str {
        "fichier"
    }

    fn fetch_options(&self) -> Result<Vec<OptionAuto>, ErreurFournisseur> {
        let texte = std::fs::read_to_string(&self.chemin)?;
        Ok(serde_json::from_str(&texte)?)
    }
}

/* ------------------------ HTTP (natif) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
pub use http::FournisseurHttp;

#[cfg(not(target_arch = "wasm32"))]
mod http {
    use std::time::Duration;

    use super::{ErreurFournisseur, FournisseurOptions, OptionAuto};

    /// GET d’un tableau JSON d’options (client bloquant : à appeler hors UI).
    #[derive(Debug, Clone)]
    pub struct FournisseurHttp {
        url: String,
        client: reqwest::blocking::Client,
    }

    impl FournisseurHttp {
        pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ErreurFournisseur> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| ErreurFournisseur::Reseau(e.to_string()))?;
            Ok(Self {
                url: url.into(),
                client,
            })
        }
    }

    impl FournisseurOptions for FournisseurHttp {
        fn nom(&self) -> &str {
            "http"
        }

        fn fetch_options(&self) -> Result<Vec<OptionAuto>, ErreurFournisseur> {
            let resp = self
                .client
                .get(&self.url)
                .header("accept", "application/json")
                .send()
                .map_err(|e| ErreurFournisseur::Reseau(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(ErreurFournisseur::Statut(status.as_u16()));
            }

            let texte = resp
                .text()
                .map_err(|e| ErreurFournisseur::Reseau(e.to_string()))?;
            Ok(serde_json::from_str(&texte)?)
        }
    }
}

/* ------------------------ Choix selon la configuration ------------------------ */

/// Fichier si configuré, sinon URL (natif), sinon liste vide.
pub fn depuis_config(cfg: &ConfigOptions) -> Arc<dyn FournisseurOptions> {
    if let Some(chemin) = &cfg.fichier {
        info!(chemin = %chemin.display(), "options: fichier");
        return Arc::new(FournisseurFichier::new(chemin.clone()));
    }

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(url) = cfg.url_active() {
        let timeout = std::time::Duration::from_secs(cfg.timeout_secs);
        match FournisseurHttp::new(url, timeout) {
            Ok(f) => {
                info!(url, "options: http");
                return Arc::new(f);
            }
            Err(e) => warn!(erreur = %e, "client HTTP indisponible, options vides"),
        }
    }

    Arc::new(FournisseurStatique::default())
}

/* ------------------------ Récupération ------------------------ */

/// Récupère les options ; tout échec est journalisé et remplacé par une liste vide.
pub fn fetch_or_empty(fournisseur: &dyn FournisseurOptions) -> Vec<OptionAuto> {
    match fournisseur.fetch_options() {
        Ok(options) => {
            debug!(source = fournisseur.nom(), nb = options.len(), "options reçues");
            options
        }
        Err(e) => {
            warn!(source = fournisseur.nom(), erreur = %e, "récupération des options impossible");
            Vec::new()
        }
    }
}

/// Lance une récupération sans bloquer l’appelant.
///
/// L’instantané arrive sur le canal retourné ; `reveil` est appelé juste après
/// l’envoi (ex: demander un rafraîchissement de l’UI). Pas d’annulation.
pub fn spawn_refresh(
    fournisseur: Arc<dyn FournisseurOptions>,
    reveil: impl FnOnce() + Send + 'static,
) -> mpsc::Receiver<Vec<OptionAuto>> {
    let (tx, rx) = mpsc::channel();

    let tache = move || {
        let options = fetch_or_empty(fournisseur.as_ref());
        // récepteur parti (UI fermée) : rien à livrer
        if tx.send(options).is_ok() {
            reveil();
        }
    };

    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = std::thread::Builder::new()
            .name("options-fetch".into())
            .spawn(tache)
        {
            warn!(erreur = %e, "thread de récupération impossible, options vides");
        }
    }

    // wasm : pas de threads, la récupération (locale) se fait tout de suite
    #[cfg(target_arch = "wasm32")]
    tache();

    rx
}
