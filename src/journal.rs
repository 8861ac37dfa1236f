//! Journal (tracing).
//!
//! Abonné `fmt` filtré par `RUST_LOG` (défaut : `info`).
//! Idempotent : un second appel ne fait rien.

use tracing_subscriber::EnvFilter;

/// Filtre utilisé quand `RUST_LOG` est absent ou invalide.
const FILTRE_DEFAUT: &str = "info";

pub fn init_journal() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(FILTRE_DEFAUT)),
        )
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::init_journal;

    #[test]
    fn double_init_sans_panique() {
        init_journal();
        init_journal();
        tracing::info!("journal prêt");
    }
}
