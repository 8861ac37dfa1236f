//! Formule Q-pur : formules à étiquettes, évaluées exactement dans Q.
//!
//! - `formule`     : segments, registre d’options, filtre des touches, tampon, pipeline
//! - `noyau`       : évaluateur exact (jetons -> RPN -> Expr -> Q)
//! - `fournisseur` : sources d’options (HTTP / fichier / statique)
//! - `config`      : configuration TOML
//! - `journal`     : abonné tracing
//! - `app`         : état + vue egui (natif + web)

pub mod app;
pub mod config;
pub mod formule;
pub mod fournisseur;
pub mod journal;
pub mod noyau;
