//! Moteur de formule à étiquettes
//!
//! Organisation interne :
//! - segment.rs  : segments texte / étiquettes de variable
//! - registre.rs : options d’autocomplétion (instance explicite)
//! - filtre.rs   : politique de filtrage des touches
//! - tampon.rs   : tampon ordonné + insertion + sérialisation
//! - pipeline.rs : évaluation, erreurs normalisées en "Error"

pub mod filtre;
pub mod pipeline;
pub mod registre;
pub mod segment;
pub mod tampon;

pub use filtre::{classify, Classement};
pub use pipeline::{EtatPipeline, Evaluateur, Pipeline, Resultat};
pub use registre::{OptionAuto, RegistreAuto};
pub use segment::{Etiquette, Segment, ValeurOption};
pub use tampon::TamponFormule;
