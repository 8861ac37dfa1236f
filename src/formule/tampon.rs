// src/formule/tampon.rs
//
// Tampon de formule : suite ordonnée de segments (texte | étiquette).
//
// Contrats :
// - toute insertion se fait en FIN de tampon (pas de curseur arbitraire).
// - delete_last retire une étiquette d’un seul coup, jamais en partie.
// - serialize concatène dans l’ordre, sans séparateur : c’est la chaîne
//   exacte donnée à l’évaluateur.
// - des segments texte adjacents fragmentés valent un seul segment fusionné.

use thiserror::Error;
use tracing::trace;

use super::filtre::{classify, Classement};
use super::registre::OptionAuto;
use super::segment::{Etiquette, Segment};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErreurTampon {
    #[error("touche refusée par le filtre: {0:?}")]
    ToucheRefusee(String),
}

#[derive(Clone, Debug, Default)]
pub struct TamponFormule {
    segments: Vec<Segment>,

    // Panneau de suggestions (ouvert au focus, fermé à la sélection / clic dehors)
    suggestions_visibles: bool,
}

impl TamponFormule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construit un tampon depuis des segments existants (fragmentation tolérée).
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            suggestions_visibles: false,
        }
    }

    /// Projection lecture seule pour le rendu.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /* ------------------------ Frappe ------------------------ */

    /// Filtre puis applique une frappe brute.
    pub fn handle_key(&mut self, touche: &str) -> Classement {
        let classement = classify(touche);
        match classement {
            Classement::Accepte => {
                if let Some(c) = touche.chars().next() {
                    self.push_char(c);
                }
            }
            Classement::Effacement => {
                self.delete_last();
            }
            Classement::Rejete => trace!(touche, "frappe ignorée"),
        }
        classement
    }

    /// Ajoute un caractère accepté au segment texte final (créé si besoin).
    pub fn append_text(&mut self, touche: &str) -> Result<(), ErreurTampon> {
        match (classify(touche), touche.chars().next()) {
            (Classement::Accepte, Some(c)) => {
                self.push_char(c);
                Ok(())
            }
            _ => Err(ErreurTampon::ToucheRefusee(touche.to_string())),
        }
    }

    fn push_char(&mut self, c: char) {
        match self.segments.last_mut() {
            Some(Segment::Texte(t)) => t.push(c),
            _ => self.segments.push(Segment::Texte(c.to_string())),
        }
    }

    /* ------------------------ Étiquettes ------------------------ */

    /// Ferme les suggestions puis ajoute un instantané de l’option en fin de tampon.
    pub fn insert_tag(&mut self, option: &OptionAuto) {
        self.close_suggestions();
        self.segments
            .push(Segment::Etiquette(Etiquette::depuis_option(option)));
    }

    /* ------------------------ Effacement ------------------------ */

    /// Retire le dernier caractère du texte final, ou la dernière étiquette entière.
    /// Retourne false si le tampon était vide.
    pub fn delete_last(&mut self) -> bool {
        // Segments texte vides (tampon construit à la main) : on les saute
        while matches!(self.segments.last(), Some(Segment::Texte(t)) if t.is_empty()) {
            self.segments.pop();
        }

        match self.segments.last_mut() {
            None => false,
            Some(Segment::Etiquette(_)) => {
                self.segments.pop();
                true
            }
            Some(Segment::Texte(t)) => {
                t.pop();
                if t.is_empty() {
                    self.segments.pop();
                }
                true
            }
        }
    }

    /// Vide le tampon.
    pub fn reset(&mut self) {
        self.segments.clear();
    }

    /* ------------------------ Sérialisation ------------------------ */

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for s in &self.segments {
            s.ecrire(&mut out);
        }
        out
    }

    /* ------------------------ Suggestions ------------------------ */

    pub fn suggestions_visibles(&self) -> bool {
        self.suggestions_visibles
    }

    pub fn open_suggestions(&mut self) {
        self.suggestions_visibles = true;
    }

    pub fn close_suggestions(&mut self) {
        self.suggestions_visibles = false;
    }
}
