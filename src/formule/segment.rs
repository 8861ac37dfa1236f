// src/formule/segment.rs
//
// Modèle de jetons de la formule.
// - Segment::Texte     : suite de caractères tapés (alphabet filtré en amont)
// - Segment::Etiquette : instantané immuable d’une option d’autocomplétion
//
// Une étiquette ne référence PAS le registre : retirer l’option ensuite
// ne change rien à ce qui est déjà dans la formule.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::registre::OptionAuto;

/// Valeur substituée dans l’expression : nombre ou texte brut.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValeurOption {
    Nombre(serde_json::Number),
    Texte(String),
}

impl fmt::Display for ValeurOption {
    /// Conversion texte utilisée à la sérialisation.
    /// Un nombre entier s’écrit sans partie décimale (3.0 -> "3").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValeurOption::Texte(s) => f.write_str(s),
            ValeurOption::Nombre(n) => {
                if let Some(i) = n.as_i64() {
                    write!(f, "{i}")
                } else if let Some(u) = n.as_u64() {
                    write!(f, "{u}")
                } else if let Some(x) = n.as_f64() {
                    // Display f64 : plus court aller-retour, jamais de ".0" final
                    write!(f, "{x}")
                } else {
                    write!(f, "{n}")
                }
            }
        }
    }
}

impl From<i32> for ValeurOption {
    fn from(v: i32) -> Self {
        ValeurOption::Nombre(v.into())
    }
}

impl From<i64> for ValeurOption {
    fn from(v: i64) -> Self {
        ValeurOption::Nombre(v.into())
    }
}

impl From<f64> for ValeurOption {
    fn from(v: f64) -> Self {
        // NaN / ±inf : pas de nombre JSON, on garde le texte
        serde_json::Number::from_f64(v)
            .map(ValeurOption::Nombre)
            .unwrap_or_else(|| ValeurOption::Texte(v.to_string()))
    }
}

impl From<&str> for ValeurOption {
    fn from(v: &str) -> Self {
        ValeurOption::Texte(v.to_string())
    }
}

impl From<String> for ValeurOption {
    fn from(v: String) -> Self {
        ValeurOption::Texte(v)
    }
}

/// Étiquette de variable : aucun champ modifiable après construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Etiquette {
    id: String,
    nom: String,
    valeur: ValeurOption,
}

impl Etiquette {
    pub fn new(id: impl Into<String>, nom: impl Into<String>, valeur: ValeurOption) -> Self {
        Self {
            id: id.into(),
            nom: nom.into(),
            valeur,
        }
    }

    /// Instantané d’une option (copie, pas de lien vers le registre).
    pub fn depuis_option(option: &OptionAuto) -> Self {
        Self::new(option.id.clone(), option.nom.clone(), option.valeur.clone())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn nom(&self) -> &str {
        &self.nom
    }

    pub fn valeur(&self) -> &ValeurOption {
        &self.valeur
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    Texte(String),
    Etiquette(Etiquette),
}

impl Segment {
    pub fn is_texte(&self) -> bool {
        matches!(self, Segment::Texte(_))
    }

    pub fn is_etiquette(&self) -> bool {
        matches!(self, Segment::Etiquette(_))
    }

    /// Contribution du segment à l’expression sérialisée.
    pub fn ecrire(&self, out: &mut String) {
        match self {
            Segment::Texte(t) => out.push_str(t),
            Segment::Etiquette(e) => out.push_str(&e.valeur.to_string()),
        }
    }
}
