// src/formule/registre.rs
//
// Registre d’autocomplétion : liste ordonnée d’options (ordre = affichage).
// Instance explicite, passée à l’éditeur et à la vue (pas de store global).
//
// Contrats :
// - set_options remplace tout (dernier appel gagnant).
// - add_option n’impose pas l’unicité des id (dédoublonnage à la charge de l’appelant).
// - remove_option retire TOUTES les entrées de même id, no-op si absent.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::segment::ValeurOption;

/// Option telle que servie par le fournisseur :
/// `{ id, name, category, value, inputs? }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionAuto {
    pub id: String,

    #[serde(rename = "name")]
    pub nom: String,

    #[serde(rename = "category", default)]
    pub categorie: String,

    #[serde(rename = "value")]
    pub valeur: ValeurOption,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<String>,
}

impl OptionAuto {
    pub fn new(id: impl Into<String>, nom: impl Into<String>, valeur: impl Into<ValeurOption>) -> Self {
        Self {
            id: id.into(),
            nom: nom.into(),
            categorie: String::new(),
            valeur: valeur.into(),
            inputs: None,
        }
    }

    pub fn with_categorie(mut self, categorie: impl Into<String>) -> Self {
        self.categorie = categorie.into();
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct RegistreAuto {
    options: Vec<OptionAuto>,
}

impl RegistreAuto {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace l’ensemble des options.
    pub fn set_options(&mut self, options: Vec<OptionAuto>) {
        debug!(nb = options.len(), "registre: remplacement des options");
        self.options = options;
    }

    /// Ajoute une option en fin de liste (doublons d’id acceptés).
    pub fn add_option(&mut self, option: OptionAuto) {
        self.options.push(option);
    }

    /// Retire toutes les options de même id.
    pub fn remove_option(&mut self, option: &OptionAuto) {
        self.options.retain(|o| o.id != option.id);
    }

    /// Instantané ordonné courant.
    pub fn list(&self) -> &[OptionAuto] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(r: &RegistreAuto) -> Vec<&str> {
        r.list().iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn set_options_dernier_gagnant() {
        let mut r = RegistreAuto::new();
        r.set_options(vec![OptionAuto::new("a", "A", 1), OptionAuto::new("b", "B", 2)]);
        r.set_options(vec![OptionAuto::new("c", "C", 3)]);
        assert_eq!(ids(&r), vec!["c"]);
    }

    #[test]
    fn set_options_idempotent() {
        let opts = vec![OptionAuto::new("a", "A", 1), OptionAuto::new("b", "B", 2)];
        let mut r = RegistreAuto::new();
        r.set_options(opts.clone());
        r.set_options(opts.clone());
        assert_eq!(r.list(), opts.as_slice());
    }

    #[test]
    fn add_option_accepte_les_doublons() {
        let mut r = RegistreAuto::new();
        r.add_option(OptionAuto::new("a", "A", 1));
        r.add_option(OptionAuto::new("a", "A bis", 2));
        assert_eq!(ids(&r), vec!["a", "a"]);
    }

    #[test]
    fn remove_option_retire_tous_les_id() {
        let mut r = RegistreAuto::new();
        r.add_option(OptionAuto::new("a", "A", 1));
        r.add_option(OptionAuto::new("b", "B", 2));
        r.add_option(OptionAuto::new("a", "A bis", 3));

        r.remove_option(&OptionAuto::new("a", "peu importe", 0));
        assert_eq!(ids(&r), vec!["b"]);

        // absent : no-op
        r.remove_option(&OptionAuto::new("zz", "Z", 0));
        assert_eq!(ids(&r), vec!["b"]);
    }

    #[test]
    fn forme_json_du_fournisseur() {
        let json = r#"[
            {"id":"1","name":"Revenue","category":"finance","value":1200},
            {"id":"2","name":"Ratio","category":"finance","value":"0.25","inputs":"x"}
        ]"#;
        let opts: Vec<OptionAuto> = serde_json::from_str(json).unwrap();
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].nom, "Revenue");
        assert_eq!(opts[0].categorie, "finance");
        assert_eq!(opts[0].valeur.to_string(), "1200");
        assert_eq!(opts[1].valeur, ValeurOption::Texte("0.25".into()));
        assert_eq!(opts[1].inputs.as_deref(), Some("x"));
    }
}
