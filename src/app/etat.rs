//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir le tampon de formule, le registre d’options, le pipeline
//! d’évaluation et la précision d’affichage ; offrir les actions simples
//! (C/CLR/AC/DEL/=) sans logique d’affichage.
//!
//! Contrats :
//! - Le registre et le tampon sont indépendants : un rafraîchissement des
//!   options ne touche jamais aux étiquettes déjà insérées.
//! - Les options arrivent par canal ; chaque instantané reçu remplace le
//!   registre (dernier arrivé gagnant).
//! - Le résultat affiché est celui livré par le rappel `on_result` du
//!   pipeline (seule notification sortante), pas un état relu.
//! - Défense en profondeur : bornes sur digits.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;
use std::sync::Arc;

use tracing::info;

use crate::config::ConfigApp;
use crate::formule::{OptionAuto, Pipeline, RegistreAuto, Resultat, TamponFormule};
use crate::fournisseur::{self, FournisseurOptions};
use crate::noyau::lecture::{DIGITS_DEFAUT, DIGITS_MAX};
use crate::noyau::EvaluateurExact;

pub struct AppFormule {
    // --- entrée utilisateur ---
    pub tampon: TamponFormule,
    pub registre: RegistreAuto,

    // --- sortie ---
    pub pipeline: Pipeline<EvaluateurExact>,
    // Alimenté par le rappel on_result, lu par la vue
    resultat: Rc<RefCell<Option<Resultat>>>,

    // --- paramètres ---
    pub digits: usize, // précision de la lecture décimale

    // --- UX ---
    // Permet à vue.rs de redonner le focus au champ après un clic sur un bouton.
    pub focus_entree: bool,

    // Faux juste après une sélection : la reprise de focus qui suit ne rouvre pas le panneau
    suggestions_au_focus: bool,

    // Rafraîchissement des options en cours (au plus un par montage)
    options_rx: Option<mpsc::Receiver<Vec<OptionAuto>>>,
}

impl AppFormule {
    /// Montage : lance UNE récupération des options selon la configuration.
    pub fn new(config: &ConfigApp, reveil: impl FnOnce() + Send + 'static) -> Self {
        let source = fournisseur::depuis_config(&config.options);
        Self::avec_fournisseur(source, config.digits, reveil)
    }

    pub fn avec_fournisseur(
        source: Arc<dyn FournisseurOptions>,
        digits: usize,
        reveil: impl FnOnce() + Send + 'static,
    ) -> Self {
        info!(source = source.nom(), "récupération des options lancée");
        let rx = fournisseur::spawn_refresh(source, reveil);

        let resultat: Rc<RefCell<Option<Resultat>>> = Rc::default();
        let sortie = Rc::clone(&resultat);
        let pipeline = Pipeline::new(EvaluateurExact).with_on_result(move |r: &Resultat| {
            info!(resultat = %r, "résultat");
            *sortie.borrow_mut() = Some(r.clone());
        });

        Self {
            tampon: TamponFormule::new(),
            registre: RegistreAuto::new(),
            pipeline,
            resultat,
            digits: digits.min(DIGITS_MAX),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
            suggestions_au_focus: true,
            options_rx: Some(rx),
        }
    }

    /// Dernier résultat reçu par le rappel (None après CLR / AC).
    pub fn resultat(&self) -> Option<Resultat> {
        self.resultat.borrow().clone()
    }

    /// À appeler à chaque frame où le champ a le focus (`gagne` : focus pris à cette frame).
    /// La prise de focus ouvre le panneau de suggestions, sauf celle qui suit une sélection.
    pub fn focus_champ(&mut self, gagne: bool) {
        if gagne && self.suggestions_au_focus {
            self.tampon.open_suggestions();
        }
        self.suggestions_au_focus = true;
    }

    /// Applique les instantanés d’options arrivés depuis la dernière frame.
    pub fn recevoir_options(&mut self) {
        let Some(rx) = &self.options_rx else {
            return;
        };

        let mut termine = false;
        loop {
            match rx.try_recv() {
                Ok(options) => self.registre.set_options(options),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    termine = true;
                    break;
                }
            }
        }

        if termine {
            self.options_rx = None;
        }
    }

    /* ------------------------ Actions “boutons” ------------------------ */

    /// = : évalue la formule courante.
    pub fn calculer(&mut self) -> Resultat {
        let r = self.pipeline.evaluate(&self.tampon);
        self.focus_entree = true;
        r
    }

    /// Sélection dans le panneau : insère l’étiquette en fin de formule.
    pub fn choisir_option(&mut self, option: &OptionAuto) {
        self.tampon.insert_tag(option);
        self.suggestions_au_focus = false;
        self.focus_entree = true;
    }

    /// DEL : dernier caractère, ou dernière étiquette entière.
    pub fn backspace_entree(&mut self) {
        self.tampon.delete_last();
        self.focus_entree = true;
    }

    /// AC : remise à zéro totale (formule + résultat + digits par défaut).
    pub fn reset_total(&mut self) {
        self.tampon.reset();
        self.tampon.close_suggestions();
        self.clear_resultats();
        self.digits = DIGITS_DEFAUT;
        self.focus_entree = true;
    }

    /// C : effacer seulement la formule (sans toucher au résultat).
    pub fn clear_entree(&mut self) {
        self.tampon.reset();
        self.focus_entree = true;
    }

    /// CLR : effacer le résultat (sans toucher à la formule).
    pub fn clear_resultats(&mut self) {
        self.pipeline.reset();
        *self.resultat.borrow_mut() = None;
        self.focus_entree = true;
    }

    /// Garde-fou : limite digits (évite abus / gel plus tard).
    pub fn set_digits(&mut self, digits: usize) {
        self.digits = digits.min(DIGITS_MAX);
        self.focus_entree = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formule::EtatPipeline;
    use crate::fournisseur::FournisseurStatique;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};

    fn app_avec(options: Vec<OptionAuto>) -> AppFormule {
        AppFormule::avec_fournisseur(Arc::new(FournisseurStatique::new(options)), 20, || {})
    }

    /// Attend que le thread de récupération ait livré (borné).
    fn attendre_options(app: &mut AppFormule) {
        let t0 = Instant::now();
        while app.options_rx.is_some() && t0.elapsed() < Duration::from_secs(5) {
            app.recevoir_options();
            std::thread::yield_now();
        }
    }

    #[test]
    fn options_recues_au_montage() {
        let mut app = app_avec(vec![OptionAuto::new("x", "X", 3)]);
        attendre_options(&mut app);
        assert_eq!(app.registre.list().len(), 1);
        assert!(app.options_rx.is_none());
    }

    #[test]
    fn scenario_saisie_selection_calcul() {
        let mut app = app_avec(vec![OptionAuto::new("x", "X", 3)]);
        attendre_options(&mut app);

        for t in ["2", "+"] {
            app.tampon.handle_key(t);
        }
        let x = app.registre.list()[0].clone();
        app.choisir_option(&x);
        for t in ["*", "4"] {
            app.tampon.handle_key(t);
        }

        assert_eq!(app.calculer().to_string(), "14");
    }

    #[test]
    fn resultat_livre_par_le_rappel() {
        let mut app = app_avec(Vec::new());
        assert_eq!(app.resultat(), None);

        for t in ["5", "/", "0"] {
            app.tampon.handle_key(t);
        }
        app.calculer();
        assert_eq!(app.resultat().map(|r| r.to_string()).as_deref(), Some("Error"));

        app.clear_entree();
        app.tampon.handle_key("7");
        app.calculer();
        assert_eq!(app.resultat().map(|r| r.to_string()).as_deref(), Some("7"));

        app.clear_resultats();
        assert_eq!(app.resultat(), None);
    }

    #[test]
    fn focus_ouvre_les_suggestions() {
        let mut app = app_avec(vec![OptionAuto::new("x", "X", 3)]);
        assert!(!app.tampon.suggestions_visibles());

        // prise de focus (lancement, retour après un bouton du pavé)
        app.focus_champ(true);
        assert!(app.tampon.suggestions_visibles());

        // focus conservé : rien ne change
        app.tampon.close_suggestions();
        app.focus_champ(false);
        assert!(!app.tampon.suggestions_visibles());
    }

    #[test]
    fn selection_ferme_sans_reouverture_immediate() {
        let mut app = app_avec(Vec::new());
        app.focus_champ(true);
        app.choisir_option(&OptionAuto::new("x", "X", 3));
        assert!(!app.tampon.suggestions_visibles());

        // le focus rendu au champ après la sélection ne rouvre pas le panneau
        app.focus_champ(true);
        assert!(!app.tampon.suggestions_visibles());

        // la prise de focus suivante, si
        app.focus_champ(true);
        assert!(app.tampon.suggestions_visibles());
    }

    #[test]
    fn c_clr_ac() {
        let mut app = app_avec(Vec::new());
        app.tampon.handle_key("7");
        app.calculer();
        app.set_digits(5);

        app.clear_entree();
        assert!(app.tampon.is_empty());
        assert!(app.resultat().is_some());

        app.clear_resultats();
        assert_eq!(app.pipeline.etat(), &EtatPipeline::Repos);
        assert!(app.resultat().is_none());

        app.tampon.handle_key("1");
        app.reset_total();
        assert!(app.tampon.is_empty());
        assert_eq!(app.digits, DIGITS_DEFAUT);
    }

    #[test]
    fn digits_bornes() {
        let mut app = app_avec(Vec::new());
        app.set_digits(10_000);
        assert_eq!(app.digits, DIGITS_MAX);
    }

    #[test]
    fn backspace_retire_l_etiquette_entiere() {
        let mut app = app_avec(Vec::new());
        app.tampon.handle_key("1");
        app.choisir_option(&OptionAuto::new("v", "Valeur", 250));
        app.backspace_entree();
        assert_eq!(app.tampon.serialize(), "1");
    }
}
