// src/app.rs
//
// Formule Q-pur : module App (racine)
// -----------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppFormule (pour main.rs: use crate::app::AppFormule;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// La saisie clavier (filtre, Backspace, Enter) est faite dans vue.rs,
// seulement quand le champ formule a le focus.

pub mod etat;
pub mod vue;

pub use etat::AppFormule;

use eframe::egui;

impl eframe::App for AppFormule {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ESC = effacer seulement la formule (comme bouton "C") et fermer le panneau.
        let esc = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if esc {
            self.clear_entree();
            self.tampon.close_suggestions();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}
