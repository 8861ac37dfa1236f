// src/app/vue.rs
//
// Vue (UI egui) : natif + web
// ---------------------------
// Objectifs :
// - Même AppFormule (etat.rs) pour natif + wasm
// - Champ formule : texte tapé en monospace, étiquettes en “puces”
// - Clavier (quand le champ a le focus) : chaque frappe passe par le filtre,
//   Backspace efface (une étiquette part d’un bloc), Enter évalue
// - Panneau de suggestions : ouvert à la prise de focus (ou au clic) sur le
//   champ, fermé par une sélection ou un clic en dehors du champ + panneau
// - Tactile : gros boutons, focus redonné après clic (focus_entree)

use eframe::egui;

use super::etat::AppFormule;
use crate::formule::filtre::TOUCHE_EFFACEMENT;
use crate::formule::{Etiquette, OptionAuto, Resultat, Segment};
use crate::noyau::lecture::DIGITS_MAX;

impl AppFormule {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Options arrivées depuis la frame précédente
        self.recevoir_options();

        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Formule Q-pur");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultats(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Formule :");

        // Champ + panneau dans une même zone : un clic dedans ne ferme rien
        let zone = ui.scope(|ui| {
            self.ui_champ(ui);
            if self.tampon.suggestions_visibles() {
                self.ui_suggestions(ui);
            }
        });
        if zone.response.clicked_elsewhere() {
            self.tampon.close_suggestions();
        }

        ui.add_space(6.0);

        // Actions + précision
        ui.horizontal(|ui| {
            // Contrat: C = formule seulement ; CLR = résultat seulement ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement la formule", Action::ClearEntree);
            self.bouton_action(ui, "CLR", "Efface le résultat", Action::ClearResultats);
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);

            ui.separator();

            ui.label("Lecture :");
            let mut d = self.digits as u32;
            let resp = ui.add(
                egui::DragValue::new(&mut d)
                    .speed(1)
                    .range(0..=DIGITS_MAX as u32)
                    .suffix(" chiffres"),
            );
            if resp.changed() {
                self.set_digits(d as usize);
            }
        });

        ui.add_space(8.0);

        // Touches rapides + "="
        ui.horizontal_wrapped(|ui| {
            for t in ["(", ")", "+", "-", "*", "/", "^"] {
                self.bouton_touche(ui, t);
            }

            ui.add_space(10.0);

            self.bouton_action(ui, "=", "Calculer", Action::Calculer);
        });

        ui.add_space(8.0);

        // Pavé numérique
        self.ui_pave_numerique(ui);
    }

    /// Champ formule : rendu des segments + capture clavier quand focus.
    fn ui_champ(&mut self, ui: &mut egui::Ui) {
        let id = ui.make_persistent_id("formule_champ");
        let a_focus = ui.memory(|m| m.has_focus(id));

        let cadre = egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.set_min_height(1.6 * ui.text_style_height(&egui::TextStyle::Monospace));

                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 2.0;

                    if self.tampon.is_empty() && !a_focus {
                        ui.weak("Saisir une formule…");
                    }
                    for seg in self.tampon.segments() {
                        match seg {
                            Segment::Texte(t) => {
                                ui.monospace(t);
                            }
                            Segment::Etiquette(e) => Self::puce_etiquette(ui, e),
                        }
                    }
                    if a_focus {
                        ui.monospace("|");
                    }
                });
            });

        let resp = ui.interact(cadre.response.rect, id, egui::Sense::click());

        if resp.clicked() {
            resp.request_focus();
            self.tampon.open_suggestions();
        }

        // Si on a cliqué un bouton (pavé / DEL / C / etc.), on redonne le focus
        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        if resp.has_focus() {
            self.focus_champ(resp.gained_focus());
            self.lire_clavier(ui);
        }
    }

    /// Une frappe = un passage par le filtre (texte), Backspace = effacement, Enter = calcul.
    fn lire_clavier(&mut self, ui: &egui::Ui) {
        let events = ui.input(|i| i.events.clone());

        for ev in events {
            match ev {
                egui::Event::Text(txt) => {
                    for c in txt.chars() {
                        let mut buf = [0u8; 4];
                        self.tampon.handle_key(c.encode_utf8(&mut buf));
                    }
                }
                egui::Event::Key {
                    key: egui::Key::Backspace,
                    pressed: true,
                    ..
                } => {
                    self.tampon.handle_key(TOUCHE_EFFACEMENT);
                }
                egui::Event::Key {
                    key: egui::Key::Enter,
                    pressed: true,
                    ..
                } => {
                    self.calculer();
                }
                _ => {}
            }
        }
    }

    fn puce_etiquette(ui: &mut egui::Ui, e: &Etiquette) {
        egui::Frame::new()
            .fill(ui.visuals().selection.bg_fill)
            .corner_radius(4.0)
            .inner_margin(egui::Margin::symmetric(4, 1))
            .show(ui, |ui| {
                ui.label(egui::RichText::new(e.nom()).strong());
            })
            .response
            .on_hover_text(format!("{} = {}", e.id(), e.valeur()));
    }

    fn ui_suggestions(&mut self, ui: &mut egui::Ui) {
        let mut choisie: Option<OptionAuto> = None;

        egui::Frame::popup(ui.style()).show(ui, |ui| {
            ui.set_min_width(ui.available_width());

            if self.registre.is_empty() {
                ui.weak("Aucune option");
                return;
            }

            egui::ScrollArea::vertical()
                .id_salt("suggestions")
                .max_height(180.0)
                .show(ui, |ui| {
                    for opt in self.registre.list() {
                        let texte = if opt.categorie.is_empty() {
                            opt.nom.clone()
                        } else {
                            format!("{}  ({})", opt.nom, opt.categorie)
                        };
                        if ui.selectable_label(false, texte).clicked() {
                            choisie = Some(opt.clone());
                        }
                    }
                });
        });

        if let Some(opt) = choisie {
            self.choisir_option(&opt);
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique_formule")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_touche(ui, "7");
                self.bouton_touche(ui, "8");
                self.bouton_touche(ui, "9");
                self.bouton_action(ui, "DEL", "Efface le dernier symbole ou la dernière étiquette", Action::Backspace);
                ui.end_row();

                self.bouton_touche(ui, "4");
                self.bouton_touche(ui, "5");
                self.bouton_touche(ui, "6");
                self.bouton_touche(ui, "/");
                ui.end_row();

                self.bouton_touche(ui, "1");
                self.bouton_touche(ui, "2");
                self.bouton_touche(ui, "3");
                self.bouton_touche(ui, ".");
                ui.end_row();

                self.bouton_touche(ui, "0");
                ui.label("");
                ui.label("");
                ui.label("");
                ui.end_row();
            });
    }

    fn ui_resultats(&mut self, ui: &mut egui::Ui) {
        let resultat = self.resultat();

        ui.label("Résultat :");
        let lecture = resultat
            .as_ref()
            .map(|r| r.lecture(self.digits))
            .unwrap_or_default();
        if resultat.as_ref().is_some_and(Resultat::is_erreur) {
            ui.colored_label(ui.visuals().error_fg_color, lecture);
        } else {
            Self::champ_monospace(ui, "resultat_out", &lecture, 1);
        }

        if let Some(exact) = resultat.as_ref().and_then(Resultat::exact) {
            ui.add_space(6.0);
            ui.label("EXACT :");
            Self::champ_monospace(ui, "exact_out", &exact, 1);
        }

        ui.add_space(6.0);
        ui.label("Expression :");
        Self::champ_monospace(ui, "expression_out", &self.tampon.serialize(), 1);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        // On garde un cadre visuel via Frame + Label monospace.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::Calculer => {
                    self.calculer();
                }
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    /// Bouton de touche : même chemin que le clavier (filtre compris).
    fn bouton_touche(&mut self, ui: &mut egui::Ui, touche: &str) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(touche));
        if resp.clicked() {
            self.tampon.handle_key(touche);
            self.focus_entree = true;
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    Calculer,
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
}
