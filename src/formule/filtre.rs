// src/formule/filtre.rs
//
// Politique de filtrage des touches : pure, sans état, appelée une fois par
// frappe AVANT toute mutation du tampon.
//
// - Accepte    : un seul caractère de [0-9*+\-^()./]
// - Effacement : "Backspace" (l’effacement est fait tout de suite par le tampon,
//                pas de minuterie différée)
// - Rejete     : tout le reste (la frappe ne modifie rien)

/// Alphabet autorisé dans les segments texte.
pub const TOUCHES_AUTORISEES: &str = "0123456789*+-^()./";

/// Nom de touche de l’effacement arrière.
pub const TOUCHE_EFFACEMENT: &str = "Backspace";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classement {
    Accepte,
    Effacement,
    Rejete,
}

pub fn is_autorise(c: char) -> bool {
    TOUCHES_AUTORISEES.contains(c)
}

/// Classe une touche (valeur de touche façon clavier : "7", "+", "Backspace", "Enter"...).
///
/// Une touche nommée de plusieurs caractères n’est jamais acceptée,
/// même si elle contient un chiffre ("F1", "Digit1").
pub fn classify(touche: &str) -> Classement {
    if touche == TOUCHE_EFFACEMENT {
        return Classement::Effacement;
    }

    let mut chars = touche.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if is_autorise(c) => Classement::Accepte,
        _ => Classement::Rejete,
    }
}
