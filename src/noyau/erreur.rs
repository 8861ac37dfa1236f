// src/noyau/erreur.rs

use thiserror::Error;

/// Échecs possibles du noyau (lecture, RPN, évaluation).
///
/// Le pipeline ne regarde jamais le détail : toute erreur devient `"Error"`.
/// Le détail sert au journal et aux tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErreurEval {
    #[error("Entrée vide")]
    EntreeVide,

    #[error("caractère inattendu: '{0}'")]
    CaractereInattendu(char),

    #[error("nombre invalide: {0:?}")]
    NombreInvalide(String),

    #[error("parenthèses non fermées")]
    ParenthesesNonFermees,

    #[error("parenthèse fermante sans ouvrante")]
    ParentheseOrpheline,

    #[error("expression invalide")]
    ExpressionInvalide,

    #[error("division par zéro")]
    DivisionParZero,

    #[error("indice de racine trop grand (> {0})")]
    IndiceRacineTropGrand(u32),

    #[error("pas de racine rationnelle exacte")]
    RacineNonExacte,

    #[error("exposant trop grand (|n| > {0})")]
    ExposantTropGrand(i64),

    #[error("résultat trop grand (> {0} bits)")]
    ResultatTropGrand(u64),

    #[error("calcul trop long (budget de {0} bits dépassé)")]
    CalculTropLong(u64),

    #[error("expression trop longue (> {0} jetons)")]
    ExpressionTropLongue(usize),

    #[error("expression trop imbriquée (profondeur > {0})")]
    ExpressionTropProfonde(usize),
}
