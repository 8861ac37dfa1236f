//! Noyau : évaluation (pipeline réel)
//!
//! tokenize -> RPN -> Expr -> évaluation exacte (Q)
//!
//! C’est l’`Evaluateur` concret branché derrière le pipeline de formule :
//! le pipeline ne voit qu’un `Result`, le détail reste ici (journal + tests).
//!
//! Garde-fous : nombre de jetons (ici), profondeur de l’arbre (rpn.rs),
//! taille des valeurs et budget de calcul (expr.rs). Toute entrée, même
//! énorme, finit en valeur ou en erreur typée : ni gel, ni débordement de pile.

use num_rational::BigRational;
use tracing::trace;

use super::erreur::ErreurEval;
use super::jetons::{format_tokens, tokenize};
use super::rpn::{from_rpn, to_rpn};
use crate::formule::pipeline::Evaluateur;

/// Garde-fou : nombre maximal de jetons d’une expression.
pub const MAX_JETONS: usize = 200_000;

#[derive(Default, Clone, Debug)]
pub struct DemarcheNoyau {
    pub jetons: String,
    pub rpn: String,
    pub arbre: String,
}

/// API publique : évalue une expression et retourne la valeur exacte + la démarche.
pub fn eval_expression(expr_str: &str) -> Result<(BigRational, DemarcheNoyau), ErreurEval> {
    let s = expr_str.trim();
    if s.is_empty() {
        return Err(ErreurEval::EntreeVide);
    }

    // 1) Jetons
    let jetons = tokenize(s)?;
    if jetons.len() > MAX_JETONS {
        return Err(ErreurEval::ExpressionTropLongue(MAX_JETONS));
    }

    // 2) RPN
    let rpn = to_rpn(&jetons)?;

    // 3) AST (Expr)
    let expr = from_rpn(&rpn)?;

    // 4) Valeur exacte
    let valeur = expr.evaluer()?;

    let d = DemarcheNoyau {
        jetons: format_tokens(&jetons),
        rpn: format_tokens(&rpn),
        arbre: expr.to_string(),
    };

    Ok((valeur, d))
}

/// Évaluateur exact (rationnels), sans état.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvaluateurExact;

impl Evaluateur for EvaluateurExact {
    type Erreur = ErreurEval;

    fn evaluate(&self, expression: &str) -> Result<BigRational, ErreurEval> {
        let (valeur, d) = eval_expression(expression)?;
        trace!(jetons = %d.jetons, rpn = %d.rpn, arbre = %d.arbre, "démarche");
        Ok(valeur)
    }
}

#[cfg(test)]
mod tests {
    use super::{eval_expression, MAX_JETONS};
    use crate::noyau::erreur::ErreurEval;
    use crate::noyau::expr::TAILLE_MAX_BITS;
    use crate::noyau::rpn::PROFONDEUR_MAX;
    use crate::noyau::lecture::{format_exact, lecture_decimale};

    fn ok_exact(s: &str) -> String {
        let (v, _d) =
            eval_expression(s).unwrap_or_else(|e| panic!("eval_expression({s:?}) erreur: {e}"));
        format_exact(&v)
    }

    fn ok_dec(s: &str, digits: usize) -> String {
        let (v, _d) =
            eval_expression(s).unwrap_or_else(|e| panic!("eval_expression({s:?}) erreur: {e}"));
        lecture_decimale(&v, digits)
    }

    fn err(s: &str) -> ErreurEval {
        match eval_expression(s) {
            Ok((v, _)) => panic!("attendu une erreur pour {s:?}, obtenu {v}"),
            Err(e) => e,
        }
    }

    // --- Arithmétique de base ---

    #[test]
    fn priorites() {
        assert_eq!(ok_exact("2+3*4"), "14");
        assert_eq!(ok_exact("(2+3)*4"), "20");
        assert_eq!(ok_exact("10-4-3"), "3");
        assert_eq!(ok_exact("2^3^2"), "512");
    }

    #[test]
    fn signes() {
        assert_eq!(ok_exact("-2^2"), "-4");
        assert_eq!(ok_exact("(-2)^2"), "4");
        assert_eq!(ok_exact("2*-3"), "-6");
        assert_eq!(ok_exact("2--3"), "5");
        assert_eq!(ok_exact("2+-3"), "-1");
    }

    #[test]
    fn rationnels_exacts() {
        assert_eq!(ok_exact("1/2+1/3"), "5/6");
        assert_eq!(ok_exact("0.1+0.2"), "3/10");
        assert_eq!(ok_dec("0.1+0.2", 20), "0.3");
        assert_eq!(ok_dec("2^-1", 20), "0.5");
        assert_eq!(ok_dec("1/3", 6), "0.333333");
    }

    #[test]
    fn multiplication_implicite() {
        assert_eq!(ok_exact("2(3+1)"), "8");
        assert_eq!(ok_exact("(1+1)(2+2)"), "8");
    }

    #[test]
    fn espaces_ignores() {
        assert_eq!(ok_exact("  2 +  3 "), "5");
    }

    // --- Erreurs ---

    #[test]
    fn division_par_zero() {
        assert_eq!(err("5/0"), ErreurEval::DivisionParZero);
        assert_eq!(err("1/(2-2)"), ErreurEval::DivisionParZero);
    }

    #[test]
    fn entrees_invalides() {
        assert_eq!(err(""), ErreurEval::EntreeVide);
        assert_eq!(err("   "), ErreurEval::EntreeVide);
        assert_eq!(err("(1+2"), ErreurEval::ParenthesesNonFermees);
        assert_eq!(err("2+"), ErreurEval::ExpressionInvalide);
        assert_eq!(err("2**3"), ErreurEval::ExpressionInvalide);
        assert_eq!(err("x+1"), ErreurEval::CaractereInattendu('x'));
        assert_eq!(err("2^0.5"), ErreurEval::RacineNonExacte);
    }

    #[test]
    fn racines_exactes() {
        assert_eq!(ok_exact("4^0.5"), "2");
        assert_eq!(ok_exact("8^(1/3)"), "2");
        assert_eq!(ok_exact("0.25^0.5"), "1/2");
        assert_eq!(ok_exact("27^(2/3)"), "9");
    }

    // --- Garde-fous (entrées valides mais démesurées) ---

    #[test]
    fn puissance_imbriquee_refusee_sans_calcul() {
        assert_eq!(
            err("(9^4096)^4096"),
            ErreurEval::ResultatTropGrand(TAILLE_MAX_BITS)
        );
        assert_eq!(
            err("((9^4096)^4096)^4096"),
            ErreurEval::ResultatTropGrand(TAILLE_MAX_BITS)
        );
    }

    #[test]
    fn longue_somme_evaluee() {
        let s = "1+".repeat(PROFONDEUR_MAX - 1) + "1";
        assert_eq!(ok_exact(&s), PROFONDEUR_MAX.to_string());
    }

    #[test]
    fn chaines_demesurees_refusees() {
        let somme = "1+".repeat(200_000) + "1";
        assert_eq!(err(&somme), ErreurEval::ExpressionTropLongue(MAX_JETONS));

        let signes = "-".repeat(500_000) + "1";
        assert_eq!(err(&signes), ErreurEval::ExpressionTropLongue(MAX_JETONS));

        let somme = "1+".repeat(50_000) + "1";
        assert_eq!(err(&somme), ErreurEval::ExpressionTropProfonde(PROFONDEUR_MAX));

        let signes = "-".repeat(5_000) + "1";
        assert_eq!(err(&signes), ErreurEval::ExpressionTropProfonde(PROFONDEUR_MAX));

        // profondeur tolérée : 1000 moins unaires (nombre pair)
        assert_eq!(ok_exact(&("-".repeat(1000) + "1")), "1");
    }

    #[test]
    fn demarche_remplie() {
        let (_v, d) = eval_expression("2+3*4").unwrap();
        assert_eq!(d.jetons, "2 + 3 * 4");
        assert_eq!(d.rpn, "2 3 4 * +");
        assert_eq!(d.arbre, "(2 + (3 * 4))");
    }
}
