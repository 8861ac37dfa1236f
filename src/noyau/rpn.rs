// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Priorités : + - (1) < * / (2) < moins unaire (3) < ^ (4)
// - ^ associatif à droite : 2^3^2 = 2^(3^2)
// - Moins unaire : si '-' arrive quand on n’attend PAS une valeur => Tok::Neg (préfixe)
//   donc -2^2 = -(2^2) et 2*-3 = 2*(-3)
// - Plus unaire : ignoré
// - Multiplication implicite : valeur suivie de '(' ou d’un nombre => '*' injecté
//   ex: "2(3)", "(1)(2)", "(2)3"

use super::erreur::ErreurEval;
use super::expr::Expr;
use super::jetons::Tok;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Neg => 3,
        Tok::Caret => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret)
}

/// Dépile les opérateurs qui doivent sortir avant `tok` (binaire).
fn depile_pour(tok: &Tok, ops: &mut Vec<Tok>, out: &mut Vec<Tok>) {
    while let Some(top) = ops.last() {
        if matches!(top, Tok::LPar) {
            break;
        }

        let p_top = precedence(top);
        let p_tok = precedence(tok);

        let doit_pop = if is_right_associative(tok) {
            p_top > p_tok
        } else {
            p_top >= p_tok
        };

        if !doit_pop {
            break;
        }
        if let Some(op) = ops.pop() {
            out.push(op);
        }
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Num(2), Plus, Num(3), Star, Num(4)]
///   rpn:    [Num(2), Num(3), Num(4), Star, Plus]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>, ErreurEval> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire et la multiplication implicite.
    let mut prev_was_value = false;

    for tok in tokens.iter().cloned() {
        match tok {
            Tok::Num(_) => {
                if prev_was_value {
                    depile_pour(&Tok::Star, &mut ops, &mut out);
                    ops.push(Tok::Star);
                }
                out.push(tok);
                prev_was_value = true;
            }

            Tok::LPar => {
                if prev_was_value {
                    depile_pour(&Tok::Star, &mut ops, &mut out);
                    ops.push(Tok::Star);
                }
                ops.push(tok);
                prev_was_value = false;
            }

            Tok::RPar => {
                if !prev_was_value {
                    // "()" ou "(2+)" : rien à fermer
                    return Err(ErreurEval::ExpressionInvalide);
                }

                // dépile jusqu’à '('
                let mut ferme = false;
                while let Some(top) = ops.pop() {
                    if matches!(top, Tok::LPar) {
                        ferme = true;
                        break;
                    }
                    out.push(top);
                }
                if !ferme {
                    return Err(ErreurEval::ParentheseOrpheline);
                }

                prev_was_value = true;
            }

            Tok::Plus | Tok::Minus if !prev_was_value => {
                // signe unaire : '+' ne fait rien, '-' devient Neg (préfixe, aucun dépilement)
                if matches!(tok, Tok::Minus) {
                    ops.push(Tok::Neg);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                if !prev_was_value {
                    // "2*/3", "*2"
                    return Err(ErreurEval::ExpressionInvalide);
                }
                depile_pour(&tok, &mut ops, &mut out);
                ops.push(tok);
                prev_was_value = false;
            }

            Tok::Neg => return Err(ErreurEval::ExpressionInvalide),
        }
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err(ErreurEval::ParenthesesNonFermees);
        }
        out.push(op);
    }

    Ok(out)
}

/// Profondeur maximale de l’arbre construit (affichage + Drop restent récursifs).
pub const PROFONDEUR_MAX: usize = 1024;

/// Construit une Expr à partir d’une RPN.
///
/// Chaque entrée de la pile garde la profondeur de son sous-arbre ;
/// au-delà de `PROFONDEUR_MAX` on refuse (erreur typée, pas de débordement).
pub fn from_rpn(rpn: &[Tok]) -> Result<Expr, ErreurEval> {
    let mut st: Vec<(Expr, usize)> = Vec::new();

    let pop = |st: &mut Vec<(Expr, usize)>| st.pop().ok_or(ErreurEval::ExpressionInvalide);

    for tok in rpn.iter().cloned() {
        let (e, profondeur) = match tok {
            Tok::Num(r) => (Expr::Rat(r), 1),

            Tok::Neg => {
                let (x, px) = pop(&mut st)?;
                (Expr::Neg(Box::new(x)), px + 1)
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let (b, pb) = pop(&mut st)?;
                let (a, pa) = pop(&mut st)?;
                let (a, b) = (Box::new(a), Box::new(b));

                let e = match tok {
                    Tok::Plus => Expr::Add(a, b),
                    Tok::Minus => Expr::Sub(a, b),
                    Tok::Star => Expr::Mul(a, b),
                    Tok::Slash => Expr::Div(a, b),
                    _ => Expr::Pow(a, b),
                };

                (e, pa.max(pb) + 1)
            }

            Tok::LPar | Tok::RPar => return Err(ErreurEval::ExpressionInvalide),
        };

        if profondeur > PROFONDEUR_MAX {
            return Err(ErreurEval::ExpressionTropProfonde(PROFONDEUR_MAX));
        }
        st.push((e, profondeur));
    }

    match (st.pop(), st.is_empty()) {
        (Some((e, _)), true) => Ok(e),
        _ => Err(ErreurEval::ExpressionInvalide),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::{format_tokens, tokenize};
    use pretty_assertions::assert_eq;

    fn rpn_txt(s: &str) -> String {
        let t = tokenize(s).unwrap();
        format_tokens(&to_rpn(&t).unwrap())
    }

    #[test]
    fn priorites_usuelles() {
        assert_eq!(rpn_txt("2+3*4"), "2 3 4 * +");
        assert_eq!(rpn_txt("(2+3)*4"), "2 3 + 4 *");
        assert_eq!(rpn_txt("8/4/2"), "8 4 / 2 /");
    }

    #[test]
    fn puissance_associative_a_droite() {
        assert_eq!(rpn_txt("2^3^2"), "2 3 2 ^ ^");
    }

    #[test]
    fn moins_unaire() {
        assert_eq!(rpn_txt("-2^2"), "2 2 ^ neg");
        assert_eq!(rpn_txt("2*-3"), "2 3 neg *");
        assert_eq!(rpn_txt("2^-1"), "2 1 neg ^");
        assert_eq!(rpn_txt("+5"), "5");
    }

    #[test]
    fn multiplication_implicite() {
        assert_eq!(rpn_txt("2(3)"), "2 3 *");
        assert_eq!(rpn_txt("(1)(2)"), "1 2 *");
        assert_eq!(rpn_txt("(2)3"), "2 3 *");
    }

    #[test]
    fn parentheses_mal_formees() {
        let t = tokenize("(2+3").unwrap();
        assert_eq!(to_rpn(&t), Err(ErreurEval::ParenthesesNonFermees));

        let t = tokenize("2+3)").unwrap();
        assert_eq!(to_rpn(&t), Err(ErreurEval::ParentheseOrpheline));

        let t = tokenize("()").unwrap();
        assert_eq!(to_rpn(&t), Err(ErreurEval::ExpressionInvalide));
    }

    #[test]
    fn operateur_orphelin() {
        let t = tokenize("2*/3").unwrap();
        assert_eq!(to_rpn(&t), Err(ErreurEval::ExpressionInvalide));

        // "2+" passe la RPN mais pas la reconstruction
        let t = tokenize("2+").unwrap();
        let rpn = to_rpn(&t).unwrap();
        assert_eq!(from_rpn(&rpn), Err(ErreurEval::ExpressionInvalide));
    }

    #[test]
    fn profondeur_bornee() {
        // chaîne à gauche : 1+1+…+1, profondeur = nombre de termes
        let ok = "1+".repeat(PROFONDEUR_MAX - 1) + "1";
        let rpn = to_rpn(&tokenize(&ok).unwrap()).unwrap();
        assert!(from_rpn(&rpn).is_ok());

        let trop = "1+".repeat(PROFONDEUR_MAX) + "1";
        let rpn = to_rpn(&tokenize(&trop).unwrap()).unwrap();
        assert_eq!(
            from_rpn(&rpn),
            Err(ErreurEval::ExpressionTropProfonde(PROFONDEUR_MAX))
        );

        // moins unaires empilés
        let signes = "-".repeat(PROFONDEUR_MAX) + "1";
        let rpn = to_rpn(&tokenize(&signes).unwrap()).unwrap();
        assert_eq!(
            from_rpn(&rpn),
            Err(ErreurEval::ExpressionTropProfonde(PROFONDEUR_MAX))
        );
    }
}
