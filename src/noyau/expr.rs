// src/noyau/expr.rs
//
// AST exact (sans flottants).
// - Rat : rationnel exact
// - Neg : moins unaire
// - Add/Sub/Mul/Div/Pow : opérations binaires
//
// IMPORTANT (SAFE):
// - aucune valeur n’est approchée : l’évaluation reste dans Q.
// - parcours itératif (pile explicite) : pas de récursion sur l’arbre.
// - l’exposant de Pow est borné ; un exposant p/q passe par une racine
//   q-ième exacte (sinon erreur).
// - taille de chaque valeur bornée + budget global (anti-gel).

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::fmt;

use super::erreur::ErreurEval;

/// Garde-fou : |exposant| maximal accepté pour `^`.
pub const EXPOSANT_MAX: i64 = 4096;

/// Garde-fou : indice maximal d’une racine exacte (dénominateur de l’exposant).
pub const INDICE_RACINE_MAX: u32 = 64;

/// Garde-fou : taille maximale (bits du numérateur ou du dénominateur) d’une valeur.
pub const TAILLE_MAX_BITS: u64 = 32_768;

/// Garde-fou : somme des tailles de toutes les valeurs produites par une évaluation.
pub const BUDGET_BITS: u64 = 4_000_000;

/// Garde-fous du parcours (mêmes ordres de grandeur que la RPN).
const MAX_PILE: usize = 8192;
const MAX_NOEUDS: usize = 200_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Rat(BigRational),

    Neg(Box<Expr>),

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Évaluation exacte, itérative (post-ordre sur une pile explicite).
    pub fn evaluer(&self) -> Result<BigRational, ErreurEval> {
        use Expr::*;

        #[derive(Copy, Clone)]
        enum Marque<'a> {
            Entrer(&'a Expr),
            Sortir(&'a Expr),
        }

        let mut pile: Vec<Marque<'_>> = Vec::with_capacity(64);
        let mut valeurs: Vec<BigRational> = Vec::with_capacity(64);
        let mut budget = BUDGET_BITS;
        let mut visites: usize = 0;

        pile.push(Marque::Entrer(self));

        while let Some(m) = pile.pop() {
            match m {
                Marque::Entrer(e) => {
                    visites += 1;
                    if visites > MAX_NOEUDS {
                        return Err(ErreurEval::ExpressionTropLongue(MAX_NOEUDS));
                    }
                    if pile.len() > MAX_PILE {
                        return Err(ErreurEval::ExpressionTropProfonde(MAX_PILE));
                    }

                    pile.push(Marque::Sortir(e));
                    match e {
                        Rat(_) => {}
                        Neg(x) => pile.push(Marque::Entrer(x.as_ref())),
                        Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Pow(a, b) => {
                            pile.push(Marque::Entrer(b.as_ref()));
                            pile.push(Marque::Entrer(a.as_ref()));
                        }
                    }
                }

                Marque::Sortir(e) => {
                    let v = match e {
                        Rat(r) => r.clone(),
                        Neg(_) => -depiler(&mut valeurs)?,
                        _ => {
                            let b = depiler(&mut valeurs)?;
                            let a = depiler(&mut valeurs)?;
                            binaire(e, a, b)?
                        }
                    };

                    let bits = taille_bits(&v);
                    if bits > TAILLE_MAX_BITS {
                        return Err(ErreurEval::ResultatTropGrand(TAILLE_MAX_BITS));
                    }
                    budget = budget
                        .checked_sub(bits)
                        .ok_or(ErreurEval::CalculTropLong(BUDGET_BITS))?;

                    valeurs.push(v);
                }
            }
        }

        match (valeurs.pop(), valeurs.is_empty()) {
            (Some(v), true) => Ok(v),
            _ => Err(ErreurEval::ExpressionInvalide),
        }
    }
}

fn depiler(valeurs: &mut Vec<BigRational>) -> Result<BigRational, ErreurEval> {
    valeurs.pop().ok_or(ErreurEval::ExpressionInvalide)
}

fn binaire(op: &Expr, a: BigRational, b: BigRational) -> Result<BigRational, ErreurEval> {
    match op {
        Expr::Add(..) => Ok(a + b),
        Expr::Sub(..) => Ok(a - b),
        Expr::Mul(..) => Ok(a * b),
        Expr::Div(..) => {
            if b.is_zero() {
                return Err(ErreurEval::DivisionParZero);
            }
            Ok(a / b)
        }
        Expr::Pow(..) => puissance(a, b),
        Expr::Rat(_) | Expr::Neg(_) => Err(ErreurEval::ExpressionInvalide),
    }
}

/// Taille d’un rationnel : bits du plus grand de |numérateur| et dénominateur.
fn taille_bits(r: &BigRational) -> u64 {
    r.numer().bits().max(r.denom().bits())
}

/// b^(p/q) exact : racine q-ième exacte de b, puis puissance entière p.
fn puissance(base: BigRational, exp: BigRational) -> Result<BigRational, ErreurEval> {
    let p = exp
        .numer()
        .to_i64()
        .filter(|n| n.abs() <= EXPOSANT_MAX)
        .ok_or(ErreurEval::ExposantTropGrand(EXPOSANT_MAX))?;

    let base = if exp.denom().is_one() {
        base
    } else {
        let q = exp
            .denom()
            .to_u32()
            .filter(|q| *q <= INDICE_RACINE_MAX)
            .ok_or(ErreurEval::IndiceRacineTropGrand(INDICE_RACINE_MAX))?;
        racine_exacte(&base, q)?
    };

    rational_pow_int(base, p)
}

/// Racine q-ième exacte d’un rationnel (négatif seulement si q impair).
fn racine_exacte(x: &BigRational, q: u32) -> Result<BigRational, ErreurEval> {
    if x.is_negative() && q % 2 == 0 {
        return Err(ErreurEval::RacineNonExacte);
    }
    let n = racine_entiere(x.numer(), q)?;
    let d = racine_entiere(x.denom(), q)?;
    Ok(BigRational::new(n, d))
}

fn racine_entiere(n: &BigInt, q: u32) -> Result<BigInt, ErreurEval> {
    let m = n.magnitude();
    let r = m.nth_root(q);
    if r.pow(q) != *m {
        return Err(ErreurEval::RacineNonExacte);
    }
    let signe = if n.is_negative() { Sign::Minus } else { Sign::Plus };
    Ok(BigInt::from_biguint(signe, r))
}

/// b^n exact (exponentiation rapide). 0^-n => division par zéro.
///
/// La taille du résultat est estimée AVANT le calcul (bits(b) * |n|).
fn rational_pow_int(base: BigRational, exp: i64) -> Result<BigRational, ErreurEval> {
    if exp == 0 {
        return Ok(BigRational::one());
    }
    if exp < 0 {
        if base.is_zero() {
            return Err(ErreurEval::DivisionParZero);
        }
        let pos = rational_pow_int(base, -exp)?;
        return Ok(BigRational::one() / pos);
    }

    let estimation = taille_bits(&base).saturating_mul(exp.unsigned_abs());
    if estimation > TAILLE_MAX_BITS {
        return Err(ErreurEval::ResultatTropGrand(TAILLE_MAX_BITS));
    }

    let mut e = exp as u64;
    let mut acc = BigRational::one();
    let mut b = base;

    while e > 0 {
        if (e & 1) == 1 {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b *= b.clone();
        }
    }
    Ok(acc)
}

/* ------------------------ Affichage (journal) ------------------------ */

fn fmt_rat(r: &BigRational, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let n: &BigInt = r.numer();
    let d: &BigInt = r.denom();
    if d.is_one() {
        if n.is_negative() {
            write!(f, "({n})")
        } else {
            write!(f, "{n}")
        }
    } else {
        write!(f, "({n}/{d})")
    }
}

impl fmt::Display for Expr {
    /// Forme entièrement parenthésée : lisible, sans ambiguïté de priorité.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match self {
            Rat(r) => fmt_rat(r, f),
            Neg(x) => write!(f, "-{x}"),
            Add(a, b) => write!(f, "({a} + {b})"),
            Sub(a, b) => write!(f, "({a} - {b})"),
            Mul(a, b) => write!(f, "({a} * {b})"),
            Div(a, b) => write!(f, "({a} / {b})"),
            Pow(a, b) => write!(f, "({a} ^ {b})"),
        }
    }
}
