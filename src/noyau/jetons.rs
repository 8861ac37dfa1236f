// src/noyau/jetons.rs

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use super::erreur::ErreurEval;

/// Garde-fou : exposant décimal d’un littéral (`1e400000` gèlerait le calcul).
const EXPOSANT_LITTERAL_MAX: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    Num(BigRational),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^

    // Moins unaire : produit seulement par to_rpn (jamais par tokenize)
    Neg,

    LPar,
    RPar,
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - entiers (ex: 12)
/// - décimaux (ex: 1.5, .5, 2.) -> rationnel exact (3/2, 1/2, 2)
/// - notation scientifique (ex: 1e3, 2.5E-2)
/// - opérateurs + - * / ^
/// - parenthèses ( )
///
/// Pas de fraction littérale : "1/2" donne Num(1) Slash Num(2).
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurEval> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let (rat, suivant) = lire_nombre(&chars, i)?;
            out.push(Tok::Num(rat));
            i = suivant;
            continue;
        }

        return Err(ErreurEval::CaractereInattendu(c));
    }

    Ok(out)
}

/// Lit un littéral numérique à partir de `debut`.
/// Retourne (valeur exacte, index du premier caractère non consommé).
fn lire_nombre(chars: &[char], debut: usize) -> Result<(BigRational, usize), ErreurEval> {
    let mut i = debut;

    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    let entier: String = chars[debut..i].iter().collect();

    let mut fraction = String::new();
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        fraction = chars[start..i].iter().collect();

        // "1.2.3" : deux points décimaux, refusé
        if i < chars.len() && chars[i] == '.' {
            let brut: String = chars[debut..=i].iter().collect();
            return Err(ErreurEval::NombreInvalide(brut));
        }
    }

    if entier.is_empty() && fraction.is_empty() {
        // "." seul
        return Err(ErreurEval::NombreInvalide(".".into()));
    }

    // Exposant : seulement si 'e' est suivi d’un chiffre (éventuellement signé)
    let mut exposant: i64 = 0;
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        let negatif = j < chars.len() && chars[j] == '-';
        if j < chars.len() && (chars[j] == '-' || chars[j] == '+') {
            j += 1;
        }
        let start = j;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        if j > start {
            let txt: String = chars[start..j].iter().collect();
            let brut: String = chars[debut..j].iter().collect();
            let n: u32 = txt
                .parse()
                .ok()
                .filter(|n| *n <= EXPOSANT_LITTERAL_MAX)
                .ok_or_else(|| ErreurEval::NombreInvalide(brut))?;
            exposant = if negatif { -(n as i64) } else { n as i64 };
            i = j;
        }
    }

    let chiffres = format!("{entier}{fraction}");
    let brut: String = chars[debut..i].iter().collect();
    let mantisse = BigInt::parse_bytes(chiffres.as_bytes(), 10)
        .ok_or_else(|| ErreurEval::NombreInvalide(brut))?;

    // valeur = mantisse * 10^(exposant - len(fraction))
    let decalage = exposant - fraction.len() as i64;
    let dix = BigInt::from(10);
    let rat = if decalage >= 0 {
        BigRational::from_integer(mantisse * dix.pow(decalage as u32))
    } else {
        BigRational::new(mantisse, dix.pow((-decalage) as u32))
    };

    Ok((rat, i))
}

/// Format utilitaire (debug/journal) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    fn format_rat(r: &BigRational) -> String {
        let n = r.numer();
        let d = r.denom();
        if d.is_one() {
            format!("{n}")
        } else {
            format!("{n}/{d}")
        }
    }

    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(r) => format_rat(r),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Neg => "neg".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
