// src/noyau/lecture.rs

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed};

/// Précision par défaut de la lecture décimale.
pub const DIGITS_DEFAUT: usize = 20;

/// Garde-fou : on borne la précision (anti-abus / anti-gel).
pub const DIGITS_MAX: usize = 200;

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal tronqué.
pub fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    if digits == 0 {
        return if neg {
            format!("-{int_part}")
        } else {
            format!("{int_part}")
        };
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    if neg {
        format!("-{int_part}.{frac}")
    } else {
        format!("{int_part}.{frac}")
    }
}

/// r -> entier “scalé” = trunc(r * 10^digits)
fn rational_scaled(r: &BigRational, digits: usize) -> BigInt {
    let scale = pow10(digits);
    (r.numer() * scale) / r.denom()
}

/// Lecture décimale tronquée à `digits` chiffres, zéros finaux retirés.
///
/// 14 -> "14", 1/4 -> "0.25", 1/3 (digits=5) -> "0.33333", -1/8 -> "-0.125".
/// Une troncature qui donne zéro pour un négatif s’affiche "0" (jamais "-0").
pub fn lecture_decimale(r: &BigRational, digits: usize) -> String {
    let brut = scaled_to_decimal(rational_scaled(r, digits), digits);

    let mut txt = if brut.contains('.') {
        brut.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        brut
    };

    if txt == "-0" {
        txt = "0".to_string();
    }
    txt
}

/// EXACT : "n" ou "n/d".
pub fn format_exact(r: &BigRational) -> String {
    let n = r.numer();
    let d = r.denom();
    if d.is_one() {
        format!("{n}")
    } else {
        format!("{n}/{d}")
    }
}
