//! Noyau exact Q-pur
//!
//! Organisation interne :
//! - erreur.rs   : erreurs typées du noyau
//! - jetons.rs   : tokenisation (entiers, décimaux, notation scientifique)
//! - rpn.rs      : shunting-yard + construction Expr
//! - expr.rs     : AST exact + évaluation dans Q
//! - lecture.rs  : EXACT (n/d) + lecture décimale tronquée
//! - eval.rs     : pipeline complet + `EvaluateurExact`

pub mod erreur;
pub mod eval;
pub mod expr;
pub mod jetons;
pub mod lecture;
pub mod rpn;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::ErreurEval;
pub use eval::{eval_expression, EvaluateurExact};
