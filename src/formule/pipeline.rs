// src/formule/pipeline.rs
//
// Pipeline d’évaluation : Repos -> Evalue.
// - sérialise le tampon
// - appelle l’évaluateur externe
// - toute erreur devient la sentinelle "Error" (rien ne remonte au-delà)

use std::fmt;

use num_rational::BigRational;
use num_traits::ToPrimitive;
use tracing::debug;

use super::tampon::TamponFormule;
use crate::noyau::lecture::{format_exact, lecture_decimale, DIGITS_DEFAUT};

/// Évaluateur générique : expression plate -> nombre (ou échec).
///
/// Déterminisme supposé (même entrée => même sortie), non vérifié ici.
pub trait Evaluateur {
    type Erreur: fmt::Display;

    fn evaluate(&self, expression: &str) -> Result<BigRational, Self::Erreur>;
}

/// Sentinelle remise à l’hôte quand l’évaluation échoue.
pub const SENTINELLE_ERREUR: &str = "Error";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resultat {
    Nombre(BigRational),
    Erreur,
}

impl Resultat {
    pub fn is_erreur(&self) -> bool {
        matches!(self, Resultat::Erreur)
    }

    /// Lecture décimale tronquée (ou "Error").
    pub fn lecture(&self, digits: usize) -> String {
        match self {
            Resultat::Nombre(r) => lecture_decimale(r, digits),
            Resultat::Erreur => SENTINELLE_ERREUR.to_string(),
        }
    }

    /// Forme exacte "n" / "n/d" si nombre.
    pub fn exact(&self) -> Option<String> {
        match self {
            Resultat::Nombre(r) => Some(format_exact(r)),
            Resultat::Erreur => None,
        }
    }

    /// Approximation flottante pour un hôte qui veut un nombre simple.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Resultat::Nombre(r) => r.to_f64(),
            Resultat::Erreur => None,
        }
    }
}

impl fmt::Display for Resultat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lecture(DIGITS_DEFAUT))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EtatPipeline {
    #[default]
    Repos,
    Evalue(Resultat),
}

type Rappel = Box<dyn FnMut(&Resultat)>;

pub struct Pipeline<E> {
    evaluateur: E,
    etat: EtatPipeline,
    on_result: Option<Rappel>,
}

impl<E: Evaluateur> Pipeline<E> {
    pub fn new(evaluateur: E) -> Self {
        Self {
            evaluateur,
            etat: EtatPipeline::Repos,
            on_result: None,
        }
    }

    /// Rappel sortant unique vers l’hôte, appelé une fois par évaluation.
    pub fn with_on_result(mut self, rappel: impl FnMut(&Resultat) + 'static) -> Self {
        self.on_result = Some(Box::new(rappel));
        self
    }

    pub fn etat(&self) -> &EtatPipeline {
        &self.etat
    }

    /// Dernier résultat, s’il y en a un.
    pub fn resultat(&self) -> Option<&Resultat> {
        match &self.etat {
            EtatPipeline::Repos => None,
            EtatPipeline::Evalue(r) => Some(r),
        }
    }

    /// Retour à l’état Repos (résultat effacé).
    pub fn reset(&mut self) {
        self.etat = EtatPipeline::Repos;
    }

    pub fn evaluate(&mut self, tampon: &TamponFormule) -> Resultat {
        let expression = tampon.serialize();
        debug!(%expression, "évaluation");

        let resultat = match self.evaluateur.evaluate(&expression) {
            Ok(v) => Resultat::Nombre(v),
            Err(e) => {
                debug!(%expression, erreur = %e, "évaluation impossible");
                Resultat::Erreur
            }
        };

        if let Some(rappel) = self.on_result.as_mut() {
            rappel(&resultat);
        }

        self.etat = EtatPipeline::Evalue(resultat.clone());
        resultat
    }
}

impl<E: fmt::Debug> fmt::Debug for Pipeline<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("evaluateur", &self.evaluateur)
            .field("etat", &self.etat)
            .field("on_result", &self.on_result.is_some())
            .finish()
    }
}
