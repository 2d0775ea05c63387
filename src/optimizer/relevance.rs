// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RELEVÂNCIA (REGRA DE BORN)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Query simples:  r(x) = |⟨φ, ψx⟩|²
// Query mista:    r(x) = Σ_k p_k · |⟨φ_k, ψx⟩|²
//
// Ambas ficam em [0, 1]: a primeira é cosseno ao quadrado entre vetores
// unitários, a segunda é combinação convexa de termos em [0, 1].
// A relevância depende só da query; mudar γ/β não a invalida.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use rayon::prelude::*;

use super::normalizer::UnitVector;
use crate::error::{SlateError, SlateResult};
use crate::types::QueryRepresentation;

/// Query já normalizada e validada
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedQuery {
    /// Intenção única
    Single(UnitVector),
    /// Intenções ponderadas; pesos não negativos somando 1
    Mixed(Vec<(UnitVector, f32)>),
}

impl NormalizedQuery {
    /// Normaliza os vetores e os pesos de uma [`QueryRepresentation`]
    ///
    /// Pesos da mistura que não somam 1 são re-escalados.
    ///
    /// # Erros
    ///
    /// - `InvalidWeight`: mistura vazia, peso negativo/não finito, soma zero
    /// - `DegenerateVector` / `NonFiniteVector`: vetor inválido
    /// - `DimensionMismatch`: componentes com dimensões diferentes
    pub fn from_representation(query: &QueryRepresentation, epsilon: f32) -> SlateResult<Self> {
        match query {
            QueryRepresentation::Single { vector } => Ok(Self::Single(UnitVector::normalize(
                vector, "query", epsilon,
            )?)),
            QueryRepresentation::Mixed { components } => {
                if components.is_empty() {
                    return Err(SlateError::invalid_weight(
                        "mixed query must have at least one component",
                    ));
                }

                if let Some((k, c)) = components
                    .iter()
                    .enumerate()
                    .find(|(_, c)| !c.weight.is_finite() || c.weight < 0.0)
                {
                    return Err(SlateError::invalid_weight(format!(
                        "query component {} has weight {}",
                        k, c.weight
                    )));
                }

                let total: f32 = components.iter().map(|c| c.weight).sum();
                if total <= 0.0 {
                    return Err(SlateError::invalid_weight(
                        "mixed query weights sum to zero",
                    ));
                }

                let mut normalized: Vec<(UnitVector, f32)> = Vec::with_capacity(components.len());
                for (k, c) in components.iter().enumerate() {
                    let subject = format!("query component {}", k);
                    let unit = UnitVector::normalize(&c.vector, &subject, epsilon)?;
                    if let Some((first, _)) = normalized.first() {
                        if first.dimension() != unit.dimension() {
                            return Err(SlateError::DimensionMismatch {
                                subject,
                                expected: first.dimension(),
                                actual: unit.dimension(),
                            });
                        }
                    }
                    normalized.push((unit, c.weight / total));
                }

                Ok(Self::Mixed(normalized))
            }
        }
    }

    /// Dimensão do espaço da query
    pub fn dimension(&self) -> usize {
        match self {
            Self::Single(phi) => phi.dimension(),
            Self::Mixed(components) => components
                .first()
                .map(|(phi, _)| phi.dimension())
                .unwrap_or(0),
        }
    }

    /// Componentes como pares (vetor, peso); `Single` vira um par de peso 1
    pub fn components(&self) -> Vec<(&UnitVector, f32)> {
        match self {
            Self::Single(phi) => vec![(phi, 1.0)],
            Self::Mixed(components) => components.iter().map(|(phi, p)| (phi, *p)).collect(),
        }
    }

    /// Query mista?
    pub fn is_mixed(&self) -> bool {
        matches!(self, Self::Mixed(_))
    }
}

/// Calcula a relevância de Born de itens contra uma query
pub struct RelevanceScorer<'a> {
    query: &'a NormalizedQuery,
}

impl<'a> RelevanceScorer<'a> {
    /// Cria um scorer para a query
    pub fn new(query: &'a NormalizedQuery) -> Self {
        Self { query }
    }

    /// r(x) para um item
    pub fn score(&self, item: &UnitVector) -> f32 {
        let r = match self.query {
            NormalizedQuery::Single(phi) => phi.squared_projection(item),
            NormalizedQuery::Mixed(components) => components
                .iter()
                .map(|(phi, p)| p * phi.squared_projection(item))
                .sum(),
        };
        r.clamp(0.0, 1.0)
    }

    /// r(x) para todo o pool, na ordem do pool
    ///
    /// Cada item é independente; com `parallel` o trabalho vai para o Rayon
    /// e o resultado é idêntico ao sequencial.
    pub fn score_pool(&self, items: &[UnitVector], parallel: bool) -> Vec<f32> {
        if parallel {
            items.par_iter().map(|item| self.score(item)).collect()
        } else {
            items.iter().map(|item| self.score(item)).collect()
        }
    }
}
