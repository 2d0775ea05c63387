// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BARREIRA DE RESTRIÇÕES SUAVES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// B(x) = Σ_j λ_j · max(0, g_j(x))²
//
// g_j vem do avaliador de restrições externo: g ≤ 0 satisfeita, g > 0
// violada. λ_j são fixos por configuração (não são os sliders γ/β).
// No modo padrão (só filtro duro) não há restrições e B(x) = 0 para todos.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt;

use rayon::prelude::*;

use crate::error::{SlateError, SlateResult};
use crate::types::CandidateItem;

/// Função de violação g(x) de uma restrição
///
/// Implementada automaticamente para closures `Fn(&CandidateItem) -> f32`.
#[cfg_attr(test, mockall::automock)]
pub trait ViolationFn: Send + Sync {
    /// g(x): ≤ 0 satisfeita, > 0 violada
    fn violation(&self, item: &CandidateItem) -> f32;
}

impl<F> ViolationFn for F
where
    F: Fn(&CandidateItem) -> f32 + Send + Sync,
{
    fn violation(&self, item: &CandidateItem) -> f32 {
        self(item)
    }
}

/// Uma restrição suave com seu peso λ
pub struct SoftConstraint {
    /// Nome (para logs e erros)
    pub name: String,
    /// λ ≥ 0
    pub lambda: f32,
    /// g(x)
    pub violation: Box<dyn ViolationFn>,
}

impl SoftConstraint {
    /// Cria uma restrição suave
    pub fn new(name: impl Into<String>, lambda: f32, violation: impl ViolationFn + 'static) -> Self {
        Self {
            name: name.into(),
            lambda,
            violation: Box::new(violation),
        }
    }

    fn term(&self, item: &CandidateItem) -> SlateResult<f32> {
        let g = self.violation.violation(item);
        if !g.is_finite() {
            return Err(SlateError::InvalidConstraint {
                name: self.name.clone(),
                reason: format!("non-finite violation {} for candidate '{}'", g, item.id),
            });
        }
        let excess = g.max(0.0);
        let term = self.lambda * excess * excess;
        if !term.is_finite() {
            return Err(SlateError::InvalidConstraint {
                name: self.name.clone(),
                reason: format!("penalty overflow for candidate '{}' (violation {})", item.id, g),
            });
        }
        Ok(term)
    }
}

impl fmt::Debug for SoftConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftConstraint")
            .field("name", &self.name)
            .field("lambda", &self.lambda)
            .finish_non_exhaustive()
    }
}

/// Conjunto de restrições suaves aplicadas como penalidade
#[derive(Debug, Default)]
pub struct ConstraintBarrier {
    constraints: Vec<SoftConstraint>,
}

impl ConstraintBarrier {
    /// Barreira vazia (no-op)
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona uma restrição (builder)
    pub fn with_constraint(
        mut self,
        name: impl Into<String>,
        lambda: f32,
        violation: impl ViolationFn + 'static,
    ) -> Self {
        self.constraints
            .push(SoftConstraint::new(name, lambda, violation));
        self
    }

    /// Adiciona uma restrição já construída
    pub fn push(&mut self, constraint: SoftConstraint) {
        self.constraints.push(constraint);
    }

    /// Número de restrições
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Sem restrições?
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Valida os λ (finitos, ≥ 0)
    pub fn validate(&self) -> SlateResult<()> {
        for c in &self.constraints {
            if !c.lambda.is_finite() || c.lambda < 0.0 {
                return Err(SlateError::InvalidConstraint {
                    name: c.name.clone(),
                    reason: format!("lambda must be a finite value >= 0, got {}", c.lambda),
                });
            }
        }
        Ok(())
    }

    /// B(x) de um item
    ///
    /// Sempre finito: um termo ou uma soma que estoura f32 vira erro.
    pub fn penalty(&self, item: &CandidateItem) -> SlateResult<f32> {
        self.constraints.iter().try_fold(0.0f32, |acc, c| {
            let sum = acc + c.term(item)?;
            if sum.is_finite() {
                Ok(sum)
            } else {
                Err(SlateError::InvalidConstraint {
                    name: c.name.clone(),
                    reason: format!("penalty overflow for candidate '{}'", item.id),
                })
            }
        })
    }

    /// B(x) de todo o pool, na ordem do pool
    ///
    /// Sem restrições devolve zeros sem avaliar nada.
    pub fn penalties(&self, items: &[CandidateItem], parallel: bool) -> SlateResult<Vec<f32>> {
        self.validate()?;

        if self.is_empty() {
            return Ok(vec![0.0; items.len()]);
        }

        if parallel {
            items.par_iter().map(|item| self.penalty(item)).collect()
        } else {
            items.iter().map(|item| self.penalty(item)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_price(id: &str, price: f64) -> CandidateItem {
        CandidateItem::new(id, vec![1.0, 0.0]).with_metadata(serde_json::json!({ "price": price }))
    }

    fn over_budget(budget: f64) -> impl Fn(&CandidateItem) -> f32 + Send + Sync {
        move |item: &CandidateItem| {
            let price = item.metadata["price"].as_f64().unwrap_or(0.0);
            (price - budget) as f32
        }
    }

    #[test]
    fn test_empty_barrier_is_noop() {
        let barrier = ConstraintBarrier::new();
        let items = vec![item_with_price("a", 10.0), item_with_price("b", 99.0)];

        assert_eq!(barrier.penalties(&items, false).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_satisfied_constraint_has_zero_penalty() {
        let barrier = ConstraintBarrier::new().with_constraint("budget", 2.0, over_budget(50.0));

        assert_eq!(barrier.penalty(&item_with_price("a", 40.0)).unwrap(), 0.0);
        assert_eq!(barrier.penalty(&item_with_price("b", 50.0)).unwrap(), 0.0);
    }

    #[test]
    fn test_violation_is_squared_and_weighted() {
        let barrier = ConstraintBarrier::new()
            .with_constraint("budget", 2.0, over_budget(50.0))
            .with_constraint("flat", 0.5, |_: &CandidateItem| 1.0f32);

        // 2·(53-50)² + 0.5·1² = 18.5
        let b = barrier.penalty(&item_with_price("a", 53.0)).unwrap();
        assert!((b - 18.5).abs() < 1e-4);
        assert_eq!(barrier.len(), 2);
    }

    #[test]
    fn test_negative_lambda_rejected() {
        let barrier = ConstraintBarrier::new().with_constraint("bad", -1.0, over_budget(0.0));
        let err = barrier.penalties(&[item_with_price("a", 1.0)], false).unwrap_err();
        assert!(matches!(err, SlateError::InvalidConstraint { ref name, .. } if name == "bad"));
    }

    #[test]
    fn test_non_finite_violation_rejected() {
        let barrier =
            ConstraintBarrier::new().with_constraint("nan", 1.0, |_: &CandidateItem| f32::NAN);
        assert!(matches!(
            barrier.penalty(&item_with_price("a", 1.0)),
            Err(SlateError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn test_overflowing_penalty_rejected() {
        // (1e20)² não cabe em f32
        let barrier =
            ConstraintBarrier::new().with_constraint("huge", 1.0, |_: &CandidateItem| 1e20f32);
        let err = barrier.penalty(&item_with_price("a", 1.0)).unwrap_err();
        assert!(matches!(err, SlateError::InvalidConstraint { ref name, .. } if name == "huge"));

        // cada termo é finito, a soma não
        let barrier = ConstraintBarrier::new()
            .with_constraint("big_a", 3.0e38, |_: &CandidateItem| 1.0f32)
            .with_constraint("big_b", 3.0e38, |_: &CandidateItem| 1.0f32);
        let err = barrier.penalties(&[item_with_price("a", 1.0)], false).unwrap_err();
        assert!(matches!(err, SlateError::InvalidConstraint { ref name, .. } if name == "big_b"));
    }

    #[test]
    fn test_violation_fn_evaluated_once_per_item() {
        let mut mock = MockViolationFn::new();
        mock.expect_violation()
            .times(3)
            .returning(|item| if item.id == "b" { 2.0 } else { -1.0 });

        let barrier = ConstraintBarrier::new().with_constraint("mocked", 1.0, mock);
        let items = vec![
            item_with_price("a", 0.0),
            item_with_price("b", 0.0),
            item_with_price("c", 0.0),
        ];

        let penalties = barrier.penalties(&items, false).unwrap();
        assert_eq!(penalties, vec![0.0, 4.0, 0.0]);
    }

    #[test]
    fn test_parallel_penalties_match_sequential() {
        let barrier = ConstraintBarrier::new().with_constraint("budget", 1.5, over_budget(20.0));
        let items: Vec<CandidateItem> = (0..64)
            .map(|i| item_with_price(&format!("i{}", i), i as f64))
            .collect();

        assert_eq!(
            barrier.penalties(&items, false).unwrap(),
            barrier.penalties(&items, true).unwrap()
        );
    }
}
