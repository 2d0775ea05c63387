// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SLATE BUILDER (SELEÇÃO GULOSA)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Objetivo:
//   J(S) = Σ r(x) − γ·I(S) − β·Σ B(x),   I(S) = Σ_{i<j ∈ S} overlap(i, j)
//
// Ganho marginal de adicionar x ao S atual:
//   ΔJ(x) = r(x) − γ·Σ_{s∈S} overlap(x, s) − β·B(x)
//
// Σ_{s∈S} overlap(x, s) é mantido incrementalmente por candidato, então
// cada rodada custa O(N) e o slate inteiro O(K·N).
//
// É uma heurística gulosa de uma passada: não garante o ótimo global
// (com a barreira o objetivo não é submodular em geral).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use super::interference::InterferenceMatrix;
use crate::config::SizePolicy;
use crate::error::{SlateError, SlateResult};
use crate::types::{CandidateItem, Slate, SlateEntry, Weights};

/// Pedido de slate: tamanho, política para K > N e pesos
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlateRequest {
    /// K
    pub size: usize,
    /// O que fazer quando K > N
    pub policy: SizePolicy,
    /// γ e β desta chamada
    pub weights: Weights,
}

impl SlateRequest {
    /// Cria um pedido com política estrita
    pub fn new(size: usize, weights: Weights) -> Self {
        Self {
            size,
            policy: SizePolicy::Strict,
            weights,
        }
    }

    /// Define a política de tamanho
    pub fn with_policy(mut self, policy: SizePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Monta slates gulosos sobre dados já pontuados de um pool
///
/// Não possui nada: empresta relevância, interferência e penalidades,
/// que são do escopo do pool. Pesos e slate são do escopo da chamada.
pub struct SlateBuilder<'a> {
    candidates: &'a [CandidateItem],
    relevance: &'a [f32],
    interference: &'a InterferenceMatrix,
    penalties: &'a [f32],
}

impl<'a> SlateBuilder<'a> {
    /// Cria um builder
    ///
    /// # Erros
    ///
    /// `InconsistentLength` se relevância, matriz ou penalidades não têm
    /// o mesmo tamanho do pool.
    pub fn new(
        candidates: &'a [CandidateItem],
        relevance: &'a [f32],
        interference: &'a InterferenceMatrix,
        penalties: &'a [f32],
    ) -> SlateResult<Self> {
        let expected = candidates.len();
        for (what, actual) in [
            ("relevance", relevance.len()),
            ("interference", interference.len()),
            ("penalties", penalties.len()),
        ] {
            if actual != expected {
                return Err(SlateError::InconsistentLength {
                    what,
                    expected,
                    actual,
                });
            }
        }

        Ok(Self {
            candidates,
            relevance,
            interference,
            penalties,
        })
    }

    /// β·B(x), zero quando β = 0 (a barreira não participa)
    #[inline]
    fn barrier_term(beta: f32, penalty: f32) -> f32 {
        if beta == 0.0 {
            0.0
        } else {
            beta * penalty
        }
    }

    /// Tamanho do pool
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Pool vazio?
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Valida o pedido e monta o slate
    ///
    /// # Erros
    ///
    /// - `InvalidWeight`: γ < 0 ou β < 0
    /// - `InvalidSlateSize`: K = 0
    /// - `InsufficientCandidates`: K > N com política estrita
    pub fn build(&self, request: &SlateRequest) -> SlateResult<Slate> {
        let mut never_cancelled = || true;
        let slate = self.build_while(request, &mut never_cancelled)?;
        // Sem cancelamento o loop sempre completa
        Ok(slate.unwrap_or_else(|| self.empty_slate(request)))
    }

    /// Como [`build`](Self::build), mas consulta `keep_going` antes de cada
    /// rodada; se ele retornar `false` o trabalho é abandonado e o
    /// resultado é `Ok(None)`.
    pub fn build_while<F>(
        &self,
        request: &SlateRequest,
        keep_going: &mut F,
    ) -> SlateResult<Option<Slate>>
    where
        F: FnMut() -> bool,
    {
        request.weights.validate()?;
        let (k, clamped) = request.policy.resolve(request.size, self.len())?;

        let entries = match self.greedy(k, request.weights, keep_going) {
            Some(entries) => entries,
            None => return Ok(None),
        };

        Ok(Some(Slate {
            entries,
            weights: request.weights,
            requested_size: request.size,
            clamped,
        }))
    }

    fn empty_slate(&self, request: &SlateRequest) -> Slate {
        Slate {
            entries: Vec::new(),
            weights: request.weights,
            requested_size: request.size,
            clamped: false,
        }
    }

    /// Loop guloso sobre entradas já validadas (k ≤ N). Total: não falha.
    fn greedy<F>(&self, k: usize, weights: Weights, keep_going: &mut F) -> Option<Vec<SlateEntry>>
    where
        F: FnMut() -> bool,
    {
        let n = self.len();
        let Weights { gamma, beta } = weights;

        let mut selected = vec![false; n];
        // Σ_{s∈S} overlap(x, s) para cada candidato x
        let mut accumulated = vec![0.0f32; n];
        let mut entries = Vec::with_capacity(k);
        let mut objective = 0.0f32;

        for round in 0..k {
            if !keep_going() {
                log::debug!("🛑 Greedy abandoned at round {}/{}", round, k);
                return None;
            }

            // Varredura na ordem do pool com `>` estrito: em empate vence
            // o candidato mais cedo.
            let mut best: Option<(usize, f32)> = None;
            for x in 0..n {
                if selected[x] {
                    continue;
                }
                let gain = self.relevance[x]
                    - gamma * accumulated[x]
                    - Self::barrier_term(beta, self.penalties[x]);
                match best {
                    Some((_, best_gain)) if gain <= best_gain => {}
                    _ => best = Some((x, gain)),
                }
            }

            let Some((chosen, gain)) = best else {
                break;
            };

            objective += gain;
            entries.push(SlateEntry {
                id: self.candidates[chosen].id.clone(),
                pool_index: chosen,
                relevance: self.relevance[chosen],
                interference_added: accumulated[chosen],
                barrier_penalty: self.penalties[chosen],
                marginal_gain: gain,
                cumulative_objective: objective,
            });
            selected[chosen] = true;

            log::debug!(
                "🎯 Round {}: '{}' (ΔJ={:.4}, r={:.4}, overlap={:.4}, J={:.4})",
                round + 1,
                self.candidates[chosen].id,
                gain,
                self.relevance[chosen],
                accumulated[chosen],
                objective
            );

            for x in 0..n {
                if !selected[x] {
                    accumulated[x] += self.interference.overlap(x, chosen);
                }
            }
        }

        Some(entries)
    }

    /// J(S) para um subconjunto arbitrário de índices do pool
    ///
    /// Útil para conferir os objetivos cumulativos de um slate ou comparar
    /// o resultado guloso com outras seleções.
    ///
    /// # Erros
    ///
    /// `IndexOutOfRange` se algum índice não pertence ao pool.
    pub fn objective(&self, subset: &[usize], weights: Weights) -> SlateResult<f32> {
        let interference = self.interference.subset_interference(subset)?;
        let relevance: f32 = subset.iter().map(|&i| self.relevance[i]).sum();
        let penalty: f32 = subset
            .iter()
            .map(|&i| Self::barrier_term(weights.beta, self.penalties[i]))
            .sum();
        Ok(relevance - weights.gamma * interference - penalty)
    }
}
