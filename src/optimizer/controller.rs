// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONTROLADOR DE RE-OTIMIZAÇÃO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Guarda o estado imutável de uma sessão (pool validado, relevâncias,
// matriz de interferência, penalidades) e re-executa o SlateBuilder a
// cada mudança de γ/β sem tocar no parser, no filtro ou no retriever.
//
// Escopo do pool (cacheado):   relevância, interferência, penalidades
// Escopo da chamada (nunca):   γ, β, slate resultante
//
// Concorrência: o estado fica atrás de um Arc e nunca é mutado, então
// pode ser compartilhado entre threads sem lock. A única coisa mutável é
// o contador de requisições usado para "a última requisição vence".
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use super::barrier::ConstraintBarrier;
use super::interference::InterferenceMatrix;
use super::normalizer::UnitVector;
use super::relevance::{NormalizedQuery, RelevanceScorer};
use super::slate::{SlateBuilder, SlateRequest};
use crate::config::OptimizerConfig;
use crate::error::{SlateError, SlateResult};
use crate::types::{CandidateItem, QueryRepresentation, Slate, Weights};
use crate::utils::{ActionTimer, REOPTIMIZE_LATENCY_BUDGET};

/// Ticket de uma requisição de re-otimização
///
/// Só o ticket mais recente de uma sessão é "atual"; resultados de
/// tickets anteriores são descartados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Número sequencial do ticket dentro da sessão
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Estado de uma sessão, somente leitura depois de construído
#[derive(Debug)]
struct SessionState {
    id: Uuid,
    query: NormalizedQuery,
    candidates: Vec<CandidateItem>,
    relevance: Vec<f32>,
    interference: InterferenceMatrix,
    penalties: Vec<f32>,
    config: OptimizerConfig,
}

/// Controlador de re-otimização de uma sessão de query
///
/// Clonar é barato (dois `Arc`) e os clones compartilham a mesma sessão,
/// inclusive a sequência de tickets.
///
/// # Exemplo
///
/// ```rust,ignore
/// let controller = ReoptimizationController::new(&query, pool, OptimizerConfig::default())?;
///
/// // Slider de diversidade mexeu
/// let slate = controller.reoptimize(Weights::new(0.8, 0.0))?;
/// for entry in &slate.entries {
///     println!("{} r={:.2} overlap={:.2}", entry.id, entry.relevance, entry.interference_added);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ReoptimizationController {
    state: Arc<SessionState>,
    latest: Arc<AtomicU64>,
}

impl ReoptimizationController {
    /// Monta a sessão sem restrições suaves (modo padrão: só filtro duro)
    pub fn new(
        query: &QueryRepresentation,
        pool: Vec<CandidateItem>,
        config: OptimizerConfig,
    ) -> SlateResult<Self> {
        Self::with_barrier(query, pool, &ConstraintBarrier::new(), config)
    }

    /// Monta a sessão: valida e normaliza tudo, calcula relevâncias,
    /// penalidades e a matriz de interferência uma única vez.
    ///
    /// # Erros
    ///
    /// - `EmptyPool`, `DuplicateCandidate`
    /// - `DegenerateVector` / `NonFiniteVector` (query ou item)
    /// - `DimensionMismatch` entre item e query
    /// - `InvalidWeight` (mistura inválida)
    /// - `InvalidConstraint` (λ inválido, g(x) não finito, B(x) estoura f32)
    pub fn with_barrier(
        query: &QueryRepresentation,
        pool: Vec<CandidateItem>,
        barrier: &ConstraintBarrier,
        config: OptimizerConfig,
    ) -> SlateResult<Self> {
        let timer = ActionTimer::start("Session build");

        if pool.is_empty() {
            return Err(SlateError::EmptyPool);
        }

        let mut seen = HashSet::with_capacity(pool.len());
        for item in &pool {
            if !seen.insert(item.id.as_str()) {
                return Err(SlateError::DuplicateCandidate(item.id.clone()));
            }
        }

        let query = NormalizedQuery::from_representation(query, config.epsilon)?;
        let dimension = query.dimension();

        let units = pool
            .iter()
            .map(|item| {
                let subject = format!("candidate '{}'", item.id);
                if item.vector.len() != dimension {
                    return Err(SlateError::DimensionMismatch {
                        subject,
                        expected: dimension,
                        actual: item.vector.len(),
                    });
                }
                UnitVector::normalize(&item.vector, &subject, config.epsilon)
            })
            .collect::<SlateResult<Vec<UnitVector>>>()?;

        let parallel = config.use_parallel(pool.len());
        let relevance = crate::timed!(
            "Relevance scoring",
            RelevanceScorer::new(&query).score_pool(&units, parallel)
        );
        let penalties = crate::timed!("Barrier evaluation", barrier.penalties(&pool, parallel))?;
        let interference = crate::timed!(
            "Interference matrix",
            InterferenceMatrix::build(&units, parallel)
        );

        let id = Uuid::new_v4();
        let elapsed = timer.stop();
        log::info!(
            "🧭 Session {} ready: {} candidates, dim {}, {} soft constraints, mixed={} ({}µs)",
            id,
            pool.len(),
            dimension,
            barrier.len(),
            query.is_mixed(),
            elapsed.as_micros()
        );

        Ok(Self {
            state: Arc::new(SessionState {
                id,
                query,
                candidates: pool,
                relevance,
                interference,
                penalties,
                config,
            }),
            latest: Arc::new(AtomicU64::new(0)),
        })
    }

    fn builder(&self) -> SlateResult<SlateBuilder<'_>> {
        SlateBuilder::new(
            &self.state.candidates,
            &self.state.relevance,
            &self.state.interference,
            &self.state.penalties,
        )
    }

    fn request(&self, weights: Weights) -> SlateRequest {
        SlateRequest::new(self.state.config.slate_size, weights)
            .with_policy(self.state.config.size_policy)
    }

    /// Re-otimiza com novos γ/β usando os dados cacheados
    ///
    /// Função pura de (sessão, γ, β): argumentos idênticos produzem slates
    /// bit a bit idênticos.
    pub fn reoptimize(&self, weights: Weights) -> SlateResult<Slate> {
        self.reoptimize_request(&self.request(weights))
    }

    /// Re-otimiza com os pesos padrão da configuração
    pub fn reoptimize_default(&self) -> SlateResult<Slate> {
        self.reoptimize(self.state.config.default_weights)
    }

    /// Re-otimiza com um pedido explícito (K e política próprios)
    pub fn reoptimize_request(&self, request: &SlateRequest) -> SlateResult<Slate> {
        let timer = ActionTimer::start("Reoptimize");
        let slate = self.builder()?.build(request)?;
        timer.stop_with_budget(REOPTIMIZE_LATENCY_BUDGET);
        Ok(slate)
    }

    /// Registra uma nova requisição; todas as anteriores ficam obsoletas
    pub fn begin_request(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// O ticket ainda é o mais recente?
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Re-otimiza sob a política "a última requisição vence"
    ///
    /// Retorna `Ok(None)` se um ticket mais novo foi emitido antes ou
    /// durante o cálculo; o trabalho é abandonado entre rodadas do greedy.
    /// Erros de validação são reportados mesmo para tickets obsoletos.
    pub fn reoptimize_latest(
        &self,
        ticket: RequestTicket,
        weights: Weights,
    ) -> SlateResult<Option<Slate>> {
        let timer = ActionTimer::start("Reoptimize (latest)");
        let mut still_current = || self.is_current(ticket);
        let slate = self
            .builder()?
            .build_while(&self.request(weights), &mut still_current)?;

        match slate {
            Some(slate) if self.is_current(ticket) => {
                timer.stop_with_budget(REOPTIMIZE_LATENCY_BUDGET);
                Ok(Some(slate))
            }
            _ => {
                log::warn!(
                    "⏭️  Session {}: request #{} superseded, result discarded",
                    self.state.id,
                    ticket.0
                );
                Ok(None)
            }
        }
    }

    /// ID da sessão (correlação de logs)
    pub fn session_id(&self) -> Uuid {
        self.state.id
    }

    /// N
    pub fn len(&self) -> usize {
        self.state.candidates.len()
    }

    /// Sempre falso: sessões exigem N ≥ 1
    pub fn is_empty(&self) -> bool {
        self.state.candidates.is_empty()
    }

    /// Dimensão do espaço de embeddings
    pub fn dimension(&self) -> usize {
        self.state.query.dimension()
    }

    /// Query normalizada da sessão
    pub fn query(&self) -> &NormalizedQuery {
        &self.state.query
    }

    /// r(x) cacheado, na ordem do pool
    pub fn relevance(&self) -> &[f32] {
        &self.state.relevance
    }

    /// Matriz de interferência cacheada
    pub fn interference(&self) -> &InterferenceMatrix {
        &self.state.interference
    }

    /// B(x) cacheado, na ordem do pool
    pub fn penalties(&self) -> &[f32] {
        &self.state.penalties
    }

    /// Candidato pela posição no pool
    pub fn candidate(&self, index: usize) -> Option<&CandidateItem> {
        self.state.candidates.get(index)
    }

    /// Configuração da sessão
    pub fn config(&self) -> &OptimizerConfig {
        &self.state.config
    }

    /// J(S) para índices arbitrários do pool
    ///
    /// # Erros
    ///
    /// `IndexOutOfRange` se algum índice não pertence ao pool.
    pub fn objective(&self, subset: &[usize], weights: Weights) -> SlateResult<f32> {
        self.builder()?.objective(subset, weights)
    }
}
