// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ERROS DO OTIMIZADOR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Toda validação acontece antes do loop guloso. Depois de validado, o
// SlateBuilder é uma função total: nenhum slate parcial é devolvido.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use thiserror::Error;

/// Erros que podem ocorrer ao montar uma sessão ou otimizar um slate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SlateError {
    /// Vetor com norma abaixo do epsilon: não tem direção definida
    #[error("Degenerate vector for {subject}: norm {norm} is below {epsilon}")]
    DegenerateVector {
        /// Dono do vetor ("query", "query component 1", "candidate 'abc'")
        subject: String,
        /// Norma medida
        norm: f32,
        /// Epsilon configurado
        epsilon: f32,
    },

    /// Vetor contém NaN ou infinito
    #[error("Non-finite coordinate in vector for {0}")]
    NonFiniteVector(String),

    /// Peso negativo ou inválido (γ, β, pesos da mistura, λ)
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),

    /// Menos candidatos do que o tamanho de slate pedido (sem clamp)
    #[error("Insufficient candidates: requested {requested}, pool has {available}")]
    InsufficientCandidates {
        /// K pedido
        requested: usize,
        /// N disponível
        available: usize,
    },

    /// Dimensão do vetor diferente da dimensão da sessão
    #[error("Dimension mismatch for {subject}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dono do vetor
        subject: String,
        /// Dimensão esperada
        expected: usize,
        /// Dimensão recebida
        actual: usize,
    },

    /// Identificador repetido no pool
    #[error("Duplicate candidate id: {0}")]
    DuplicateCandidate(String),

    /// Pool sem candidatos
    #[error("Candidate pool is empty")]
    EmptyPool,

    /// Tamanho de slate inválido (K = 0)
    #[error("Invalid slate size: {0} (must be >= 1)")]
    InvalidSlateSize(usize),

    /// Índice fora do pool
    #[error("Index {index} out of range for pool of {len} candidates")]
    IndexOutOfRange {
        /// Índice recebido
        index: usize,
        /// N
        len: usize,
    },

    /// Dados pontuados de tamanhos diferentes do pool
    #[error("Inconsistent {what}: expected {expected} entries, got {actual}")]
    InconsistentLength {
        /// Qual entrada ("relevance", "penalties", "interference")
        what: &'static str,
        /// N
        expected: usize,
        /// Tamanho recebido
        actual: usize,
    },

    /// Restrição suave mal configurada
    #[error("Invalid constraint '{name}': {reason}")]
    InvalidConstraint {
        /// Nome da restrição
        name: String,
        /// Motivo
        reason: String,
    },
}

impl SlateError {
    /// Cria erro de peso inválido
    pub fn invalid_weight(msg: impl Into<String>) -> Self {
        SlateError::InvalidWeight(msg.into())
    }

    /// Indica se o erro pode ser contornado reduzindo K
    pub fn is_size_related(&self) -> bool {
        matches!(
            self,
            SlateError::InsufficientCandidates { .. } | SlateError::InvalidSlateSize(_)
        )
    }
}

/// Resultado padrão das operações do otimizador
pub type SlateResult<T> = Result<T, SlateError>;
