// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO OTIMIZADOR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Tamanho do slate, política para K > N, pesos padrão e threshold de
// paralelismo. Todas as configurações podem ser definidas via ambiente.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt;

use crate::error::{SlateError, SlateResult};
use crate::types::Weights;

/// Epsilon padrão abaixo do qual um vetor é considerado degenerado
pub const DEFAULT_EPSILON: f32 = 1e-6;

/// Política quando o pool tem menos candidatos que K.
///
/// - `Strict`: falha com `InsufficientCandidates` (padrão)
/// - `Clamp`: reduz K para N, explicitamente marcado no slate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizePolicy {
    /// Erro quando K > N.
    #[default]
    Strict,

    /// Reduz K para N. Precisa ser pedido explicitamente.
    Clamp,
}

impl SizePolicy {
    /// Converte string do ambiente para SizePolicy.
    ///
    /// Case-insensitive:
    /// - "clamp" → Clamp
    /// - "strict" ou qualquer outro valor → Strict
    pub fn from_env(value: &str) -> Self {
        match value.to_lowercase().trim() {
            "clamp" => Self::Clamp,
            _ => Self::Strict,
        }
    }

    /// Retorna nome legível para logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Strict => "Strict (error when K > N)",
            Self::Clamp => "Clamp (K → N)",
        }
    }

    /// Resolve o tamanho efetivo do slate para um pool de `available` itens.
    ///
    /// Retorna `(tamanho_efetivo, foi_reduzido)`.
    pub fn resolve(&self, requested: usize, available: usize) -> SlateResult<(usize, bool)> {
        if requested == 0 {
            return Err(SlateError::InvalidSlateSize(requested));
        }
        if requested <= available {
            return Ok((requested, false));
        }
        match self {
            Self::Strict => Err(SlateError::InsufficientCandidates {
                requested,
                available,
            }),
            Self::Clamp => {
                log::warn!(
                    "✂️  Slate size clamped: requested {}, pool has {}",
                    requested,
                    available
                );
                Ok((available, true))
            }
        }
    }
}

impl fmt::Display for SizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Configuração do otimizador de slate.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// K: tamanho do slate.
    /// Padrão: 5
    pub slate_size: usize,

    /// Política para K > N.
    pub size_policy: SizePolicy,

    /// Pesos usados quando o caller não informa γ/β.
    pub default_weights: Weights,

    /// A partir de quantos candidatos o scoring usa Rayon.
    /// Padrão: 256 (abaixo disso o overhead de threads domina)
    pub parallel_threshold: usize,

    /// Norma mínima para normalizar um vetor.
    pub epsilon: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            slate_size: 5,
            size_policy: SizePolicy::default(),
            default_weights: Weights::default(),
            parallel_threshold: 256,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl OptimizerConfig {
    /// Cria configuração padrão.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define K.
    pub fn with_slate_size(mut self, slate_size: usize) -> Self {
        self.slate_size = slate_size;
        self
    }

    /// Define a política para K > N.
    pub fn with_size_policy(mut self, size_policy: SizePolicy) -> Self {
        self.size_policy = size_policy;
        self
    }

    /// Define os pesos padrão.
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.default_weights = weights;
        self
    }

    /// Define o threshold de paralelismo.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Verifica se um pool de `n` itens deve ser processado em paralelo.
    pub fn use_parallel(&self, n: usize) -> bool {
        n >= self.parallel_threshold
    }
}

/// Lê uma variável de ambiente e aplica `parse`; valores inválidos são
/// ignorados com warning e o padrão é mantido.
fn env_value<T, F>(name: &str, parse: F) -> Option<T>
where
    F: Fn(&str) -> Option<T>,
{
    let raw = std::env::var(name).ok()?;
    match parse(raw.trim()) {
        Some(value) => Some(value),
        None => {
            log::warn!("⚠️  {}={:?} inválido, mantendo padrão", name, raw);
            None
        }
    }
}

fn parse_non_negative(s: &str) -> Option<f32> {
    s.parse::<f32>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

fn parse_positive_usize(s: &str) -> Option<usize> {
    s.parse::<usize>().ok().filter(|v| *v > 0)
}

/// Carrega configuração do otimizador a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `SLATE_SIZE`: K (padrão: 5)
/// - `SLATE_SIZE_POLICY`: "strict" ou "clamp" (padrão: strict)
/// - `SLATE_DIVERSITY`: γ padrão (padrão: 0.5)
/// - `SLATE_SOFTNESS`: β padrão (padrão: 0.0)
/// - `SLATE_PARALLEL_THRESHOLD`: candidatos mínimos para Rayon (padrão: 256)
/// - `SLATE_EPSILON`: norma mínima para normalização (padrão: 1e-6)
///
/// # Exemplo
///
/// ```rust,ignore
/// // ambiente
/// SLATE_SIZE=8
/// SLATE_SIZE_POLICY=clamp
///
/// let config = load_optimizer_config();
/// assert_eq!(config.slate_size, 8);
/// assert_eq!(config.size_policy, SizePolicy::Clamp);
/// ```
pub fn load_optimizer_config() -> OptimizerConfig {
    let mut config = OptimizerConfig::default();

    if let Some(size) = env_value("SLATE_SIZE", parse_positive_usize) {
        config.slate_size = size;
        log::info!("📦 SLATE_SIZE={}", size);
    }

    if let Ok(policy_str) = std::env::var("SLATE_SIZE_POLICY") {
        config.size_policy = SizePolicy::from_env(&policy_str);
        log::info!("📦 SLATE_SIZE_POLICY={}", config.size_policy);
    }

    if let Some(gamma) = env_value("SLATE_DIVERSITY", parse_non_negative) {
        config.default_weights.gamma = gamma;
        log::info!("📦 SLATE_DIVERSITY={}", gamma);
    }

    if let Some(beta) = env_value("SLATE_SOFTNESS", parse_non_negative) {
        config.default_weights.beta = beta;
        log::info!("📦 SLATE_SOFTNESS={}", beta);
    }

    if let Some(threshold) = env_value("SLATE_PARALLEL_THRESHOLD", parse_positive_usize) {
        config.parallel_threshold = threshold;
        log::info!("📦 SLATE_PARALLEL_THRESHOLD={}", threshold);
    }

    if let Some(epsilon) = env_value("SLATE_EPSILON", |s| {
        parse_non_negative(s).filter(|v| *v > 0.0)
    }) {
        config.epsilon = epsilon;
        log::info!("📦 SLATE_EPSILON={}", epsilon);
    }

    log::info!(
        "🔧 Slate optimizer: K={}, policy={}, γ={}, β={}",
        config.slate_size,
        config.size_policy,
        config.default_weights.gamma,
        config.default_weights.beta
    );

    config
}
