//! # Born Slate - Otimizador de Slate
//!
//! Este crate implementa o **núcleo de otimização de slate** de um
//! recomendador: dada uma query e um pool de candidatos representados como
//! vetores num espaço real com produto interno, escolhe um slate de
//! tamanho fixo equilibrando relevância e redundância.
//!
//! ## Como funciona?
//!
//! 1. Todo vetor (query e itens) é normalizado para norma 1
//! 2. Cada item recebe uma relevância pela regra de Born: `r(x) = |⟨φ, ψx⟩|²`
//! 3. A sobreposição entre pares `|⟨ψi, ψj⟩|²` é calculada uma vez por pool
//! 4. Um greedy determinístico monta o slate maximizando
//!    `J(S) = Σ r(x) − γ·I(S) − β·Σ B(x)`
//! 5. Quando o usuário mexe nos sliders γ/β, só o passo 4 é re-executado
//!
//! ## Arquitetura
//!
//! ### Núcleo (`optimizer`)
//! - **UnitVector**: normalização, nunca confia no upstream
//! - **RelevanceScorer**: query simples ou mista (estado misto ponderado)
//! - **InterferenceMatrix**: sobreposições par a par, cacheadas
//! - **ConstraintBarrier**: penalidade suave opcional por restrição
//! - **SlateBuilder**: seleção gulosa com desempate pela ordem do pool
//! - **ReoptimizationController**: sessão imutável + re-otimização barata
//!
//! ### Performance (`performance`)
//! - Produto interno com SIMD (AVX2 + FMA)
//! - Rayon para scoring e matriz em pools grandes
//!
//! O greedy é uma heurística: não há garantia de ótimo global.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use born_slate::prelude::*;
//!
//! let query = QueryRepresentation::single(vec![1.0, 0.0]);
//! let pool = vec![
//!     CandidateItem::new("A", vec![1.0, 0.0]),
//!     CandidateItem::new("B", vec![0.0, 1.0]),
//!     CandidateItem::new("C", vec![0.7071, 0.7071]),
//! ];
//! let config = OptimizerConfig::default().with_slate_size(2);
//!
//! let controller = ReoptimizationController::new(&query, pool, config).unwrap();
//! let slate = controller.reoptimize(Weights::new(0.5, 0.0)).unwrap();
//!
//! assert_eq!(slate.ids(), vec!["A", "C"]);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos de entrada e saída do otimizador.
///
/// - [`CandidateItem`]: item candidato com vetor e metadados opacos
/// - [`QueryRepresentation`]: query simples ou mista
/// - [`Weights`]: γ (diversidade) e β (suavidade das restrições)
/// - [`Slate`] / [`SlateEntry`]: resultado ordenado com atribuições
pub mod types;

/// Erros do otimizador ([`SlateError`]).
pub mod error;

/// Núcleo do otimizador de slate.
///
/// Contém normalização, relevância, interferência, barreira,
/// o builder guloso e o controlador de re-otimização.
pub mod optimizer;

/// Otimizações de performance de baixo nível.
///
/// - Produto interno com SIMD (AVX2)
/// - Projeção ao quadrado limitada a `[0, 1]`
pub mod performance;

/// Utilitários (timing e orçamento de latência).
pub mod utils;

/// Configuração do otimizador.
///
/// Fornece configuração via variáveis de ambiente:
/// - `SLATE_SIZE`: K (padrão: 5)
/// - `SLATE_SIZE_POLICY`: "strict" ou "clamp" (padrão: strict)
/// - `SLATE_DIVERSITY`: γ padrão (padrão: 0.5)
/// - `SLATE_SOFTNESS`: β padrão (padrão: 0.0)
/// - `SLATE_PARALLEL_THRESHOLD`: candidatos mínimos para Rayon (padrão: 256)
/// - `SLATE_EPSILON`: norma mínima para normalização (padrão: 1e-6)
pub mod config;

// Re-exports principais
pub use config::{load_optimizer_config, OptimizerConfig, SizePolicy};
pub use error::{SlateError, SlateResult};
pub use optimizer::{
    ConstraintBarrier, InterferenceMatrix, NormalizedQuery, ReoptimizationController,
    RelevanceScorer, RequestTicket, SlateBuilder, SlateRequest, SoftConstraint, UnitVector,
    ViolationFn,
};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// ```rust,ignore
/// use born_slate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{OptimizerConfig, SizePolicy};
    pub use crate::error::{SlateError, SlateResult};
    pub use crate::optimizer::{
        ConstraintBarrier, ReoptimizationController, RequestTicket, SlateRequest,
    };
    pub use crate::types::*;
}
