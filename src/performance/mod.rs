//! Módulo de otimizações de performance.
//!
//! O otimizador de slate é invocado de forma síncrona a cada movimento
//! do slider de diversidade. Os kernels aqui são o que mantém a
//! construção da matriz de interferência e o re-scoring abaixo de 100ms.
//!
//! ## Técnicas Utilizadas
//!
//! - **SIMD (AVX2)**: Processa 8 floats por instrução
//! - **Paralelismo**: Rayon nos módulos de scoring, acima de um threshold
//! - **Cache-friendly**: Acesso sequencial à memória

/// Kernels vetoriais otimizados com SIMD.
///
/// - [`dot_product`]: Produto interno (AVX2 com fallback escalar)
/// - [`l2_norm`]: Magnitude de um vetor
/// - [`squared_projection`]: `|⟨a, b⟩|²` limitado a `[0, 1]`
pub mod simd;

pub use simd::{dot_product, l2_norm, squared_projection};
