// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// OTIMIZADOR DE SLATE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Fluxo:
//   vetores normalizados + query → RelevanceScorer → r(x) por candidato
//   pool → InterferenceMatrix (uma vez por pool)
//   r + interferência + B(x) + (γ, β) → SlateBuilder → slate ordenado
//   ReoptimizationController re-executa o SlateBuilder quando γ/β mudam
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod barrier;
mod controller;
mod interference;
mod normalizer;
mod relevance;
mod slate;

pub use barrier::*;
pub use controller::*;
pub use interference::*;
pub use normalizer::*;
pub use relevance::*;
pub use slate::*;
