// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// NORMALIZAÇÃO DE VETORES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Todo vetor de query e de item passa por aqui antes de qualquer cálculo
// de relevância ou interferência. A normalização do upstream nunca é
// confiada.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::ops::Deref;

use crate::error::{SlateError, SlateResult};
use crate::performance::simd::{l2_norm, squared_projection};

/// Vetor real com norma euclidiana 1
///
/// Só pode ser construído via [`UnitVector::normalize`], então todo
/// `UnitVector` em circulação já foi validado.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitVector(Vec<f32>);

impl UnitVector {
    /// Normaliza um vetor arbitrário finito
    ///
    /// # Erros
    ///
    /// - [`SlateError::NonFiniteVector`] se alguma coordenada é NaN/∞
    /// - [`SlateError::DegenerateVector`] se a norma é menor que `epsilon`
    pub fn normalize(raw: &[f32], subject: &str, epsilon: f32) -> SlateResult<Self> {
        if raw.iter().any(|x| !x.is_finite()) {
            return Err(SlateError::NonFiniteVector(subject.to_string()));
        }

        let mut norm = l2_norm(raw);
        let mut scaled: Vec<f32> = raw.to_vec();

        // Coordenadas finitas mas enormes estouram a soma dos quadrados
        if !norm.is_finite() {
            let max_abs = raw.iter().fold(0.0f32, |acc, x| acc.max(x.abs()));
            for x in scaled.iter_mut() {
                *x /= max_abs;
            }
            norm = l2_norm(&scaled);
        }

        if norm < epsilon {
            return Err(SlateError::DegenerateVector {
                subject: subject.to_string(),
                norm,
                epsilon,
            });
        }

        for x in scaled.iter_mut() {
            *x /= norm;
        }

        Ok(Self(scaled))
    }

    /// Coordenadas
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Dimensão do espaço
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// `|⟨self, other⟩|²` ∈ [0, 1]
    pub fn squared_projection(&self, other: &UnitVector) -> f32 {
        squared_projection(&self.0, &other.0)
    }

    /// Consome e devolve as coordenadas
    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl Deref for UnitVector {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

impl AsRef<[f32]> for UnitVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EPSILON;

    #[test]
    fn test_normalize() {
        let v = UnitVector::normalize(&[3.0, 4.0, 0.0], "v", DEFAULT_EPSILON).unwrap();

        assert!((l2_norm(&v) - 1.0).abs() < 0.0001);
        assert!((v[0] - 0.6).abs() < 0.0001);
        assert!((v[1] - 0.8).abs() < 0.0001);
        assert_eq!(v.dimension(), 3);
    }

    #[test]
    fn test_normalize_already_unit() {
        let v = UnitVector::normalize(&[0.0, 1.0], "v", DEFAULT_EPSILON).unwrap();
        assert_eq!(v.as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn test_zero_vector_is_degenerate() {
        let err = UnitVector::normalize(&[0.0, 0.0, 0.0], "query", DEFAULT_EPSILON).unwrap_err();
        assert!(matches!(err, SlateError::DegenerateVector { ref subject, .. } if subject == "query"));
    }

    #[test]
    fn test_tiny_vector_is_degenerate() {
        let err = UnitVector::normalize(&[1e-8, 0.0], "tiny", DEFAULT_EPSILON).unwrap_err();
        assert!(matches!(err, SlateError::DegenerateVector { .. }));
    }

    #[test]
    fn test_empty_vector_is_degenerate() {
        assert!(matches!(
            UnitVector::normalize(&[], "empty", DEFAULT_EPSILON),
            Err(SlateError::DegenerateVector { .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(
            UnitVector::normalize(&[f32::NAN, 1.0], "nan", DEFAULT_EPSILON),
            Err(SlateError::NonFiniteVector("nan".to_string()))
        );
        assert!(UnitVector::normalize(&[f32::INFINITY], "inf", DEFAULT_EPSILON).is_err());
    }

    #[test]
    fn test_huge_coordinates_still_normalize() {
        let v = UnitVector::normalize(&[3e30, 4e30], "huge", DEFAULT_EPSILON).unwrap();
        assert!((v[0] - 0.6).abs() < 0.0001);
        assert!((v[1] - 0.8).abs() < 0.0001);
    }

    #[test]
    fn test_squared_projection_sign_invariant() {
        let a = UnitVector::normalize(&[1.0, 1.0], "a", DEFAULT_EPSILON).unwrap();
        let b = UnitVector::normalize(&[-1.0, -1.0], "b", DEFAULT_EPSILON).unwrap();
        assert!((a.squared_projection(&b) - 1.0).abs() < 0.0001);
    }
}
