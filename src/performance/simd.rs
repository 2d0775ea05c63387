// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SIMD - KERNELS DE PRODUTO INTERNO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Todo o otimizador de slate se reduz a produtos internos entre vetores
// unitários: relevância (query × item) e interferência (item × item).
//
// Para um pool de N candidatos a matriz de interferência custa N·(N-1)/2
// produtos internos. Com embeddings de 768 dimensões:
// - Loop escalar: 768 multiplicações por par
// - AVX2 + FMA: 96 iterações (768/8)
//
// O caminho (AVX2 ou escalar) é escolhido em runtime e é sempre o mesmo
// na mesma máquina, então chamadas repetidas produzem bits idênticos.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Produto interno - implementação escalar (fallback)
///
/// # Fórmula
/// ```text
/// ⟨a, b⟩ = Σ aᵢ · bᵢ
/// ```
pub fn dot_product_scalar(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Produto interno com AVX2 (256-bit SIMD)
///
/// Processa 8 floats por instrução usando FMA.
///
/// # Safety
///
/// O caller deve garantir que a CPU suporta AVX2 e FMA.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn dot_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have the same length");
    let len = a.len().min(b.len());

    let mut acc = _mm256_setzero_ps();
    let chunks = len / 8;

    for i in 0..chunks {
        let offset = i * 8;
        // Load não alinhado: slices vêm de Vec<f32> sem garantia de alinhamento
        let va = _mm256_loadu_ps(a.as_ptr().add(offset));
        let vb = _mm256_loadu_ps(b.as_ptr().add(offset));
        acc = _mm256_fmadd_ps(va, vb, acc);
    }

    let mut result = hsum_avx2(acc);

    // Resto (len % 8)
    for i in (chunks * 8)..len {
        result += a[i] * b[i];
    }

    result
}

/// Soma horizontal de 8 floats em um registro AVX2
#[cfg(target_arch = "x86_64")]
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn hsum_avx2(v: __m256) -> f32 {
    let sum1 = _mm256_hadd_ps(v, v);
    let sum2 = _mm256_hadd_ps(sum1, sum1);
    let low = _mm256_castps256_ps128(sum2);
    let high = _mm256_extractf128_ps(sum2, 1);
    let final_sum = _mm_add_ss(low, high);
    _mm_cvtss_f32(final_sum)
}

/// Produto interno otimizado
///
/// Usa AVX2 quando disponível, com fallback escalar.
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            return unsafe { dot_product_avx2(a, b) };
        }
    }

    dot_product_scalar(a, b)
}

/// Norma L2 (magnitude do vetor)
pub fn l2_norm(v: &[f32]) -> f32 {
    dot_product(v, v).sqrt()
}

/// Projeção ao quadrado entre dois vetores unitários: `|⟨a, b⟩|²`
///
/// Para vetores reais unitários isso é o cosseno ao quadrado, limitado a
/// `[0, 1]`. O clamp absorve o erro de arredondamento que pode empurrar o
/// valor para `1.0000001`.
pub fn squared_projection(a: &[f32], b: &[f32]) -> f32 {
    let dot = dot_product(a, b);
    (dot * dot).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let b = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];

        let result = dot_product(&a, &b);
        assert!((result - 36.0).abs() < 0.0001);
    }

    #[test]
    fn test_dot_product_remainder() {
        // 11 elementos: 1 chunk AVX2 + 3 de resto
        let a: Vec<f32> = (1..=11).map(|i| i as f32).collect();
        let b = vec![1.0f32; 11];

        assert!((dot_product(&a, &b) - 66.0).abs() < 0.0001);
    }

    #[test]
    fn test_dot_product_matches_scalar_on_large_vectors() {
        // Simula embeddings de 768 dimensões
        let a: Vec<f32> = (0..768).map(|i| (i as f32).sin()).collect();
        let b: Vec<f32> = (0..768).map(|i| (i as f32).cos()).collect();

        let scalar = dot_product_scalar(&a, &b);
        let auto = dot_product(&a, &b);

        assert!((scalar - auto).abs() < 0.001);
    }

    #[test]
    fn test_dot_product_is_reproducible() {
        let a: Vec<f32> = (0..300).map(|i| (i as f32 * 0.37).sin()).collect();
        let b: Vec<f32> = (0..300).map(|i| (i as f32 * 0.11).cos()).collect();

        assert_eq!(dot_product(&a, &b).to_bits(), dot_product(&a, &b).to_bits());
    }

    #[test]
    fn test_l2_norm() {
        let v = vec![3.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let norm = l2_norm(&v);
        assert!((norm - 5.0).abs() < 0.0001);
    }

    #[test]
    fn test_squared_projection_bounds() {
        let x = [1.0, 0.0];
        let y = [0.0, 1.0];
        let neg_x = [-1.0, 0.0];

        assert!((squared_projection(&x, &x) - 1.0).abs() < 0.0001);
        assert!(squared_projection(&x, &y).abs() < 0.0001);
        // Sinal não importa na forma ao quadrado
        assert!((squared_projection(&x, &neg_x) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_squared_projection_clamps_rounding() {
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let v = [s, s];
        let p = squared_projection(&v, &v);
        assert!(p <= 1.0);
        assert!((p - 1.0).abs() < 0.0001);
    }
}
