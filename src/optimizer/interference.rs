// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MATRIZ DE INTERFERÊNCIA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// overlap(i, j) = |⟨ψi, ψj⟩|² para todo par não ordenado de candidatos.
//
// Construída uma vez por pool (N·(N-1)/2 produtos internos) e reutilizada
// em todas as re-otimizações: é isso que torna o slider barato.
//
// Armazenamento triangular superior empacotado, linha a linha:
//
//   (0,1) (0,2) ... (0,N-1) | (1,2) ... (1,N-1) | ... | (N-2,N-1)
//
// A simetria vem da construção: só existe uma célula por par.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use rayon::prelude::*;

use super::normalizer::UnitVector;
use crate::error::{SlateError, SlateResult};

/// Sobreposições par a par de um pool de candidatos
#[derive(Debug, Clone, PartialEq)]
pub struct InterferenceMatrix {
    n: usize,
    packed: Vec<f32>,
}

impl InterferenceMatrix {
    /// Constrói a matriz para o pool
    ///
    /// Linhas são independentes; com `parallel` cada linha vai para uma
    /// task do Rayon. O resultado é idêntico ao sequencial.
    pub fn build(items: &[UnitVector], parallel: bool) -> Self {
        let n = items.len();
        let row = |i: usize| -> Vec<f32> {
            items[i + 1..]
                .iter()
                .map(|other| items[i].squared_projection(other))
                .collect()
        };

        let rows: Vec<Vec<f32>> = if parallel {
            (0..n.saturating_sub(1)).into_par_iter().map(row).collect()
        } else {
            (0..n.saturating_sub(1)).map(row).collect()
        };

        let packed = rows.concat();
        debug_assert_eq!(packed.len(), n * n.saturating_sub(1) / 2);

        log::debug!(
            "🧮 Interference matrix: {} candidates, {} pairs (parallel={})",
            n,
            packed.len(),
            parallel
        );

        Self { n, packed }
    }

    /// Número de candidatos
    pub fn len(&self) -> usize {
        self.n
    }

    /// Matriz vazia?
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Número de pares armazenados
    pub fn pair_count(&self) -> usize {
        self.packed.len()
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        // Início da linha `lo` + posição de `hi` dentro da linha
        lo * (2 * self.n - lo - 1) / 2 + (hi - lo - 1)
    }

    /// overlap(i, j); `None` na diagonal ou fora do pool
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i == j || i >= self.n || j >= self.n {
            return None;
        }
        Some(self.packed[self.offset(i, j)])
    }

    /// overlap(i, j) sem checagem de diagonal (uso interno do greedy)
    #[inline]
    pub(crate) fn overlap(&self, i: usize, j: usize) -> f32 {
        debug_assert!(i != j && i < self.n && j < self.n);
        self.packed[self.offset(i, j)]
    }

    /// Σ_j overlap(i, j) sobre todos os outros candidatos; `None` fora do pool
    pub fn row_sum(&self, i: usize) -> Option<f32> {
        if i >= self.n {
            return None;
        }
        Some(
            (0..self.n)
                .filter(|&j| j != i)
                .map(|j| self.overlap(i, j))
                .sum(),
        )
    }

    /// I(S) = Σ_{i<j ∈ S} overlap(i, j)
    ///
    /// Índices repetidos em `subset` são contados uma vez por ocorrência
    /// de par distinto; a diagonal é ignorada.
    ///
    /// # Erros
    ///
    /// `IndexOutOfRange` se algum índice não pertence ao pool.
    pub fn subset_interference(&self, subset: &[usize]) -> SlateResult<f32> {
        self.check_indices(subset)?;

        let mut total = 0.0f32;
        for (a, &i) in subset.iter().enumerate() {
            for &j in &subset[a + 1..] {
                if i != j {
                    total += self.overlap(i, j);
                }
            }
        }
        Ok(total)
    }

    /// Confere que todo índice está em `0..N`
    fn check_indices(&self, subset: &[usize]) -> SlateResult<()> {
        match subset.iter().find(|&&i| i >= self.n) {
            Some(&index) => Err(SlateError::IndexOutOfRange { index, len: self.n }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EPSILON;

    fn unit(v: &[f32]) -> UnitVector {
        UnitVector::normalize(v, "test", DEFAULT_EPSILON).unwrap()
    }

    fn sample_pool() -> Vec<UnitVector> {
        vec![
            unit(&[1.0, 0.0]),
            unit(&[0.0, 1.0]),
            unit(&[0.7071, 0.7071]),
            unit(&[0.6, 0.8]),
        ]
    }

    #[test]
    fn test_known_overlaps() {
        let m = InterferenceMatrix::build(&sample_pool(), false);

        assert_eq!(m.len(), 4);
        assert_eq!(m.pair_count(), 6);
        assert!(m.get(0, 1).unwrap().abs() < 1e-6);
        assert!((m.get(0, 2).unwrap() - 0.5).abs() < 1e-4);
        assert!((m.get(0, 3).unwrap() - 0.36).abs() < 1e-4);
        assert!((m.get(1, 3).unwrap() - 0.64).abs() < 1e-4);
    }

    #[test]
    fn test_symmetry_and_diagonal() {
        let m = InterferenceMatrix::build(&sample_pool(), false);

        for i in 0..4 {
            assert_eq!(m.get(i, i), None);
            for j in 0..4 {
                if i != j {
                    assert_eq!(m.get(i, j), m.get(j, i));
                    let v = m.get(i, j).unwrap();
                    assert!((0.0..=1.0).contains(&v));
                }
            }
        }
        assert_eq!(m.get(0, 4), None);
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let items: Vec<UnitVector> = (0..40)
            .map(|i| {
                let t = i as f32 * 0.7;
                unit(&[t.sin(), t.cos(), (t * 0.5).sin() + 0.1])
            })
            .collect();

        let seq = InterferenceMatrix::build(&items, false);
        let par = InterferenceMatrix::build(&items, true);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_single_candidate_has_no_pairs() {
        let m = InterferenceMatrix::build(&[unit(&[1.0, 2.0])], false);
        assert_eq!(m.len(), 1);
        assert_eq!(m.pair_count(), 0);
        assert_eq!(m.get(0, 0), None);
        assert_eq!(m.row_sum(0), Some(0.0));
        assert_eq!(m.row_sum(1), None);
    }

    #[test]
    fn test_row_sum_and_subset_interference() {
        let m = InterferenceMatrix::build(&sample_pool(), false);

        let expected_row0 = m.get(0, 1).unwrap() + m.get(0, 2).unwrap() + m.get(0, 3).unwrap();
        assert!((m.row_sum(0).unwrap() - expected_row0).abs() < 1e-6);

        let subset = [0, 2, 3];
        let expected =
            m.get(0, 2).unwrap() + m.get(0, 3).unwrap() + m.get(2, 3).unwrap();
        assert!((m.subset_interference(&subset).unwrap() - expected).abs() < 1e-6);
        assert_eq!(m.subset_interference(&[1]), Ok(0.0));
        assert_eq!(m.subset_interference(&[]), Ok(0.0));
    }

    #[test]
    fn test_out_of_range_indices_are_errors() {
        let m = InterferenceMatrix::build(&sample_pool(), false);

        assert_eq!(
            m.subset_interference(&[0, 4]),
            Err(SlateError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(m.row_sum(7), None);

        let single = InterferenceMatrix::build(&[unit(&[1.0, 0.0])], false);
        assert_eq!(
            single.subset_interference(&[3]),
            Err(SlateError::IndexOutOfRange { index: 3, len: 1 })
        );
    }
}
