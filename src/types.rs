// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Contratos de entrada (vindos do parser de intenção e do retriever) e de
// saída (consumidos pelo explicador / UI). Os nomes de campos em JSON
// seguem o contrato externo: id, vector, metadata, components, weight,
// relevance, interference_added, cumulative_objective.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};

use crate::error::{SlateError, SlateResult};

/// Item candidato vindo do retriever, já filtrado pelas restrições duras
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    /// Identificador único dentro do pool
    pub id: String,
    /// Embedding bruto (normalizado pelo otimizador, nunca confiado)
    pub vector: Vec<f32>,
    /// Metadados opacos, não interpretados pelo otimizador
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl CandidateItem {
    /// Cria um candidato sem metadados
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata: serde_json::Value::Null,
        }
    }

    /// Anexa metadados opacos
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Um componente de uma query mista
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryComponent {
    /// Vetor do componente
    pub vector: Vec<f32>,
    /// Peso (não negativo)
    pub weight: f32,
}

/// Representação da query produzida pelo parser de intenção
///
/// Variante explícita em vez de campos opcionais: o scorer despacha no
/// caso, não infere a forma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryRepresentation {
    /// Uma única intenção
    Single {
        /// Vetor da query
        vector: Vec<f32>,
    },
    /// Várias intenções simultâneas com pesos ("estado misto")
    Mixed {
        /// Componentes ponderados
        components: Vec<QueryComponent>,
    },
}

impl QueryRepresentation {
    /// Cria uma query de intenção única
    pub fn single(vector: Vec<f32>) -> Self {
        Self::Single { vector }
    }

    /// Cria uma query mista a partir de pares (vetor, peso)
    pub fn mixed(components: Vec<(Vec<f32>, f32)>) -> Self {
        Self::Mixed {
            components: components
                .into_iter()
                .map(|(vector, weight)| QueryComponent { vector, weight })
                .collect(),
        }
    }

    /// Número de componentes (1 para `Single`)
    pub fn component_count(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::Mixed { components } => components.len(),
        }
    }
}

/// Pesos ajustáveis pelo usuário
///
/// São sempre argumentos de chamada, nunca estado compartilhado.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// γ: força da diversidade
    pub gamma: f32,
    /// β: suavidade das restrições (só tem efeito com barreiras)
    #[serde(default)]
    pub beta: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            gamma: 0.5,
            beta: 0.0,
        }
    }
}

impl Weights {
    /// Cria pesos explícitos
    pub fn new(gamma: f32, beta: f32) -> Self {
        Self { gamma, beta }
    }

    /// Apenas relevância (γ = 0, β = 0)
    pub fn relevance_only() -> Self {
        Self {
            gamma: 0.0,
            beta: 0.0,
        }
    }

    /// Valida γ ≥ 0 e β ≥ 0 (ambos finitos)
    pub fn validate(&self) -> SlateResult<()> {
        if !self.gamma.is_finite() || self.gamma < 0.0 {
            return Err(SlateError::invalid_weight(format!(
                "gamma must be a finite value >= 0, got {}",
                self.gamma
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(SlateError::invalid_weight(format!(
                "beta must be a finite value >= 0, got {}",
                self.beta
            )));
        }
        Ok(())
    }
}

/// Uma posição do slate com suas atribuições
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlateEntry {
    /// Identificador do candidato
    pub id: String,
    /// Posição do candidato no pool de entrada
    pub pool_index: usize,
    /// r(x) ∈ [0, 1]
    pub relevance: f32,
    /// Σ overlap(x, s) contra os itens já no slate na inserção
    ///
    /// Soma sem clamp: cada overlap está em [0, 1], mas a soma pode passar
    /// de 1 a partir da terceira posição. Somado sobre o slate dá I(S).
    pub interference_added: f32,
    /// B(x) do item (0 sem barreiras)
    pub barrier_penalty: f32,
    /// ΔJ no momento da inserção
    pub marginal_gain: f32,
    /// J(S) logo após a inserção
    pub cumulative_objective: f32,
}

/// Slate ordenado pela ordem de seleção (não por score)
///
/// Produzido do zero a cada invocação; nunca mutado depois.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slate {
    /// Entradas na ordem de inserção
    pub entries: Vec<SlateEntry>,
    /// Pesos usados nesta otimização
    pub weights: Weights,
    /// K pedido originalmente
    pub requested_size: usize,
    /// Se K foi reduzido para N pela política de clamp
    pub clamped: bool,
}

impl Slate {
    /// Identificadores na ordem de seleção
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    /// Número de itens no slate
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Slate vazio?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// J(S) do slate completo
    pub fn final_objective(&self) -> f32 {
        self.entries
            .last()
            .map(|e| e.cumulative_objective)
            .unwrap_or(0.0)
    }

    /// Σ r(x)
    pub fn total_relevance(&self) -> f32 {
        self.entries.iter().map(|e| e.relevance).sum()
    }

    /// I(S): soma de todas as sobreposições entre pares do slate
    pub fn total_interference(&self) -> f32 {
        self.entries.iter().map(|e| e.interference_added).sum()
    }

    /// Pesos usados
    pub fn weights(&self) -> Weights {
        self.weights
    }

    /// Se o tamanho foi reduzido pela política de clamp
    pub fn clamped(&self) -> bool {
        self.clamped
    }
}
