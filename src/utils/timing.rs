// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIMING UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Mede a latência da construção de sessão e das re-otimizações.
// A re-otimização roda a cada movimento do slider, então o alvo é < 100ms.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::{Duration, Instant};

/// Alvo de latência de uma re-otimização (N≈30, K≈5, um core)
pub const REOPTIMIZE_LATENCY_BUDGET: Duration = Duration::from_millis(100);

/// Timer para medir duração de operações
pub struct ActionTimer {
    start: Instant,
    action_name: String,
}

impl ActionTimer {
    /// Inicia um novo timer para uma ação
    pub fn start(action_name: &str) -> Self {
        Self {
            start: Instant::now(),
            action_name: action_name.to_string(),
        }
    }

    /// Retorna o tempo decorrido como Duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Para o timer e loga o tempo decorrido em nível debug
    pub fn stop_and_log(self) -> Duration {
        let elapsed = self.elapsed();
        log::debug!("⏱️  {} completado em {}µs", self.action_name, elapsed.as_micros());
        elapsed
    }

    /// Para o timer e loga; acima do orçamento vira warning
    pub fn stop_with_budget(self, budget: Duration) -> Duration {
        let elapsed = self.elapsed();
        if elapsed > budget {
            log::warn!(
                "🐢 {} levou {}ms (orçamento {}ms)",
                self.action_name,
                elapsed.as_millis(),
                budget.as_millis()
            );
        } else {
            log::debug!("⏱️  {} completado em {}µs", self.action_name, elapsed.as_micros());
        }
        elapsed
    }

    /// Para o timer e retorna o tempo sem logar
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

/// Macro para medir tempo de execução de um bloco
#[macro_export]
macro_rules! timed {
    ($name:expr, $block:expr) => {{
        let timer = $crate::utils::ActionTimer::start($name);
        let result = $block;
        timer.stop_and_log();
        result
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_action_timer() {
        let timer = ActionTimer::start("test");
        sleep(Duration::from_millis(10));
        let elapsed = timer.stop();
        assert!(elapsed >= Duration::from_millis(10));
    }

    #[test]
    fn test_stop_with_budget_returns_elapsed() {
        let timer = ActionTimer::start("budgeted");
        sleep(Duration::from_millis(2));
        let elapsed = timer.stop_with_budget(Duration::from_millis(1));
        assert!(elapsed >= Duration::from_millis(2));
    }

    #[test]
    fn test_timed_macro() {
        let value = crate::timed!("sum", (1..=4).sum::<i32>());
        assert_eq!(value, 10);
    }
}
