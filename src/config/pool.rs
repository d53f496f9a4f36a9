use serde::{Deserialize, Serialize};

/// Thread pool sizing (SPEC_FULL.md §5: "half of hardware concurrency,
/// minimum 1").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Explicit worker count override; `None` derives from `available_parallelism`.
    pub worker_count: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { worker_count: None }
    }
}

impl PoolConfig {
    pub fn resolved_worker_count(&self) -> usize {
        self.worker_count.unwrap_or_else(|| {
            let hw = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(2);
            (hw / 2).max(1)
        })
    }
}
