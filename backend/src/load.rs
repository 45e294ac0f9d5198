use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use futures::future::join_all;
use tracing::{info, warn};
use crate::config::StressConfig;

pub const BASE_CPU_ITERATIONS: u64 = 1_000_000;
pub const BASE_BALLAST_BYTES: usize = 100 * 1024 * 1024;
pub const BALLAST_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadPlan {
    pub workers: usize,
    pub iterations_per_worker: u64,
    pub ballast_bytes: usize,
}

impl LoadPlan {
    pub fn new(stress: &StressConfig, workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            iterations_per_worker: BASE_CPU_ITERATIONS.saturating_mul(u64::from(stress.cpu_factor)),
            ballast_bytes: BASE_BALLAST_BYTES.saturating_mul(stress.mem_factor as usize),
        }
    }
}

pub trait Burner: Send + Sync + 'static {
    fn burn_cpu(&self, iterations: u64);
    fn hold_memory(&self, bytes: usize);
}

#[derive(Debug, Default)]
pub struct SystemBurner {
    ballast: Mutex<VecDeque<Vec<u8>>>,
}

impl SystemBurner {
    #[cfg(test)]
    pub(crate) fn retained_bytes(&self) -> usize {
        self.ballast
            .lock()
            .map(|blocks| blocks.iter().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

impl Burner for SystemBurner {
    fn burn_cpu(&self, iterations: u64) {
        let mut acc = 0u64;
        for x in 0..iterations {
            let x = std::hint::black_box(x);
            acc = acc.wrapping_add(x.wrapping_mul(x));
        }
        std::hint::black_box(acc);
    }

    fn hold_memory(&self, bytes: usize) {
        let mut ballast = match self.ballast.lock() {
            Ok(guard) => guard,
            Err(e) => {
                warn!("Ballast lock poisoned, skipping allocation: {}", e);
                return;
            }
        };

        while ballast.len() >= BALLAST_SLOTS {
            ballast.pop_front();
        }

        let mut block = Vec::new();
        if let Err(e) = block.try_reserve_exact(bytes) {
            warn!("Could not allocate {} bytes of ballast: {}", bytes, e);
            return;
        }
        block.resize(bytes, 1u8);
        ballast.push_back(block);
    }
}

pub struct LoadSimulator {
    plan: LoadPlan,
    burner: Arc<dyn Burner>,
}

impl LoadSimulator {
    pub fn new(stress: &StressConfig) -> Self {
        Self::with_burner(stress, available_workers(), Arc::new(SystemBurner::default()))
    }

    pub fn with_burner(stress: &StressConfig, workers: usize, burner: Arc<dyn Burner>) -> Self {
        Self {
            plan: LoadPlan::new(stress, workers),
            burner,
        }
    }

    pub fn plan(&self) -> LoadPlan {
        self.plan
    }

    pub async fn run(&self) {
        let LoadPlan { workers, iterations_per_worker, ballast_bytes } = self.plan;
        info!("Eating {} bytes of memory on this request", ballast_bytes);
        info!("Eating cpu on {} workers x {} iterations", workers, iterations_per_worker);

        let tasks = (0..workers).map(|_| {
            let burner = Arc::clone(&self.burner);
            tokio::task::spawn_blocking(move || burner.burn_cpu(iterations_per_worker))
        });

        for result in join_all(tasks).await {
            if let Err(e) = result {
                warn!("Load worker failed: {}", e);
            }
        }

        let burner = Arc::clone(&self.burner);
        if let Err(e) = tokio::task::spawn_blocking(move || burner.hold_memory(ballast_bytes)).await {
            warn!("Ballast allocation failed: {}", e);
        }
    }
}

fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
