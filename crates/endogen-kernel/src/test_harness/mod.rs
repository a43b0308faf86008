// Test harness module
// Seeded growth simulator and multi-seed certification

pub mod simulator;

pub use simulator::*;

/// Entry points for the simulator.
pub struct TestHarness;

impl TestHarness {
    /// Grow every combination to `target_size` nodes under a single seed.
    pub fn run_stress_test(target_size: usize, seed: u64) -> StressTestReport {
        tracing::info!(target_size, seed, "running stress test");

        let config = SimulatorConfig {
            seed,
            target_size,
            check_reproducibility: false,
            ..Default::default()
        };
        let report = run_simulator(config);

        StressTestReport {
            target_size,
            steps: report.stats.steps,
            violations: report.violations.len(),
            success: report.passed(),
        }
    }

    /// Run the full simulator under seeds `0..seeds`.
    pub fn run_certification(seeds: u64, target_size: usize) -> CertificationReport {
        tracing::info!(seeds, target_size, "running certification");

        let mut all_passed = true;
        let mut total_violations = 0;
        let mut failing_seeds = Vec::new();

        for seed in 0..seeds {
            let config = SimulatorConfig {
                seed,
                target_size,
                ..Default::default()
            };
            let report = run_simulator(config);
            if !report.passed() {
                all_passed = false;
                failing_seeds.push(seed);
            }
            total_violations += report.violations.len();
        }

        CertificationReport {
            passed: all_passed && total_violations == 0,
            total_violations,
            seeds_tested: seeds,
            failing_seeds,
        }
    }
}

/// Report from a stress test
#[derive(Debug, Clone)]
pub struct StressTestReport {
    pub target_size: usize,
    pub steps: u64,
    pub violations: usize,
    pub success: bool,
}

/// Report from certification
#[derive(Debug, Clone)]
pub struct CertificationReport {
    pub passed: bool,
    pub total_violations: usize,
    pub seeds_tested: u64,
    pub failing_seeds: Vec<u64>,
}
