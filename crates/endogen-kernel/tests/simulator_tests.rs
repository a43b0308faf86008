use endogen_kernel::test_harness::{run_simulator, InvariantCheck, SimulatorConfig, TestHarness};
use endogen_kernel::{Evaluation, ScoreKind, SelectKind, TemplateKind};

#[test]
fn test_simulator_passes_every_combination() {
    let report = run_simulator(SimulatorConfig {
        target_size: 10,
        ..Default::default()
    });

    assert!(report.passed(), "{}", report.generate_text());
    assert_eq!(report.stats.runs, TemplateKind::ALL.len() * 4);
    assert_eq!(report.runs.len(), report.stats.runs);
    assert!(report.runs.iter().all(|r| r.nodes == 10));
    assert_eq!(report.stats.checks[&format!("{:?}", InvariantCheck::NoCandidateLeakage)], report.stats.steps);
}

#[test]
fn test_simulator_global_evaluation() {
    let report = run_simulator(SimulatorConfig {
        seed: 5,
        target_size: 9,
        score: ScoreKind::Degree,
        evaluation: Evaluation::Global,
        selections: vec![SelectKind::Weighted { gamma: 3.0 }],
        ..Default::default()
    });
    assert!(report.passed(), "{}", report.generate_text());
}

#[test]
fn test_report_text_names_runs() {
    let report = run_simulator(SimulatorConfig {
        target_size: 6,
        templates: vec![TemplateKind::OneInOneOut],
        selections: vec![SelectKind::Random],
        score: ScoreKind::Uniform,
        ..Default::default()
    });
    let text = report.generate_text();
    assert!(text.contains("i1o1_uniform_random"));
    assert!(text.contains("=== Result: PASS ==="));
}

#[test]
fn test_certification_over_seeds() {
    let report = TestHarness::run_certification(3, 7);
    assert!(report.passed, "failing seeds: {:?}", report.failing_seeds);
    assert_eq!(report.seeds_tested, 3);
}

#[test]
fn test_stress_run() {
    let report = TestHarness::run_stress_test(12, 77);
    assert!(report.success);
    assert_eq!(report.violations, 0);
    assert!(report.steps > 0);
}
