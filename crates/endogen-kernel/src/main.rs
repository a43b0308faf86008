use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use endogen_kernel::score::DEFAULT_DAMPING;
use endogen_kernel::snapshot::write_jsonl;
use endogen_kernel::test_harness::{run_simulator, SimulatorConfig, TestHarness};
use endogen_kernel::{
    Evaluation, GrowthEngine, ModelConfig, ScoreKind, SeedTopology, SelectKind, TemplateKind,
};
use rand::{rngs::StdRng, SeedableRng};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Command::new("endogen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Grow directed networks over the adjacent possible")
        .arg_required_else_help(true)
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("grow")
                .about("Grow one network and export its snapshots")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML model configuration; flags below override it"),
                )
                .arg(
                    Arg::new("initial-size")
                        .long("initial-size")
                        .value_parser(value_parser!(usize))
                        .help("Seed network size"),
                )
                .arg(
                    Arg::new("topology")
                        .long("topology")
                        .help("Seed topology: cycle, sticks, out_star"),
                )
                .arg(
                    Arg::new("template")
                        .long("template")
                        .help("Insertion template: 1in1out, 1in2out, 2in1out, io3, 2in2out"),
                )
                .arg(
                    Arg::new("score")
                        .long("score")
                        .help("Scoring function: uniform, influence, degree"),
                )
                .arg(
                    Arg::new("damping")
                        .long("damping")
                        .value_parser(value_parser!(f64))
                        .help("Influence damping factor"),
                )
                .arg(
                    Arg::new("select")
                        .long("select")
                        .help("Selection policy: random, greedy, weighted, softmax"),
                )
                .arg(
                    Arg::new("gamma")
                        .long("gamma")
                        .value_parser(value_parser!(f64))
                        .help("Exponent for weighted and softmax selection"),
                )
                .arg(
                    Arg::new("evaluation")
                        .long("evaluation")
                        .help("Candidate scoring: local, global"),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .default_value("20")
                        .value_parser(value_parser!(usize))
                        .help("Final number of real nodes"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write snapshots as JSON Lines to this file"),
                ),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run the invariant simulator over every template and policy")
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .default_value("12")
                        .value_parser(value_parser!(usize))
                        .help("Nodes each run grows to"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first violation"),
                ),
        )
        .subcommand(
            Command::new("certify")
                .about("Run the simulator under many seeds")
                .arg(
                    Arg::new("seeds")
                        .long("seeds")
                        .default_value("10")
                        .value_parser(value_parser!(u64))
                        .help("Number of seeds, starting at 0"),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .default_value("12")
                        .value_parser(value_parser!(usize))
                        .help("Nodes each run grows to"),
                ),
        );

    let matches = cli.get_matches();
    init_tracing(matches.get_flag("json"));

    match matches.subcommand() {
        Some(("grow", args)) => grow(args),
        Some(("simulate", args)) => {
            let config = SimulatorConfig {
                seed: arg(args, "seed")?,
                target_size: arg(args, "target")?,
                stop_on_first_violation: args.get_flag("stop-on-violation"),
                ..Default::default()
            };
            let report = run_simulator(config);
            println!("{}", report.generate_text());
            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        Some(("certify", args)) => {
            let report = TestHarness::run_certification(arg(args, "seeds")?, arg(args, "target")?);
            println!("Certification Report:");
            println!("  Seeds tested: {}", report.seeds_tested);
            println!("  Violations: {}", report.total_violations);
            if !report.failing_seeds.is_empty() {
                println!("  Failing seeds: {:?}", report.failing_seeds);
            }
            println!("  Passed: {}", report.passed);
            std::process::exit(if report.passed { 0 } else { 1 });
        }
        _ => Ok(()),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn grow(args: &ArgMatches) -> Result<()> {
    let config = model_config(args)?;
    let target: usize = arg(args, "target")?;
    let seed: u64 = arg(args, "seed")?;

    let mut engine = GrowthEngine::new(config).context("failed to build growth engine")?;
    let mut rng = StdRng::seed_from_u64(seed);
    engine
        .grow(target, &mut rng)
        .with_context(|| format!("growth to {target} nodes failed"))?;

    if let Some(path) = args.get_one::<PathBuf>("out") {
        let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        write_jsonl(BufWriter::new(file), engine.snapshots())
            .with_context(|| format!("cannot write snapshots to {}", path.display()))?;
    }

    let network = engine.network();
    println!("Run: {}", engine.run_id());
    println!("Model: {}", engine.config().label());
    println!("Config digest: {}", engine.config().digest()?);
    println!("Seed: {seed}");
    println!("Nodes: {}", network.node_count());
    println!("Edges: {}", network.edge_count());
    println!("Pending positions: {}", engine.adjacent_possible().len());
    if let Some(snapshot) = engine.latest_snapshot() {
        println!("Fingerprint: {}", snapshot.fingerprint());
    }
    println!("Log head: {}", hex::encode(engine.log().head()));
    Ok(())
}

fn model_config(args: &ArgMatches) -> Result<ModelConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => ModelConfig::from_path(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => ModelConfig::default(),
    };

    if let Some(&size) = args.get_one::<usize>("initial-size") {
        config.initial_size = size;
    }
    if let Some(topology) = args.get_one::<String>("topology") {
        config.seed = topology.parse::<SeedTopology>()?;
    }
    if let Some(template) = args.get_one::<String>("template") {
        config.template = template.parse::<TemplateKind>()?;
    }
    if let Some(evaluation) = args.get_one::<String>("evaluation") {
        config.evaluation = match evaluation.as_str() {
            "local" => Evaluation::Local,
            "global" => Evaluation::Global,
            other => bail!("unknown evaluation '{other}'"),
        };
    }

    let damping = args.get_one::<f64>("damping").copied();
    match args.get_one::<String>("score").map(String::as_str) {
        Some("uniform") => config.score = ScoreKind::Uniform,
        Some("degree") => config.score = ScoreKind::Degree,
        Some("influence") => {
            config.score = ScoreKind::Influence {
                damping: damping.unwrap_or(DEFAULT_DAMPING),
            };
        }
        Some(other) => bail!("unknown score '{other}'"),
        None => {
            if let (Some(d), ScoreKind::Influence { damping }) = (damping, &mut config.score) {
                *damping = d;
            }
        }
    }

    let gamma = args.get_one::<f64>("gamma").copied();
    match args.get_one::<String>("select").map(String::as_str) {
        Some("random") => config.select = SelectKind::Random,
        Some("greedy") => config.select = SelectKind::Greedy,
        Some("weighted") => {
            config.select = SelectKind::Weighted {
                gamma: gamma.unwrap_or(1.0),
            };
        }
        Some("softmax") => {
            config.select = SelectKind::Softmax {
                gamma: gamma.unwrap_or(1.0),
            };
        }
        Some(other) => bail!("unknown selection '{other}'"),
        None => {
            if let (
                Some(g),
                SelectKind::Weighted { gamma } | SelectKind::Softmax { gamma },
            ) = (gamma, &mut config.select)
            {
                *gamma = g;
            }
        }
    }

    config.validate()?;
    Ok(config)
}

fn arg<T: Clone + Send + Sync + 'static>(args: &ArgMatches, id: &str) -> Result<T> {
    args.get_one::<T>(id)
        .cloned()
        .with_context(|| format!("missing --{id}"))
}
