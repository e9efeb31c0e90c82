use std::sync::mpsc;
use std::sync::Arc;
use tradeblend::config::{AcceptancePolicy, BlendConfig, OptimizerConfig, SimulationConfig};
use tradeblend::engines::evaluation::{FitnessEvaluator, PortfolioEvaluator, FITNESS_SENTINEL};
use tradeblend::engines::evolution::{
    AnnealingSchedule, ChannelProgressCallback, EvaluationContext, Population, ProgressCallback,
    ProgressMessage, ResultsLog, RunSummary, SilentProgress,
};
use tradeblend::types::{BlendedSignal, PriceSeries, SignalSet, WeightVector};
use tradeblend::Result;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Oscillating uptrend with three cyclic signal sources of different periods.
fn market(bars: usize) -> (PriceSeries, SignalSet) {
    let prices = (0..bars)
        .map(|i| 100.0 + 8.0 * (i as f64 / 6.0).sin() + 0.05 * i as f64)
        .collect::<Vec<_>>();

    let source = |period: usize, entry_at: usize, exit_at: usize| {
        let entries = (0..bars).map(|i| i % period == entry_at).collect::<Vec<_>>();
        let exits = (0..bars).map(|i| i % period == exit_at).collect::<Vec<_>>();
        (entries, exits)
    };

    let (e0, x0) = source(38, 28, 9);
    let (e1, x1) = source(15, 3, 9);
    let (e2, x2) = source(7, 0, 4);

    let signals = SignalSet::new(vec![e0, e1, e2], vec![x0, x1, x2]).unwrap();
    (PriceSeries::new(prices), signals)
}

fn portfolio_context() -> Arc<EvaluationContext<PortfolioEvaluator>> {
    let (prices, signals) = market(240);
    Arc::new(EvaluationContext::new(
        prices,
        signals,
        PortfolioEvaluator::default(),
        SimulationConfig::default(),
    ))
}

#[derive(Default)]
struct RecordingProgress {
    temperatures: Vec<(usize, f64)>,
    generations: Vec<(usize, f64)>,
}

impl ProgressCallback for RecordingProgress {
    fn on_step(&mut self, step: usize, temperature: f64) {
        self.temperatures.push((step, temperature));
    }

    fn on_generation_complete(&mut self, step: usize, best_fitness: f64, _best_weights: &WeightVector) {
        self.generations.push((step, best_fitness));
    }
}

#[test]
fn test_mutation_rate_halves_after_first_generation() {
    init_logging();
    let mut population =
        Population::new(portfolio_context(), WeightVector::uniform(3).unwrap(), 4, Some(11)).unwrap();
    let schedule = AnnealingSchedule {
        n_steps: 20,
        generation_size: 10,
        initial_temperature: 0.8,
        decay: 0.5,
    };

    let mut progress = RecordingProgress::default();
    let summary = population.run(&schedule, None, &mut progress).unwrap();

    assert_eq!(progress.temperatures.len(), 20);
    for (step, temperature) in &progress.temperatures[..10] {
        assert!(*step <= 10);
        assert_eq!(*temperature, 0.8);
    }
    for (step, temperature) in &progress.temperatures[10..] {
        assert!(*step > 10);
        assert_eq!(*temperature, 0.4);
    }
    assert_eq!(summary.final_temperature, 0.2);
    assert_eq!(progress.generations.iter().map(|g| g.0).collect::<Vec<_>>(), vec![10, 20]);
}

#[test]
fn test_best_fitness_never_drops_across_generations() {
    init_logging();
    let mut population =
        Population::new(portfolio_context(), WeightVector::uniform(3).unwrap(), 6, Some(12)).unwrap();
    let schedule = AnnealingSchedule {
        n_steps: 40,
        generation_size: 5,
        initial_temperature: 0.5,
        decay: 0.9,
    };

    let mut progress = RecordingProgress::default();
    population.run(&schedule, None, &mut progress).unwrap();

    // Every candidate only accepts non-worse trials, so the collapsed best is monotone.
    for pair in progress.generations.windows(2) {
        assert!(pair[1].1 >= pair[0].1);
    }
}

#[test]
fn test_results_file_has_one_line_per_generation() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");

    let mut population =
        Population::new(portfolio_context(), WeightVector::uniform(3).unwrap(), 3, Some(13)).unwrap();
    let schedule = AnnealingSchedule {
        n_steps: 20,
        generation_size: 10,
        initial_temperature: 0.3,
        decay: 1.0,
    };

    let mut log = ResultsLog::new(&path);
    let summary = population.run(&schedule, Some(&mut log), &mut SilentProgress).unwrap();
    assert!(summary.log_failures.is_empty());

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    for (line, expected_step) in lines.iter().zip(["10", "20"]) {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 2 + 3);
        assert_eq!(fields[0], expected_step);
        fields[1].parse::<f64>().unwrap();

        let weights: Vec<f64> = fields[2..].iter().map(|w| w.parse().unwrap()).collect();
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    let last: Vec<f64> = lines[1].split(',').skip(2).map(|w| w.parse().unwrap()).collect();
    assert_eq!(last.as_slice(), summary.best_weights.as_slice());
}

#[test]
fn test_unwritable_log_does_not_stop_the_run() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let mut log = ResultsLog::new(dir.path().join("missing").join("results.csv"));

    let mut population =
        Population::new(portfolio_context(), WeightVector::uniform(3).unwrap(), 2, Some(14)).unwrap();
    let schedule = AnnealingSchedule {
        n_steps: 20,
        generation_size: 10,
        initial_temperature: 0.3,
        decay: 0.9,
    };

    let summary = population.run(&schedule, Some(&mut log), &mut SilentProgress).unwrap();
    assert_eq!(summary.generations, 2);
    assert_eq!(summary.log_failures.len(), 2);
    assert_eq!(summary.log_failures[0].step, 10);
    assert_eq!(summary.log_failures[1].step, 20);
}

#[test]
fn test_parallel_and_serial_runs_agree() {
    init_logging();
    let schedule = AnnealingSchedule {
        n_steps: 30,
        generation_size: 10,
        initial_temperature: 0.6,
        decay: 0.7,
    };

    let run = |parallel: bool| -> RunSummary {
        let mut population =
            Population::new(portfolio_context(), WeightVector::uniform(3).unwrap(), 8, Some(15))
                .unwrap()
                .with_parallel(parallel);
        population.run(&schedule, None, &mut SilentProgress).unwrap()
    };

    let serial = run(false);
    let parallel = run(true);
    assert_eq!(serial.best_weights, parallel.best_weights);
    assert_eq!(serial.best_fitness, parallel.best_fitness);
}

#[test]
fn test_same_seed_reproduces_run() {
    let run = || {
        let mut population =
            Population::new(portfolio_context(), WeightVector::uniform(3).unwrap(), 4, Some(16)).unwrap();
        population
            .run(&AnnealingSchedule::default(), None, &mut SilentProgress)
            .unwrap()
    };
    let first = run();
    let second = run();
    assert_eq!(first.best_weights, second.best_weights);
    assert_eq!(first.best_fitness, second.best_fitness);
}

/// Every blend scores NaN.
struct NanEvaluator;

impl FitnessEvaluator for NanEvaluator {
    type Config = ();
    type Handle = ();

    fn evaluate(&self, _prices: &PriceSeries, _signal: &BlendedSignal, _config: &()) -> Result<()> {
        Ok(())
    }

    fn score(&self, _handle: &()) -> f64 {
        f64::NAN
    }
}

#[test]
fn test_all_non_finite_population_keeps_first_candidate() {
    let (prices, signals) = market(60);
    let context = Arc::new(EvaluationContext::new(prices, signals, NanEvaluator, ()));
    let mut population = Population::new(context, WeightVector::uniform(3).unwrap(), 5, Some(17)).unwrap();

    population.evolve_generation(0.5).unwrap();
    for candidate in population.candidates() {
        assert_eq!(candidate.fitness(), FITNESS_SENTINEL);
    }
    assert!(std::ptr::eq(population.select_best(), &population.candidates()[0]));

    let summary = population
        .run(&AnnealingSchedule::default(), None, &mut SilentProgress)
        .unwrap();
    assert_eq!(summary.best_fitness, FITNESS_SENTINEL);
    assert!((summary.best_weights.sum() - 1.0).abs() < 1e-9);

    // serde_json stores -inf as null; it must read back as the sentinel.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");
    summary.save_json(&path).unwrap();
    let restored: RunSummary = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(restored.best_fitness, FITNESS_SENTINEL);
}

#[test]
fn test_config_driven_run() {
    init_logging();
    let config = BlendConfig::from_toml_str(
        r#"
        [optimizer]
        population_size = 4
        n_steps = 12
        generation_size = 4
        initial_temperature = 0.4
        decay = 0.5
        acceptance = "Strict"
        parallel = true
        seed = 21

        [simulation]
        initial_capital = 50000.0
        commission = 0.001
        fitness_metric = "TotalReturnPct"
        "#,
    )
    .unwrap();
    assert_eq!(config.optimizer.acceptance, AcceptancePolicy::Strict);

    let (prices, signals) = market(240);
    let context = Arc::new(
        EvaluationContext::new(
            prices,
            signals,
            PortfolioEvaluator::from_config(&config.simulation),
            config.simulation.clone(),
        )
        .with_optimizer_config(&config.optimizer),
    );

    let mut population =
        Population::from_config(context, WeightVector::uniform(3).unwrap(), &config.optimizer).unwrap();
    assert_eq!(population.len(), 4);

    let summary = population
        .run(&config.optimizer.schedule(), None, &mut SilentProgress)
        .unwrap();
    assert_eq!(summary.generations, 3);
    assert!((summary.final_temperature - 0.05).abs() < 1e-12);

    let best = population.select_best();
    assert_eq!(
        best.fitness(),
        best.handle().metric("total_return_pct")
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");
    summary.save_json(&path).unwrap();
    let restored: RunSummary = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(restored.best_weights, summary.best_weights);
    assert_eq!(restored.generations, 3);
}

#[test]
fn test_invalid_optimizer_config_is_rejected() {
    let config = OptimizerConfig {
        generation_size: 0,
        ..OptimizerConfig::default()
    };
    let result = Population::from_config(
        portfolio_context(),
        WeightVector::uniform(3).unwrap(),
        &config,
    );
    assert!(result.is_err());
}

#[test]
fn test_channel_progress_reports_from_worker_thread() {
    let (sender, receiver) = mpsc::channel();

    let handle = std::thread::spawn(move || {
        let mut population =
            Population::new(portfolio_context(), WeightVector::uniform(3).unwrap(), 3, Some(22)).unwrap();
        let schedule = AnnealingSchedule {
            n_steps: 10,
            generation_size: 5,
            initial_temperature: 0.2,
            decay: 0.5,
        };
        population
            .run(&schedule, None, &mut ChannelProgressCallback::new(sender))
            .unwrap()
    });

    let summary = handle.join().unwrap();
    let messages: Vec<ProgressMessage> = receiver.iter().collect();

    let steps = messages
        .iter()
        .filter(|m| matches!(m, ProgressMessage::Step { .. }))
        .count();
    assert_eq!(steps, 10);

    match messages.last() {
        Some(ProgressMessage::GenerationComplete { step, best_weights, .. }) => {
            assert_eq!(*step, 10);
            assert_eq!(best_weights, &summary.best_weights);
        }
        other => panic!("Unexpected last message: {:?}", other),
    }
}
