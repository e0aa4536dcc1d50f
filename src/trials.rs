use crate::community::{modularity, CommunityDetection, Louvain};
use crate::error::CommunityError;
use crate::graph::Network;
use log::debug;
use std::fmt;
use std::time::Instant;

/// Parameters of a benchmark run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialConfig {
    pub trial_count: usize,
    pub resolution: f64,
    pub seed: u64,
}

impl Default for TrialConfig {
    fn default() -> Self {
        TrialConfig {
            trial_count: 3,
            resolution: 1.0,
            seed: 123,
        }
    }
}

impl TrialConfig {
    /// Louvain detector carrying this run's seed and resolution.
    pub fn louvain(&self) -> Louvain {
        Louvain::new()
            .with_resolution(self.resolution)
            .with_seed(self.seed)
    }
}

/// Outcome of one trial. `run` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialResult {
    pub run: usize,
    pub modularity: f64,
    pub communities: usize,
    pub elapsed_secs: f64,
}

/// Aggregate over all trials. Means are `None` when no trial ran.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub trials: Vec<TrialResult>,
    pub mean_modularity: Option<f64>,
    pub mean_elapsed_secs: Option<f64>,
}

impl RunSummary {
    pub fn from_trials(trials: Vec<TrialResult>) -> Self {
        let count = trials.len();
        let mean = |total: f64| (count > 0).then(|| total / count as f64);
        RunSummary {
            mean_modularity: mean(trials.iter().map(|t| t.modularity).sum()),
            mean_elapsed_secs: mean(trials.iter().map(|t| t.elapsed_secs).sum()),
            trials,
        }
    }
}

impl fmt::Display for TrialResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Modularity (Run {}): {:?}", self.run, self.modularity)?;
        write!(f, "Run {} time: {:.4} seconds", self.run, self.elapsed_secs)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mean_modularity {
            Some(q) => writeln!(f, "Mean modularity: {q:.4}")?,
            None => writeln!(f, "Mean modularity: n/a")?,
        }
        match self.mean_elapsed_secs {
            Some(secs) => write!(f, "Average running time: {secs:.4} seconds"),
            None => write!(f, "Average running time: n/a"),
        }
    }
}

/// Receives results as the harness produces them.
pub trait TrialObserver {
    fn on_trial(&mut self, _result: &TrialResult) {}

    fn on_summary(&mut self, _summary: &RunSummary) {}
}

/// Observer that ignores everything.
impl TrialObserver for () {}

/// Keeps every reported result.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub trials: Vec<TrialResult>,
    pub summaries: Vec<RunSummary>,
}

impl TrialObserver for RecordingObserver {
    fn on_trial(&mut self, result: &TrialResult) {
        self.trials.push(*result);
    }

    fn on_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }
}

/// Run `config.trial_count` detections over `graph`.
///
/// Partitions are scored at the detector's own resolution; build the
/// detector with [`TrialConfig::louvain`] to use `config.resolution`.
/// Each trial's time covers detection and modularity scoring. An empty
/// graph fails before any trial runs; a detection failure aborts the run.
pub fn run_trials<D, O>(
    graph: &Network,
    config: &TrialConfig,
    detector: &D,
    observer: &mut O,
) -> Result<RunSummary, CommunityError>
where
    D: CommunityDetection + ?Sized,
    O: TrialObserver + ?Sized,
{
    if graph.is_empty() {
        return Err(CommunityError::EmptyGraph);
    }

    let mut trials = Vec::with_capacity(config.trial_count);
    for i in 0..config.trial_count {
        let start = Instant::now();
        let partition = detector.detect(graph)?;
        let score = modularity(graph, &partition, detector.resolution())?;
        let elapsed = start.elapsed();

        let result = TrialResult {
            run: i + 1,
            modularity: score,
            communities: partition.len(),
            elapsed_secs: elapsed.as_secs_f64(),
        };
        debug!("trial {} found {} communities", result.run, result.communities);
        observer.on_trial(&result);
        trials.push(result);
    }

    let summary = RunSummary::from_trials(trials);
    observer.on_summary(&summary);
    Ok(summary)
}
