use crate::dataset::{Dataset, DatasetConfig, LoadReport};
use crate::error::SessionError;
use crate::trials::{run_trials, RunSummary, TrialConfig, TrialObserver, TrialResult};
use log::{debug, warn};
use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "Enter the number of your choice: ";
pub const INVALID_CHOICE: &str = "Invalid choice. Please enter 1, 2, 3, or 4.";
pub const EMPTY_GRAPH: &str = "Graph is empty; skipping community detection.";

/// How a session ended. Every variant is a normal exit.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    InvalidChoice,
    LoadFailed(LoadReport),
    EmptyGraph,
    Completed(RunSummary),
}

pub fn write_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Choose a dataset to load:")?;
    for (i, dataset) in Dataset::ALL.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, dataset.menu_label())?;
    }
    Ok(())
}

/// Prints trial results as they arrive.
pub struct ConsoleObserver<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        ConsoleObserver { out, error: None }
    }

    fn emit(&mut self, text: std::fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_fmt(text) {
            warn!("failed to write report: {e}");
            self.error = Some(e);
        }
    }

    /// Flush and surface the first write failure, if any.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> TrialObserver for ConsoleObserver<W> {
    fn on_trial(&mut self, result: &TrialResult) {
        self.emit(format_args!("{result}\n"));
    }

    fn on_summary(&mut self, summary: &RunSummary) {
        self.emit(format_args!("\n{summary}\n"));
    }
}

/// Run one menu session: show the menu, read a choice (unless `choice` is
/// given), load the dataset and benchmark it.
pub fn run_session<R, W>(
    input: &mut R,
    out: &mut W,
    choice: Option<&str>,
    datasets: &DatasetConfig,
    trials: &TrialConfig,
) -> Result<SessionOutcome, SessionError>
where
    R: BufRead,
    W: Write,
{
    write_menu(out)?;
    let answer = match choice {
        Some(choice) => choice.to_string(),
        None => {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
            line
        }
    };
    writeln!(out)?;

    let Some(dataset) = Dataset::from_choice(&answer) else {
        writeln!(out, "{INVALID_CHOICE}")?;
        return Ok(SessionOutcome::InvalidChoice);
    };

    let result = dataset.load(datasets);
    let report = LoadReport::new(dataset, &result);
    writeln!(out, "{report}")?;
    let graph = match result {
        Ok(graph) => graph,
        Err(e) => {
            debug!("{dataset} unavailable: {e:?}");
            return Ok(SessionOutcome::LoadFailed(report));
        }
    };

    writeln!(out)?;
    if graph.is_empty() {
        writeln!(out, "{EMPTY_GRAPH}")?;
        return Ok(SessionOutcome::EmptyGraph);
    }

    let mut observer = ConsoleObserver::new(&mut *out);
    let summary = run_trials(&graph, trials, &trials.louvain(), &mut observer)?;
    observer.finish()?;
    Ok(SessionOutcome::Completed(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn session(input: &str, datasets: &DatasetConfig) -> (SessionOutcome, String) {
        let mut out = Vec::new();
        let outcome = run_session(
            &mut input.as_bytes(),
            &mut out,
            None,
            datasets,
            &TrialConfig::default(),
        )
        .unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_menu_text() {
        let mut out = Vec::new();
        write_menu(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Choose a dataset to load:\n\
             1. Dolphin Social Network\n\
             2. American Football Network\n\
             3. Amazon Co-Purchasing Network\n\
             4. American Kreb's book Network\n"
        );
    }

    #[test]
    fn test_invalid_choice_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let datasets = DatasetConfig {
            data_dir: dir.path().to_path_buf(),
            ..DatasetConfig::default()
        };
        let (outcome, text) = session("9\n", &datasets);
        assert_eq!(outcome, SessionOutcome::InvalidChoice);
        assert!(text.ends_with(&format!("{PROMPT}\n{INVALID_CHOICE}\n")), "{text}");
        assert!(!text.contains("not found"));
    }

    #[test]
    fn test_missing_file_stops_before_trials() {
        let dir = tempfile::tempdir().unwrap();
        let datasets = DatasetConfig {
            data_dir: dir.path().to_path_buf(),
            ..DatasetConfig::default()
        };
        let (outcome, text) = session("4\n", &datasets);
        assert!(matches!(outcome, SessionOutcome::LoadFailed(LoadReport::NotFound { .. })));
        assert!(text.ends_with("American Kreb's book dataset file not found. Please check the file path.\n"));
        assert!(!text.contains("Modularity"));
    }

    #[test]
    fn test_empty_edge_list_skips_trials() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("com-amazon.ungraph.txt"), "# nothing here\n").unwrap();
        let datasets = DatasetConfig {
            data_dir: dir.path().to_path_buf(),
            ..DatasetConfig::default()
        };
        let (outcome, text) = session("3\n", &datasets);
        assert_eq!(outcome, SessionOutcome::EmptyGraph);
        assert!(text.ends_with(&format!("0 nodes and 0 edges.\n\n{EMPTY_GRAPH}\n")), "{text}");
    }

    #[test]
    fn test_full_session_reports_three_runs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("com-amazon.ungraph.txt"),
            "a b\nb c\na c\nx y\ny z\nx z\nc x\n",
        )
        .unwrap();
        let datasets = DatasetConfig {
            data_dir: dir.path().to_path_buf(),
            ..DatasetConfig::default()
        };
        let (outcome, text) = session("3\n", &datasets);
        let SessionOutcome::Completed(summary) = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };

        assert!(text.contains("Amazon co-purchasing network loaded with 6 nodes and 7 edges.\n\n"));
        for run in 1..=3 {
            assert!(text.contains(&format!("Modularity (Run {run}): ")));
            assert!(text.contains(&format!("Run {run} time: ")));
        }
        let mean = summary.mean_modularity.unwrap();
        assert!(text.contains(&format!("\nMean modularity: {mean:.4}\n")));
        assert!(text.trim_end().ends_with(" seconds"));
        assert!(text.contains("Average running time: "));
    }

    #[test]
    fn test_choice_argument_skips_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let datasets = DatasetConfig {
            data_dir: dir.path().to_path_buf(),
            ..DatasetConfig::default()
        };
        let mut out = Vec::new();
        let outcome = run_session(
            &mut io::empty(),
            &mut out,
            Some("1"),
            &datasets,
            &TrialConfig::default(),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(matches!(outcome, SessionOutcome::LoadFailed(_)));
        assert!(!text.contains(PROMPT));
    }
}
