use community_bench::*;
use std::fmt::Write as _;
use std::fs;

const NODES: usize = 62;

/// 62 nodes and 159 distinct edges: two circulant layers plus 35 chords.
fn social_network_gml() -> String {
    let mut edges = Vec::new();
    for i in 0..NODES {
        edges.push((i, (i + 1) % NODES));
        edges.push((i, (i + 2) % NODES));
    }
    for i in 0..35 {
        edges.push((i, (i + 5) % NODES));
    }

    let mut gml = String::from("graph\n[\n  directed 0\n");
    for i in 0..NODES {
        writeln!(gml, "  node\n  [\n    id {i}\n    label \"dolphin{i}\"\n  ]").unwrap();
    }
    for (a, b) in edges {
        writeln!(gml, "  edge\n  [\n    source {a}\n    target {b}\n  ]").unwrap();
    }
    gml.push_str("]\n");
    gml
}

#[test]
fn dolphin_session_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("dolphins.gml"), social_network_gml()).unwrap();
    let datasets = DatasetConfig {
        data_dir: dir.path().to_path_buf(),
        ..DatasetConfig::default()
    };

    let mut out = Vec::new();
    let outcome = run_session(
        &mut "1\n".as_bytes(),
        &mut out,
        None,
        &datasets,
        &TrialConfig::default(),
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Dolphin network loaded with 62 nodes and 159 edges."), "{text}");
    let SessionOutcome::Completed(summary) = outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    assert_eq!(summary.trials.len(), 3);

    let per_run: Vec<f64> = text
        .lines()
        .filter_map(|line| line.strip_prefix("Modularity (Run "))
        .map(|rest| rest.split_once("): ").unwrap().1.parse().unwrap())
        .collect();
    assert_eq!(per_run.len(), 3);
    assert!(per_run.iter().all(|&q| q == per_run[0]));

    let mean_line = text
        .lines()
        .find_map(|line| line.strip_prefix("Mean modularity: "))
        .unwrap();
    let mean: f64 = mean_line.parse().unwrap();
    assert!((-1.0..=1.0).contains(&mean));
    let expected = per_run.iter().sum::<f64>() / 3.0;
    assert_eq!(mean_line, format!("{expected:.4}"));
}

#[test]
fn loader_counts_match_raw_file() {
    let dir = tempfile::tempdir().unwrap();
    let gml = social_network_gml();
    fs::write(dir.path().join("polbooks.gml"), &gml).unwrap();
    let datasets = DatasetConfig {
        data_dir: dir.path().to_path_buf(),
        ..DatasetConfig::default()
    };

    let graph = Dataset::PolBooks.load(&datasets).unwrap();
    let raw_nodes = gml.matches("  node\n").count();
    let raw_edges = gml.matches("  edge\n").count();
    assert_eq!(graph.node_count(), raw_nodes);
    assert_eq!(graph.edge_count(), raw_edges);
}

#[test]
fn seeds_are_reproducible_across_sessions() {
    let graph = gml::parse_gml(&social_network_gml()).unwrap();
    let config = TrialConfig {
        trial_count: 2,
        seed: 7,
        ..TrialConfig::default()
    };
    let first = run_trials(&graph, &config, &config.louvain(), &mut ()).unwrap();
    let second = run_trials(&graph, &config, &config.louvain(), &mut ()).unwrap();
    assert_eq!(first.mean_modularity, second.mean_modularity);
}
