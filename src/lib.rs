//! Loads a benchmark graph and reports Louvain modularity over repeated trials.

pub mod community;
pub mod dataset;
pub mod edgelist;
pub mod error;
pub mod gml;
pub mod graph;
pub mod menu;
pub mod trials;

pub use community::{modularity, CommunityDetection, Louvain, Partition};
pub use dataset::{Dataset, DatasetConfig, LoadReport};
pub use error::{CommunityError, LoadError, SessionError};
pub use graph::Network;
pub use menu::{run_session, SessionOutcome};
pub use trials::{run_trials, RunSummary, TrialConfig, TrialObserver, TrialResult};
