//! Community detection and partition scoring.
//!
//! ```text
//! Q = Σ_c [ L_c / m − γ (d_c / 2m)² ]
//! ```
//!
//! `L_c` is the number of edges inside community `c`, `d_c` the sum of
//! degrees of its members, `m` the total number of edges and `γ` the
//! resolution. Higher `γ` favours smaller communities.

mod louvain;
mod modularity;
mod partition;
mod traits;

pub use louvain::Louvain;
pub use modularity::modularity;
pub use partition::Partition;
pub use traits::CommunityDetection;
