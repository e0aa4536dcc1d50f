use crate::edgelist::read_edge_list;
use crate::error::LoadError;
use crate::gml::{parse_gml_skipping, read_gml};
use crate::graph::Network;
use log::{debug, info};
use std::fmt;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

pub const DEFAULT_DATA_DIR: &str = "dataset";
pub const DEFAULT_FOOTBALL_URL: &str = "http://www-personal.umich.edu/~mejn/netdata/football.zip";
pub const DEFAULT_FOOTBALL_ENTRY: &str = "football.gml";

/// Where datasets are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    pub data_dir: PathBuf,
    pub football_url: String,
    pub football_entry: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            football_url: DEFAULT_FOOTBALL_URL.to_string(),
            football_entry: DEFAULT_FOOTBALL_ENTRY.to_string(),
        }
    }
}

/// How a dataset is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Gml(&'static str),
    EdgeList(&'static str),
    /// Zip archive over HTTP whose GML entry starts with one header line.
    RemoteArchive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Dolphin social network.
    Dolphins,
    /// American college football schedule.
    Football,
    /// Amazon co-purchasing network.
    Amazon,
    /// Krebs' books on US politics.
    PolBooks,
}

impl Dataset {
    /// Menu order.
    pub const ALL: [Dataset; 4] = [
        Dataset::Dolphins,
        Dataset::Football,
        Dataset::Amazon,
        Dataset::PolBooks,
    ];

    /// Map a menu answer (`"1"` to `"4"`) to a dataset.
    pub fn from_choice(choice: &str) -> Option<Dataset> {
        match choice.trim() {
            "1" => Some(Dataset::Dolphins),
            "2" => Some(Dataset::Football),
            "3" => Some(Dataset::Amazon),
            "4" => Some(Dataset::PolBooks),
            _ => None,
        }
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Dataset::Dolphins => "Dolphin Social Network",
            Dataset::Football => "American Football Network",
            Dataset::Amazon => "Amazon Co-Purchasing Network",
            Dataset::PolBooks => "American Kreb's book Network",
        }
    }

    /// Name used in the "loaded" status line.
    fn network_name(self) -> &'static str {
        match self {
            Dataset::Dolphins => "Dolphin",
            Dataset::Football => "American Football",
            Dataset::Amazon => "Amazon co-purchasing",
            Dataset::PolBooks => "American Kreb's book",
        }
    }

    /// Name used in failure status lines.
    fn dataset_name(self) -> &'static str {
        match self {
            Dataset::Dolphins => "Dolphin",
            Dataset::Football => "American Football",
            Dataset::Amazon => "Amazon",
            Dataset::PolBooks => "American Kreb's book",
        }
    }

    pub fn source(self) -> Source {
        match self {
            Dataset::Dolphins => Source::Gml("dolphins.gml"),
            Dataset::Football => Source::RemoteArchive,
            Dataset::Amazon => Source::EdgeList("com-amazon.ungraph.txt"),
            Dataset::PolBooks => Source::Gml("polbooks.gml"),
        }
    }

    /// Build the dataset's graph.
    pub fn load(self, config: &DatasetConfig) -> Result<Network, LoadError> {
        let graph = match self.source() {
            Source::Gml(file) => read_gml(existing_path(&config.data_dir, file)?)?,
            Source::EdgeList(file) => read_edge_list(existing_path(&config.data_dir, file)?)?,
            Source::RemoteArchive => {
                let bytes = fetch_archive(&config.football_url)?;
                read_archive_graph(&bytes, &config.football_entry)?
            }
        };
        info!(
            "{:?}: {} nodes, {} edges",
            self,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.menu_label())
    }
}

fn existing_path(dir: &Path, file: &str) -> Result<PathBuf, LoadError> {
    let path = dir.join(file);
    if path.exists() {
        Ok(path)
    } else {
        Err(LoadError::NotFound { path })
    }
}

/// Download `url` and return the whole response body.
pub fn fetch_archive(url: &str) -> Result<Vec<u8>, LoadError> {
    let fetch_error = |message: String| LoadError::Fetch {
        url: url.to_string(),
        message,
    };

    let response = ureq::get(url).call().map_err(|e| fetch_error(e.to_string()))?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| fetch_error(e.to_string()))?;
    debug!("fetched {} bytes from {url}", bytes.len());
    Ok(bytes)
}

/// Extract `entry` from an in-memory zip archive, drop its first line and
/// parse the rest as GML.
pub fn read_archive_graph(bytes: &[u8], entry: &str) -> Result<Network, LoadError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut file = match archive.by_name(entry) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(LoadError::MissingEntry(entry.to_string())),
        Err(e) => return Err(e.into()),
    };

    let mut raw = Vec::new();
    file.read_to_end(&mut raw)?;
    let text = String::from_utf8(raw).map_err(|_| LoadError::Encoding(entry.to_string()))?;
    Ok(parse_gml_skipping(&text, 1)?)
}

/// Status line for a load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    Loaded {
        dataset: Dataset,
        nodes: usize,
        edges: usize,
    },
    NotFound {
        dataset: Dataset,
    },
    Failed {
        dataset: Dataset,
        cause: String,
    },
}

impl LoadReport {
    pub fn new(dataset: Dataset, result: &Result<Network, LoadError>) -> Self {
        match result {
            Ok(graph) => LoadReport::Loaded {
                dataset,
                nodes: graph.node_count(),
                edges: graph.edge_count(),
            },
            Err(LoadError::NotFound { .. }) => LoadReport::NotFound { dataset },
            Err(e) => LoadReport::Failed {
                dataset,
                cause: e.to_string(),
            },
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadReport::Loaded { .. })
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadReport::Loaded {
                dataset,
                nodes,
                edges,
            } => write!(
                f,
                "{} network loaded with {nodes} nodes and {edges} edges.",
                dataset.network_name()
            ),
            LoadReport::NotFound { dataset } => write!(
                f,
                "{} dataset file not found. Please check the file path.",
                dataset.dataset_name()
            ),
            LoadReport::Failed { dataset, cause } => {
                write!(f, "Error loading {} dataset: {cause}", dataset.dataset_name())
            }
        }
    }
}
