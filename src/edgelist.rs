use crate::error::{EdgeListError, LoadError};
use crate::graph::{EdgeInsert, Network};
use csv::ReaderBuilder;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read an edge list file from disk.
pub fn read_edge_list(path: impl AsRef<Path>) -> Result<Network, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    debug!("reading edge list from {}", path.display());
    Ok(parse_edge_list(BufReader::new(file))?)
}

/// Parse `source target` lines. Columns are separated by any run of
/// whitespace, columns after the second are ignored and `#` starts a
/// comment line.
pub fn parse_edge_list<R: Read>(input: R) -> Result<Network, EdgeListError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .delimiter(b'\t')
        .quoting(false)
        .from_reader(input);

    let mut network = Network::new();
    let mut duplicates = 0usize;
    let mut self_loops = 0usize;

    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter().flat_map(|field| field.split_whitespace());
        let Some(source) = fields.next() else {
            continue;
        };
        let Some(target) = fields.next() else {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(EdgeListError::MissingTarget {
                line,
                found: source.to_string(),
            });
        };
        match network.add_edge(source, target) {
            EdgeInsert::Added => {}
            EdgeInsert::Duplicate => duplicates += 1,
            EdgeInsert::SelfLoop => self_loops += 1,
        }
    }

    if duplicates > 0 {
        debug!("collapsed {duplicates} duplicate edge-list rows");
    }
    if self_loops > 0 {
        debug!("dropped {self_loops} edge-list self-loops");
    }
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_snap_style_tab_separated() {
        let input = "# Undirected graph: ../../data/output/amazon.ungraph.txt\n\
                     # FromNodeId\tToNodeId\n\
                     1\t88160\n\
                     1\t118052\n\
                     88160\t1\n";
        let network = parse_edge_list(input.as_bytes()).unwrap();
        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 2);
        assert!(network.contains_edge("118052", "1"));
    }

    #[test]
    fn test_space_separated_with_extra_columns() {
        let input = "a b 3.0\n\nb  c {'weight': 1}\nc d\n";
        let network = parse_edge_list(input.as_bytes()).unwrap();
        assert_eq!(network.nodes().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
        assert_eq!(network.edge_count(), 3);
    }

    #[test]
    fn test_mixed_tabs_and_spaces() {
        for input in ["1\t2\n2 3\n", "1 2\n2\t3\n", "1 \t 2\n  2\t\t3  \n"] {
            let network = parse_edge_list(input.as_bytes()).unwrap();
            assert_eq!(network.node_count(), 3, "{input:?}");
            assert_eq!(network.edge_count(), 2, "{input:?}");
            assert!(network.contains_edge("2", "3"));
        }
    }

    #[test]
    fn test_single_field_line_is_error() {
        let err = parse_edge_list("1 2\nlonely\n".as_bytes()).unwrap_err();
        match err {
            EdgeListError::MissingTarget { line, found } => {
                assert_eq!(line, 2);
                assert_eq!(found, "lonely");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_gives_empty_network() {
        let network = parse_edge_list("# only comments\n   \n".as_bytes()).unwrap();
        assert!(network.is_empty());
    }

    #[test]
    fn test_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.txt");
        fs::write(&path, "# c\n10\t20\n20 30\n").unwrap();
        let network = read_edge_list(&path).unwrap();
        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 2);
    }
}
