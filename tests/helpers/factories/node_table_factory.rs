use crate::serve::node_table::NodeTable;

/// Builds a node table text and parses it. Defaults to two nodes under both
/// schemes.
pub struct NodeTableFactory {
    lines: Vec<String>,
}

impl NodeTableFactory {
    pub fn new() -> Self {
        Self {
            lines: vec![
                "http://cdn1.example.com".into(),
                "https://cdn1.example.com".into(),
                "http://cdn2.example.com".into(),
                "https://cdn2.example.com".into(),
            ],
        }
    }

    pub fn with_lines(mut self, lines: &[&str]) -> Self {
        self.lines = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn create(self) -> NodeTable {
        NodeTable::parse(&self.text()).unwrap()
    }
}
