//! Per-node speed test results, as handed over by the test runner

use serde::{Deserialize, Serialize};

/// Outcome of testing one node
///
/// `avg_speed` and `avg_ping` are kept as the runner printed them
/// (`"12.50MB/s"`, `"N/A"`, `"0.00"`); they are only interpreted when a
/// summary is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    /// Whether the node finished testing
    #[serde(default)]
    pub online: bool,

    /// Average download speed with unit suffix, or `N/A`
    #[serde(default, alias = "avgSpeed")]
    pub avg_speed: String,

    /// Average ping in milliseconds, `0.00` when nothing was measured
    #[serde(default, alias = "avgPing")]
    pub avg_ping: String,

    /// Node display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,

    /// Subscription group the node came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl NodeResult {
    /// A node that completed testing
    pub fn online(avg_speed: impl Into<String>, avg_ping: impl Into<String>) -> Self {
        Self {
            online: true,
            avg_speed: avg_speed.into(),
            avg_ping: avg_ping.into(),
            remarks: None,
            group: None,
        }
    }

    /// A node that failed testing
    pub fn offline() -> Self {
        Self {
            online: false,
            avg_speed: crate::defaults::SPEED_UNAVAILABLE.to_string(),
            avg_ping: crate::defaults::PING_UNMEASURED.to_string(),
            remarks: None,
            group: None,
        }
    }

    /// Attach a display name
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

/// One report's worth of node results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub nodes: Vec<NodeResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Accepted layouts of a results file
#[derive(Deserialize)]
#[serde(untagged)]
enum ResultFile {
    Set(ResultSet),
    Nodes(Vec<NodeResult>),
}

impl ResultSet {
    pub fn new(nodes: Vec<NodeResult>, group: Option<String>) -> Self {
        Self { nodes, group }
    }

    /// Parse either `{"group": ..., "nodes": [...]}` or a bare node array
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let parsed: ResultFile = serde_json::from_str(json)?;
        Ok(match parsed {
            ResultFile::Set(set) => set,
            ResultFile::Nodes(nodes) => Self { nodes, group: None },
        })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Build the caption for this report, consuming it
    pub fn into_caption(self) -> String {
        crate::output::summarize(&self.nodes, self.group.as_deref())
    }
}
