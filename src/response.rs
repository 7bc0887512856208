use serde::Deserialize;
use serde_json::Value;

/// Paging counters from `metadata.resultset` of a list response.
///
/// CDO's `offset` is 1-based in responses: the first page reports `offset: 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ResultSet {
    pub offset: u64,
    pub count: u64,
    pub limit: u64,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    resultset: ResultSet,
}

impl ResultSet {
    /// Reads the counters from a decoded response, if it carries any.
    ///
    /// Single-resource lookups and empty results have no metadata and yield `None`.
    pub fn from_envelope(envelope: &Value) -> Option<Self> {
        let metadata = envelope.get("metadata")?;
        Metadata::deserialize(metadata).ok().map(|m| m.resultset)
    }

    /// The `offset` to request for the page after this one, or `None` on the last page.
    pub fn next_offset(&self) -> Option<u64> {
        let next = self.offset.max(1).checked_add(self.limit)?;
        (self.limit > 0 && next <= self.count).then_some(next)
    }
}

/// The `results` array of a list response; empty when absent.
pub fn results(envelope: &Value) -> &[Value] {
    envelope
        .get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
