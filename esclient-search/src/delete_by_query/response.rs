//! Per-index shard outcomes of a delete-by-query

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shard outcome counts of an operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardCounts {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
}

/// Outcome of a delete-by-query on one index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDeleteByQueryResponse {
    #[serde(rename = "_shards", default)]
    pub shards: ShardCounts,
}

/// Outcome of a delete-by-query, keyed by index name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteByQueryResponse {
    #[serde(rename = "_indices", default)]
    indices: BTreeMap<String, IndexDeleteByQueryResponse>,
}

impl DeleteByQueryResponse {
    pub fn indices(&self) -> &BTreeMap<String, IndexDeleteByQueryResponse> {
        &self.indices
    }

    pub fn index(&self, name: &str) -> Option<&IndexDeleteByQueryResponse> {
        self.indices.get(name)
    }

    /// Shard counts summed over every index
    pub fn total_shards(&self) -> ShardCounts {
        self.indices
            .values()
            .fold(ShardCounts::default(), |acc, index| ShardCounts {
                total: acc.total.saturating_add(index.shards.total),
                successful: acc.successful.saturating_add(index.shards.successful),
                failed: acc.failed.saturating_add(index.shards.failed),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_per_index_shards() {
        let body = r#"{
            "ok": true,
            "_indices": {
                "twitter": {"_shards": {"total": 5, "successful": 5, "failed": 0}},
                "logs": {"_shards": {"total": 2, "successful": 1, "failed": 1}}
            }
        }"#;
        let response: DeleteByQueryResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.indices().len(), 2);
        assert_eq!(response.index("logs").unwrap().shards.failed, 1);
        assert_eq!(
            response.total_shards(),
            ShardCounts {
                total: 7,
                successful: 6,
                failed: 1
            }
        );
    }

    #[test]
    fn test_missing_indices_is_empty() {
        let response: DeleteByQueryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.indices().is_empty());
        assert_eq!(response.total_shards(), ShardCounts::default());
    }

    #[test]
    fn test_total_shards_saturates() {
        let body = format!(
            r#"{{"_indices": {{
                "a": {{"_shards": {{"total": {max}, "successful": {max}, "failed": 0}}}},
                "b": {{"_shards": {{"total": 3, "successful": 3, "failed": 0}}}}
            }}}}"#,
            max = u32::MAX
        );
        let response: DeleteByQueryResponse = serde_json::from_str(&body).unwrap();

        let total = response.total_shards();
        assert_eq!(total.total, u32::MAX);
        assert_eq!(total.successful, u32::MAX);
        assert_eq!(total.failed, 0);
    }
}
