//! Fields shared by index-level replicated write requests

use esclient_common::{
    ActionRequestValidationError, EsClientError, Result, StreamInput, StreamOutput, Streamable,
    TimeValue,
};

/// How long the primary waits for shards by default
pub const DEFAULT_REPLICATION_TIMEOUT: TimeValue = TimeValue::from_minutes(1);

/// Whether the primary waits for replicas before answering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReplicationType {
    Sync,
    Async,
    /// Let the cluster decide
    #[default]
    Default,
}

impl ReplicationType {
    pub fn id(&self) -> u8 {
        match self {
            Self::Sync => 0,
            Self::Async => 1,
            Self::Default => 2,
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Self::Sync),
            1 => Ok(Self::Async),
            2 => Ok(Self::Default),
            other => Err(EsClientError::decode(format!(
                "no replication type for id [{other}]"
            ))),
        }
    }

    /// Query parameter value; `None` leaves the choice to the cluster
    pub fn param_value(&self) -> Option<&'static str> {
        match self {
            Self::Sync => Some("sync"),
            Self::Async => Some("async"),
            Self::Default => None,
        }
    }
}

/// How many shard copies must be active before a write proceeds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WriteConsistencyLevel {
    #[default]
    Default,
    One,
    Quorum,
    All,
}

impl WriteConsistencyLevel {
    pub fn id(&self) -> u8 {
        match self {
            Self::Default => 0,
            Self::One => 1,
            Self::Quorum => 2,
            Self::All => 3,
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Self::Default),
            1 => Ok(Self::One),
            2 => Ok(Self::Quorum),
            3 => Ok(Self::All),
            other => Err(EsClientError::decode(format!(
                "no write consistency level for id [{other}]"
            ))),
        }
    }

    pub fn param_value(&self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::One => Some("one"),
            Self::Quorum => Some("quorum"),
            Self::All => Some("all"),
        }
    }
}

/// Base of requests that run a replicated operation against whole indices
///
/// Wire order: replication type byte, consistency level byte, timeout, indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicesReplicationRequest {
    /// Target indices; empty means all indices
    pub indices: Vec<String>,
    pub timeout: TimeValue,
    pub replication_type: ReplicationType,
    pub consistency_level: WriteConsistencyLevel,
}

impl Default for IndicesReplicationRequest {
    fn default() -> Self {
        Self {
            indices: Vec::new(),
            timeout: DEFAULT_REPLICATION_TIMEOUT,
            replication_type: ReplicationType::default(),
            consistency_level: WriteConsistencyLevel::default(),
        }
    }
}

impl IndicesReplicationRequest {
    pub fn new<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            indices: indices.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// The base fields carry no required values
    pub fn validate(&self) -> Option<ActionRequestValidationError> {
        None
    }
}

impl Streamable for IndicesReplicationRequest {
    fn read_from(input: &mut StreamInput) -> Result<Self> {
        let replication_type = ReplicationType::from_id(input.read_byte()?)?;
        let consistency_level = WriteConsistencyLevel::from_id(input.read_byte()?)?;
        let timeout = TimeValue::read_from(input)?;
        let indices = input.read_string_array()?;
        Ok(Self {
            indices,
            timeout,
            replication_type,
            consistency_level,
        })
    }

    fn write_to(&self, out: &mut StreamOutput) -> Result<()> {
        out.write_byte(self.replication_type.id());
        out.write_byte(self.consistency_level.id());
        self.timeout.write_to(out)?;
        out.write_string_array(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esclient_common::io::{from_bytes, to_bytes};

    #[test]
    fn test_default_timeout_is_one_minute() {
        let request = IndicesReplicationRequest::default();
        assert_eq!(request.timeout, TimeValue::from_minutes(1));
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_wire_layout() {
        let mut request = IndicesReplicationRequest::new(["logs"]);
        request.replication_type = ReplicationType::Async;
        request.consistency_level = WriteConsistencyLevel::Quorum;

        let bytes = to_bytes(&request).unwrap();
        assert_eq!(&bytes[..2], &[1, 2]);
        assert_eq!(&bytes[2..10], &60_000i64.to_be_bytes());
        assert_eq!(&bytes[10..], &[1, 4, b'l', b'o', b'g', b's']);

        let decoded: IndicesReplicationRequest = from_bytes(bytes).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_unknown_ids_fail_decoding() {
        assert!(ReplicationType::from_id(9).is_err());
        assert!(WriteConsistencyLevel::from_id(4).is_err());
    }
}
