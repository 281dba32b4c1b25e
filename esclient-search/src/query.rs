//! Query builders
//!
//! A query builder renders a query as a structured value; requests turn that
//! into opaque payload bytes with [`QueryBuilder::build_as_bytes`].

use bytes::Bytes;
use esclient_common::{ContentType, Result, XContentBuilder};
use serde_json::{json, Map, Value};

/// Something that renders a query document
pub trait QueryBuilder: Send + Sync {
    /// The query as a structured value, e.g. `{"match_all": {}}`
    fn to_xcontent(&self) -> Value;

    /// The query rendered in `content_type`
    fn build_as_bytes(&self, content_type: ContentType) -> Result<Bytes> {
        XContentBuilder::new(content_type)
            .value(self.to_xcontent())
            .bytes()
    }
}

/// Matches every document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchAllQueryBuilder {
    boost: Option<f32>,
}

impl MatchAllQueryBuilder {
    pub fn boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }
}

impl QueryBuilder for MatchAllQueryBuilder {
    fn to_xcontent(&self) -> Value {
        let mut body = Map::new();
        if let Some(boost) = self.boost {
            body.insert("boost".to_string(), json!(boost));
        }
        json!({ "match_all": body })
    }
}

/// Matches documents whose field holds exactly `value`
#[derive(Debug, Clone, PartialEq)]
pub struct TermQueryBuilder {
    name: String,
    value: Value,
    boost: Option<f32>,
}

impl TermQueryBuilder {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            boost: None,
        }
    }

    pub fn boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }
}

impl QueryBuilder for TermQueryBuilder {
    fn to_xcontent(&self) -> Value {
        let term = match self.boost {
            None => self.value.clone(),
            Some(boost) => json!({ "value": self.value, "boost": boost }),
        };
        let mut field = Map::new();
        field.insert(self.name.clone(), term);
        json!({ "term": field })
    }
}

/// A query given as a ready-made structured value
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperQueryBuilder(pub Value);

impl QueryBuilder for WrapperQueryBuilder {
    fn to_xcontent(&self) -> Value {
        self.0.clone()
    }
}

pub fn match_all_query() -> MatchAllQueryBuilder {
    MatchAllQueryBuilder::default()
}

pub fn term_query(name: impl Into<String>, value: impl Into<Value>) -> TermQueryBuilder {
    TermQueryBuilder::new(name, value)
}
