//! Script fields: computed values attached to each returned document

use esclient_common::{EsClientError, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A compiled script that computes a value from a document's source
pub trait ContentScript: Send + Sync {
    fn run(&self, source: &Map<String, Value>) -> anyhow::Result<Value>;
}

impl<F> ContentScript for F
where
    F: Fn(&Map<String, Value>) -> anyhow::Result<Value> + Send + Sync,
{
    fn run(&self, source: &Map<String, Value>) -> anyhow::Result<Value> {
        self(source)
    }
}

/// A named script whose value is returned as a field
#[derive(Clone)]
pub struct ScriptField {
    name: String,
    script: Arc<dyn ContentScript>,
    ignore_exception: bool,
}

impl ScriptField {
    pub fn new(
        name: impl Into<String>,
        script: Arc<dyn ContentScript>,
        ignore_exception: bool,
    ) -> Self {
        Self {
            name: name.into(),
            script,
            ignore_exception,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn script(&self) -> &Arc<dyn ContentScript> {
        &self.script
    }

    /// Whether a failing script leaves the field out instead of failing the document
    pub fn ignore_exception(&self) -> bool {
        self.ignore_exception
    }
}

impl fmt::Debug for ScriptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptField")
            .field("name", &self.name)
            .field("ignore_exception", &self.ignore_exception)
            .finish_non_exhaustive()
    }
}

/// The script fields requested for a search, in request order
#[derive(Debug, Clone, Default)]
pub struct ScriptFieldsContext {
    fields: Vec<ScriptField>,
}

impl ScriptFieldsContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: ScriptField) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[ScriptField] {
        &self.fields
    }

    /// Run every script against `source` and collect the produced fields
    pub fn evaluate(&self, source: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut values = Map::new();
        for field in &self.fields {
            match field.script.run(source) {
                Ok(value) => {
                    values.insert(field.name.clone(), value);
                }
                Err(error) if field.ignore_exception => {
                    warn!(field = %field.name, %error, "ignoring failed script field");
                }
                Err(error) => {
                    return Err(EsClientError::Script {
                        field: field.name.clone(),
                        message: format!("{error:#}"),
                    });
                }
            }
        }
        Ok(values)
    }
}
