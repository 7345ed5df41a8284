//! Neo4j adapter over Bolt, using `neo4rs`

use crate::cypher::{self, Statement};
use crate::error::StoreError;
use crate::record::Record;
use crate::store::GraphStore;
use async_trait::async_trait;
use gova_resource::{Label, Properties};
use neo4rs::{BoltNull, BoltType, ConfigBuilder, Graph, Node};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Connection settings for [`Neo4jStore`]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jSettings {
    /// Bolt URI, e.g. `neo4j://localhost:7687`
    pub uri: String,
    /// User name
    pub user: String,
    /// Password
    pub password: String,
    /// Database name; server default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl Neo4jSettings {
    /// Settings for `uri` with basic credentials
    #[inline]
    #[must_use]
    pub fn new(uri: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
            database: None,
        }
    }

    /// With a named database
    #[inline]
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self::new("neo4j://localhost:7687", "neo4j", "")
    }
}

impl fmt::Debug for Neo4jSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jSettings")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// [`GraphStore`] backed by a Neo4j server
#[derive(Clone)]
pub struct Neo4jStore {
    graph: Arc<Graph>,
}

impl fmt::Debug for Neo4jStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jStore").finish_non_exhaustive()
    }
}

impl Neo4jStore {
    /// Connect and verify the server answers
    ///
    /// # Errors
    /// [`StoreError::Connection`] or [`StoreError::Authentication`] when the
    /// server cannot be used
    pub async fn connect(settings: &Neo4jSettings) -> Result<Self, StoreError> {
        let mut builder = ConfigBuilder::default()
            .uri(settings.uri.as_str())
            .user(settings.user.as_str())
            .password(settings.password.as_str());
        if let Some(db) = &settings.database {
            builder = builder.db(db.as_str());
        }
        let config = builder.build()?;
        let graph = Graph::connect(config).await?;

        let store = Self {
            graph: Arc::new(graph),
        };
        store.run(&cypher::ping()).await?;
        tracing::info!(uri = %settings.uri, "connected to neo4j");
        Ok(store)
    }

    async fn run(&self, stmt: &Statement) -> Result<(), StoreError> {
        tracing::debug!(query = %stmt.text, "running statement");
        self.graph.run(to_query(stmt)).await?;
        Ok(())
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn fetch_list(&self, label: &Label, limit: usize) -> Result<Vec<Record>, StoreError> {
        let stmt = cypher::fetch_list(label, limit);
        tracing::debug!(query = %stmt.text, limit, "fetching records");

        let mut rows = self.graph.execute(to_query(&stmt)).await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            let node: Node = row
                .get("n")
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            records.push(node_to_record(&node)?);
        }
        Ok(records)
    }

    async fn create_record(&self, label: &Label, properties: Properties) -> Result<(), StoreError> {
        self.run(&cypher::create_record(label, &properties)).await
    }
}

fn to_query(stmt: &Statement) -> neo4rs::Query {
    stmt.params
        .iter()
        .fold(neo4rs::query(&stmt.text), |q, (name, value)| {
            q.param(name, to_bolt(value))
        })
}

fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(int) => BoltType::from(int),
            None => BoltType::from(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => BoltType::from(items.iter().map(to_bolt).collect::<Vec<_>>()),
        Value::Object(map) => BoltType::from(
            map.iter()
                .map(|(k, v)| (k.clone(), to_bolt(v)))
                .collect::<HashMap<String, BoltType>>(),
        ),
    }
}

fn node_to_record(node: &Node) -> Result<Record, StoreError> {
    let mut properties = Properties::new();
    for key in node.keys() {
        let value: Value = node
            .get(key)
            .map_err(|e| StoreError::Decode(format!("property `{key}`: {e}")))?;
        properties.insert(key.to_string(), value);
    }
    Ok(Record::new(properties).with_id(node.id()))
}
