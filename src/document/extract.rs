//! Extraction of database endpoints and embedded SQL from a parsed job.

use indexmap::IndexMap;
use serde::Serialize;

use super::types::JobDocument;

/// Schema shown when a query-bearing node has no `DBNAME`.
pub const UNKNOWN_SCHEMA: &str = "???";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DatabaseEndpoint {
    pub host: String,
    pub database: String,
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlStatement {
    pub schema: String,
    pub query: String,
}

impl JobDocument {
    /// Endpoints of nodes opening their own connection, in node order.
    pub fn database_endpoints(&self) -> Vec<DatabaseEndpoint> {
        let mut endpoints = Vec::new();
        for node in self.nodes.values() {
            if node.uses_existing_connection() {
                continue;
            }
            let host = node.param("HOST").map(str::to_uppercase);
            let database = node
                .param("DBNAME")
                .map(|db| db.trim_matches('"').to_uppercase());

            match (host, database) {
                (Some(host), Some(database)) if !host.is_empty() && !database.is_empty() => {
                    endpoints.push(DatabaseEndpoint {
                        host,
                        database,
                        user: node.param("USER").map(str::to_string),
                    });
                }
                _ => {}
            }
        }
        endpoints
    }

    /// Queries by node name, quotes removed.
    pub fn sql_statements(&self) -> IndexMap<String, SqlStatement> {
        self.nodes
            .values()
            .filter(|node| !node.is_disabled())
            .filter_map(|node| {
                let query = node.param("QUERY")?;
                Some((
                    node.unique_name.clone(),
                    SqlStatement {
                        schema: node.param("DBNAME").unwrap_or(UNKNOWN_SCHEMA).to_string(),
                        query: query.replace('"', ""),
                    },
                ))
            })
            .collect()
    }

    /// Plain-text SQL dump of this job, optionally with a comment header per query.
    pub fn sql_dump(&self, job_name: &str, header: bool) -> String {
        let mut lines = Vec::new();
        for (node, statement) in self.sql_statements() {
            if header {
                lines.push(format!(
                    "-- Job Name:\t{}\n-- Component:\t{}\n-- Schema:\t{}",
                    job_name, node, statement.schema
                ));
            }
            lines.push(statement.query);
        }
        lines.join("\n")
    }
}
