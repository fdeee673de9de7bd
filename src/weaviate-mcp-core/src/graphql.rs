//! GraphQL document synthesis for `Get` queries.
//!
//! Documents are assembled from string templates; every caller-supplied
//! string goes through [`quote`] so it lands as an escaped string literal.

use serde::Deserialize;
use std::fmt::Display;

use crate::search::{QueryOptions, SearchClause};

pub const DEFAULT_LIMIT: usize = 10;

/// Selection used when the caller asks for no fields
pub const DEFAULT_FIELDS: &str = "_additional { id distance certainty }";

/// Escaped GraphQL string literal, quotes included
pub fn quote(value: &str) -> String {
    // JSON string escaping is a subset of GraphQL string escaping
    serde_json::Value::from(value).to_string()
}

pub fn string_list<S: AsRef<str>>(values: &[S]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| quote(v.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}

pub fn display_list<T: Display>(values: &[T]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Build `{ Get { Class(<clause> limit ...) { fields } } }`
pub fn build_get_query(class_name: &str, clause: &SearchClause, options: &QueryOptions) -> String {
    let mut arguments = vec![
        clause.to_graphql(),
        format!("limit: {}", options.limit.unwrap_or(DEFAULT_LIMIT)),
    ];
    if let Some(offset) = options.offset {
        arguments.push(format!("offset: {}", offset));
    }
    if let Some(filter) = &options.filter {
        arguments.push(format!("where: {}", filter.to_graphql()));
    }
    if let Some(tenant) = &options.tenant {
        arguments.push(format!("tenant: {}", quote(tenant)));
    }

    let fields = if options.fields.is_empty() {
        DEFAULT_FIELDS.to_string()
    } else {
        options.fields.join(" ")
    };

    format!(
        "{{\n  Get {{\n    {}(\n      {}\n    ) {{\n      {}\n    }}\n  }}\n}}",
        class_name,
        arguments.join("\n      "),
        fields
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

/// Envelope returned by the `/graphql` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResponse {
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    /// Hits under `data.Get.<class_name>`; empty when absent or null
    pub fn get_hits(&self, class_name: &str) -> Vec<serde_json::Value> {
        self.data
            .as_ref()
            .and_then(|data| data.get("Get"))
            .and_then(|get| get.get(class_name))
            .and_then(|hits| hits.as_array())
            .cloned()
            .unwrap_or_default()
    }
}
