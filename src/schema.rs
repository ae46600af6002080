// ABOUTME: Tool schema types advertised to the calling AI model for function calling.
// ABOUTME: A JSON-Schema subset: object type, typed properties, required list.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Tool Schema Types
//!
//! The schema contract every registered tool exposes:
//! `{ name, description, input_schema }` where the input schema is a
//! JSON-Schema subset (`type: "object"`, typed properties, required list).
//! These types serialize to the wire names the model-side function-calling
//! API expects (`type`, `inputSchema`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Advertised schema for one tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool name
    pub name: String,
    /// Human-readable description for LLM consumption
    pub description: String,
    /// Input parameter schema
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonSchema,
}

/// JSON Schema definition (subset)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Always `"object"` for tool inputs
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property definitions by name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, PropertySchema>>,
    /// Names of required properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl JsonSchema {
    /// Build an object schema from `(name, type, description)` property
    /// triples and a list of required names.
    #[must_use]
    pub fn object(properties: &[(&str, &str, &str)], required: &[&str]) -> Self {
        let props = properties
            .iter()
            .map(|(name, ptype, desc)| {
                (
                    (*name).to_owned(),
                    PropertySchema {
                        property_type: (*ptype).to_owned(),
                        description: Some((*desc).to_owned()),
                    },
                )
            })
            .collect();

        Self {
            schema_type: "object".to_owned(),
            properties: Some(props),
            required: if required.is_empty() {
                None
            } else {
                Some(required.iter().map(|r| (*r).to_owned()).collect())
            },
        }
    }
}

/// JSON Schema property definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON type name (`string`, `number`, `integer`, `boolean`, `array`)
    #[serde(rename = "type")]
    pub property_type: String,
    /// Property description for LLM consumption
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_schema_serializes_wire_names() {
        let schema = JsonSchema::object(
            &[("name", "string", "Organization name")],
            &["name"],
        );
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["name"]["type"], "string");
        assert_eq!(json["required"][0], "name");
    }
}
