//! Tool schema derivation and the shared schema registry.
//!
//! A tool declares its parameters (name, type annotation, optional default).
//! [`derive_schema`] turns that declaration into the JSON function schema the
//! completion endpoint expects, and [`SchemaRegistry`] memoises the result
//! per tool name for every agent in the process.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::provider::ToolDefinition;
use crate::tool::{ParamSpec, Tool};

const MAX_TOOL_NAME_LEN: usize = 64;

/// JSON type tag of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }

    /// Map a declared type annotation to a JSON type.
    ///
    /// Accepts both Rust spellings (`i64`, `Vec<String>`, `Option<f64>`) and
    /// the short names commonly used in tool docs (`str`, `int`, `dict`).
    /// Missing or unknown annotations fall back to `String`.
    pub fn from_annotation(annotation: Option<&str>) -> Self {
        let Some(raw) = annotation else {
            return Self::String;
        };

        let mut ty = raw.trim();
        ty = ty.trim_start_matches('&').trim_start();
        if let Some(rest) = ty.strip_prefix("mut ") {
            ty = rest.trim_start();
        }

        if ty.starts_with('[') {
            return Self::Array;
        }
        if ty == "()" || ty == "None" {
            return Self::Null;
        }

        let (base, inner) = match ty.find(['<', '[']) {
            Some(idx) => {
                let inner = ty[idx + 1..].trim_end_matches(['>', ']']);
                (&ty[..idx], Some(inner))
            }
            None => (ty, None),
        };
        // `std::collections::HashMap` → `HashMap`
        let base = base.rsplit("::").next().unwrap_or(base).trim();

        match base {
            "Option" | "Optional" => Self::from_annotation(inner),
            "str" | "String" | "char" | "Cow" => Self::String,
            "int" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32"
            | "u64" | "u128" | "usize" => Self::Integer,
            "float" | "f32" | "f64" => Self::Number,
            "bool" => Self::Boolean,
            "list" | "tuple" | "Vec" | "VecDeque" | "HashSet" | "BTreeSet" => Self::Array,
            "dict" | "Map" | "HashMap" | "BTreeMap" | "object" => Self::Object,
            _ => Self::String,
        }
    }
}

/// One parameter in a derived schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub required: bool,
}

/// The model-facing description of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolSchema {
    /// Names of required parameters, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// The `parameters` JSON object: `{type: "object", properties, required}`.
    pub fn parameters_json(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .parameters
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    serde_json::json!({ "type": p.param_type.as_str() }),
                )
            })
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": self.required(),
        })
    }

    /// Full wire shape: `{type: "function", function: {name, description, parameters}}`.
    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters_json(),
            }
        })
    }

    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters_json(),
        }
    }
}

/// Derive a schema from a tool's declared signature.
///
/// Deterministic and pure: the same declaration always yields the same schema.
pub fn derive_schema(tool: &dyn Tool) -> Result<ToolSchema, SchemaError> {
    derive_from_parts(tool.name(), tool.description(), &tool.parameters())
}

fn derive_from_parts(
    name: &str,
    doc: &str,
    params: &[ParamSpec],
) -> Result<ToolSchema, SchemaError> {
    validate_tool_name(name)?;

    let mut parameters: Vec<ToolParameter> = Vec::with_capacity(params.len());
    for spec in params {
        if spec.name.trim().is_empty() {
            return Err(SchemaError::EmptyParameterName { tool: name.into() });
        }
        if parameters.iter().any(|p| p.name == spec.name) {
            return Err(SchemaError::DuplicateParameter {
                tool: name.into(),
                param: spec.name.clone(),
            });
        }
        parameters.push(ToolParameter {
            name: spec.name.clone(),
            param_type: ParamType::from_annotation(spec.annotation.as_deref()),
            required: spec.default.is_none(),
        });
    }

    Ok(ToolSchema {
        name: name.into(),
        description: doc.trim().into(),
        parameters,
    })
}

fn validate_tool_name(name: &str) -> Result<(), SchemaError> {
    if name.is_empty() {
        return Err(SchemaError::EmptyToolName);
    }
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_chars || name.len() > MAX_TOOL_NAME_LEN {
        return Err(SchemaError::InvalidToolName(name.into()));
    }
    Ok(())
}

/// Process-wide cache of derived schemas, keyed by tool name.
///
/// Entries are write-once. A lookup for a name that is already present
/// returns the stored schema even if the tool now declares a different
/// signature: two distinct tools sharing a name collide. With
/// `with_collision_check(true)` such a mismatch is logged, never corrected.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<ToolSchema>>>,
    collision_check: bool,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive on cache hits and warn when the stored schema differs.
    pub fn with_collision_check(mut self, enabled: bool) -> Self {
        self.collision_check = enabled;
        self
    }

    /// Return the cached schema for `tool`, deriving and storing it on first use.
    pub fn get_or_create(&self, tool: &dyn Tool) -> Result<Arc<ToolSchema>, SchemaError> {
        if let Some(existing) = self.get(tool.name()) {
            if self.collision_check {
                self.check_collision(tool, &existing);
            }
            return Ok(existing);
        }

        // Derive outside the lock; a failed derivation is never cached.
        let derived = Arc::new(derive_schema(tool)?);

        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        let stored = schemas
            .entry(derived.name.clone())
            .or_insert_with(|| {
                debug!(tool = %derived.name, "Derived tool schema");
                Arc::clone(&derived)
            });
        Ok(Arc::clone(stored))
    }

    /// Look up a schema without deriving.
    pub fn get(&self, name: &str) -> Option<Arc<ToolSchema>> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached tool names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// All cached schemas, sorted by name.
    pub fn schemas(&self) -> Vec<Arc<ToolSchema>> {
        let mut all: Vec<Arc<ToolSchema>> = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    fn check_collision(&self, tool: &dyn Tool, existing: &ToolSchema) {
        match derive_schema(tool) {
            Ok(fresh) if fresh != *existing => warn!(
                tool = %existing.name,
                "Tool signature differs from the cached schema; keeping the first one"
            ),
            Ok(_) => {}
            Err(e) => warn!(tool = %existing.name, error = %e, "Tool signature no longer derives"),
        }
    }
}
