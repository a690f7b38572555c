//! Swagger 2.0 adapter
//!
//! Swagger documents are accepted in JSON form only. Body parameters are
//! expanded into their schema's properties; `#/definitions/...` and
//! `#/parameters/...` references are resolved against the document.

use super::{
    merge_parameters, ContractAdapter, Dialect, EndpointDescriptor, ParameterDescriptor,
    ParameterLocation, DEFAULT_TYPE, METHOD_ORDER,
};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const DEFINITIONS: &str = "#/definitions/";
const PARAMETERS: &str = "#/parameters/";

const MAX_TYPE_DEPTH: usize = 32;

/// Swagger 2.0 contract adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct Swagger2Adapter;

impl ContractAdapter for Swagger2Adapter {
    fn dialect(&self) -> Dialect {
        Dialect::Swagger2
    }

    fn extract(&self, source: &str) -> Result<Vec<EndpointDescriptor>> {
        let doc: Document =
            serde_json::from_str(source).map_err(|e| Error::ContractParse(e.to_string()))?;
        if doc.swagger != "2.0" {
            return Err(Error::Schema(format!(
                "unsupported swagger version '{}'",
                doc.swagger
            )));
        }
        doc.endpoints()
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    swagger: String,
    #[serde(default, deserialize_with = "path_items")]
    paths: IndexMap<String, PathItem>,
    #[serde(default)]
    definitions: IndexMap<String, SchemaObject>,
    #[serde(default)]
    parameters: IndexMap<String, ParameterObject>,
}

#[derive(Debug, Deserialize)]
struct PathItem {
    get: Option<Operation>,
    put: Option<Operation>,
    post: Option<Operation>,
    delete: Option<Operation>,
    options: Option<Operation>,
    head: Option<Operation>,
    patch: Option<Operation>,
    #[serde(default)]
    parameters: Vec<ParameterObject>,
}

#[derive(Debug, Deserialize)]
struct Operation {
    #[serde(default)]
    parameters: Vec<ParameterObject>,
}

#[derive(Debug, Clone, Deserialize)]
struct ParameterObject {
    #[serde(rename = "$ref")]
    reference: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(rename = "in", default)]
    location: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type")]
    typ: Option<String>,
    items: Option<ItemsObject>,
    #[serde(rename = "enum", default)]
    enumeration: Vec<Value>,
    schema: Option<SchemaObject>,
}

/// `items` of a non-body parameter
#[derive(Debug, Clone, Deserialize)]
struct ItemsObject {
    #[serde(rename = "type")]
    typ: Option<String>,
    items: Option<Box<ItemsObject>>,
    #[serde(rename = "enum", default)]
    enumeration: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct SchemaObject {
    #[serde(rename = "$ref")]
    reference: Option<String>,
    #[serde(rename = "type")]
    typ: Option<TypeField>,
    items: Option<Box<SchemaObject>>,
    #[serde(default)]
    properties: IndexMap<String, SchemaObject>,
    #[serde(default)]
    required: Vec<String>,
    #[serde(rename = "enum", default)]
    enumeration: Vec<Value>,
    #[serde(default)]
    description: Option<String>,
}

/// `type` may be a single name or a list of names
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TypeField {
    One(String),
    Many(Vec<String>),
}

impl TypeField {
    fn primary(&self) -> Option<&str> {
        match self {
            TypeField::One(t) => Some(t.as_str()),
            TypeField::Many(ts) => ts.first().map(String::as_str),
        }
    }
}

/// Paths object entries, skipping `x-` vendor extensions
fn path_items<'de, D>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, PathItem>, D::Error>
where
    D: Deserializer<'de>,
{
    IndexMap::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .filter(|(path, _)| !path.starts_with("x-"))
        .map(|(path, item)| {
            PathItem::deserialize(item)
                .map(|item| (path, item))
                .map_err(<D::Error as de::Error>::custom)
        })
        .collect()
}

impl PathItem {
    fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        let slots = [
            self.get.as_ref(),
            self.put.as_ref(),
            self.post.as_ref(),
            self.delete.as_ref(),
            self.options.as_ref(),
            self.head.as_ref(),
            self.patch.as_ref(),
        ];
        METHOD_ORDER
            .into_iter()
            .zip(slots)
            .filter_map(|(method, op)| op.map(|op| (method, op)))
    }
}

impl Document {
    fn endpoints(&self) -> Result<Vec<EndpointDescriptor>> {
        let mut out = Vec::new();

        for (path, item) in &self.paths {
            let shared = self.resolve_parameters(&item.parameters)?;

            for (method, operation) in item.operations() {
                let own = self.resolve_parameters(&operation.parameters)?;

                let (own_body, own_plain): (Vec<_>, Vec<_>) =
                    own.into_iter().partition(|p| p.location == "body");
                let (shared_body, shared_plain): (Vec<_>, Vec<_>) =
                    shared.iter().cloned().partition(|p| p.location == "body");

                let mut parameters = merge_parameters(
                    self.plain_parameters(&own_plain)?,
                    self.plain_parameters(&shared_plain)?,
                );
                for body in own_body.iter().chain(shared_body.iter()) {
                    parameters.extend(self.body_parameters(body)?);
                }

                debug!(path = %path, method, parameters = parameters.len(), "extracted operation");
                out.push(EndpointDescriptor {
                    path: path.clone(),
                    http_method: method.to_uppercase(),
                    parameters,
                });
            }
        }

        Ok(out)
    }

    fn resolve_parameters(&self, params: &[ParameterObject]) -> Result<Vec<ParameterObject>> {
        params
            .iter()
            .map(|p| match &p.reference {
                Some(reference) => reference
                    .strip_prefix(PARAMETERS)
                    .and_then(|name| self.parameters.get(name))
                    .filter(|resolved| resolved.reference.is_none())
                    .cloned()
                    .ok_or_else(|| unresolved(reference)),
                None => Ok(p.clone()),
            })
            .collect()
    }

    fn plain_parameters(&self, params: &[ParameterObject]) -> Result<Vec<ParameterDescriptor>> {
        params
            .iter()
            .map(|p| {
                let location = ParameterLocation::parse(&p.location).ok_or_else(|| {
                    Error::ContractParse(format!(
                        "parameter '{}' has unknown location '{}'",
                        p.name, p.location
                    ))
                })?;
                Ok(ParameterDescriptor {
                    name: p.name.clone(),
                    location,
                    required: p.required,
                    declared_type: parameter_type(p),
                    enum_values: parameter_enum(p),
                    description: p.description.clone().unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Expand a body parameter into its schema's properties, or a single
    /// `object` parameter when the schema has none.
    fn body_parameters(&self, param: &ParameterObject) -> Result<Vec<ParameterDescriptor>> {
        let mut out = Vec::new();
        if let Some(schema) = &param.schema {
            let schema = self.resolve(schema)?;
            for (name, prop) in &schema.properties {
                let prop = self.resolve(prop)?;
                out.push(ParameterDescriptor {
                    name: name.clone(),
                    location: ParameterLocation::Body,
                    required: schema.required.contains(name),
                    declared_type: self.schema_type(prop, 0)?,
                    enum_values: prop.enumeration.clone(),
                    description: prop.description.clone().unwrap_or_default(),
                });
            }
        }

        if out.is_empty() {
            out.push(ParameterDescriptor {
                name: param.name.clone(),
                location: ParameterLocation::Body,
                required: param.required,
                declared_type: "object".to_string(),
                enum_values: Vec::new(),
                description: param.description.clone().unwrap_or_default(),
            });
        }
        Ok(out)
    }

    fn resolve<'a>(&'a self, schema: &'a SchemaObject) -> Result<&'a SchemaObject> {
        let mut current = schema;
        let mut seen: Vec<&'a str> = Vec::new();
        while let Some(reference) = &current.reference {
            if seen.contains(&reference.as_str()) {
                return Err(Error::Schema(format!("circular reference '{}'", reference)));
            }
            seen.push(reference.as_str());
            current = reference
                .strip_prefix(DEFINITIONS)
                .and_then(|name| self.definitions.get(name))
                .ok_or_else(|| unresolved(reference))?;
        }
        Ok(current)
    }

    fn schema_type(&self, schema: &SchemaObject, depth: usize) -> Result<String> {
        if depth > MAX_TYPE_DEPTH {
            return Err(Error::Schema(
                "array item types nest too deeply (circular reference?)".to_string(),
            ));
        }

        let tag = match schema.typ.as_ref().and_then(TypeField::primary) {
            Some("array") => match &schema.items {
                Some(items) => {
                    let items = self.resolve(items)?;
                    format!("array[{}]", self.schema_type(items, depth + 1)?)
                }
                None => "array".to_string(),
            },
            Some(other) => other.to_string(),
            None => DEFAULT_TYPE.to_string(),
        };
        Ok(tag)
    }
}

fn parameter_type(param: &ParameterObject) -> String {
    match param.typ.as_deref() {
        Some("array") => match &param.items {
            Some(items) => format!("array[{}]", items_type(items)),
            None => "array".to_string(),
        },
        Some(other) => other.to_string(),
        None => DEFAULT_TYPE.to_string(),
    }
}

fn items_type(items: &ItemsObject) -> String {
    match items.typ.as_deref() {
        Some("array") => match &items.items {
            Some(inner) => format!("array[{}]", items_type(inner)),
            None => "array".to_string(),
        },
        Some(other) => other.to_string(),
        None => DEFAULT_TYPE.to_string(),
    }
}

/// Parameter enum, falling back to the enum of its array items
fn parameter_enum(param: &ParameterObject) -> Vec<Value> {
    if !param.enumeration.is_empty() {
        return param.enumeration.clone();
    }
    param
        .items
        .as_ref()
        .map(|items| items.enumeration.clone())
        .unwrap_or_default()
}

fn unresolved(reference: &str) -> Error {
    Error::Schema(format!("unresolved reference '{}'", reference))
}
