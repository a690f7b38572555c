//! OpenAPI 3.0 adapter
//!
//! Documents are deserialized with `openapiv3` (JSON or YAML). Internal
//! `$ref`s into `#/components/{schemas,parameters,requestBodies}` are
//! followed; anything that does not resolve is a schema error.
//!
//! Operations without `responses` are accepted: an empty map is filled in
//! before typed deserialization, since responses play no part in case
//! derivation.

use super::{
    merge_parameters, ContractAdapter, Dialect, EndpointDescriptor, ParameterDescriptor,
    ParameterLocation, DEFAULT_TYPE, METHOD_ORDER,
};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use openapiv3::{
    Components, OpenAPI, Operation, Parameter, ParameterData, ParameterSchemaOrContent, PathItem,
    ReferenceOr, RequestBody, Schema, SchemaKind, Type,
};
use serde_json::{Map, Value};
use tracing::debug;

const SCHEMAS: &str = "#/components/schemas/";
const PARAMETERS: &str = "#/components/parameters/";
const REQUEST_BODIES: &str = "#/components/requestBodies/";

/// Array nesting limit when building `array[...]` type tags
const MAX_TYPE_DEPTH: usize = 32;

/// OpenAPI 3.0 contract adapter
#[derive(Debug, Clone)]
pub struct OpenApi3Adapter {
    body_media_types: Vec<String>,
}

impl OpenApi3Adapter {
    pub fn new(body_media_types: Vec<String>) -> Self {
        Self { body_media_types }
    }
}

impl Default for OpenApi3Adapter {
    fn default() -> Self {
        Self::new(vec!["application/json".to_string()])
    }
}

impl ContractAdapter for OpenApi3Adapter {
    fn dialect(&self) -> Dialect {
        Dialect::OpenApi3
    }

    fn extract(&self, source: &str) -> Result<Vec<EndpointDescriptor>> {
        let doc = parse_document(source)?;
        Extractor {
            doc: &doc,
            body_media_types: &self.body_media_types,
        }
        .endpoints()
    }
}

fn parse_document(source: &str) -> Result<OpenAPI> {
    let mut raw: Value = if source.trim_start().starts_with('{') {
        serde_json::from_str(source).map_err(|e| Error::ContractParse(e.to_string()))?
    } else {
        serde_norway::from_str(source).map_err(|e| Error::ContractParse(e.to_string()))?
    };
    normalize(&mut raw);
    let doc: OpenAPI =
        serde_json::from_value(raw).map_err(|e| Error::ContractParse(e.to_string()))?;

    if !doc.openapi.starts_with("3.") {
        return Err(Error::Schema(format!(
            "unsupported openapi version '{}'",
            doc.openapi
        )));
    }
    Ok(doc)
}

/// Fill in what `openapiv3` requires but extraction never reads
///
/// YAML scalars such as `openapi: 3.0` or `version: 1.0` arrive as numbers
/// once the document is a `Value`; they are turned back into strings.
fn normalize(raw: &mut Value) {
    let Some(root) = raw.as_object_mut() else {
        return;
    };
    stringify(root.get_mut("openapi"));
    stringify(root.get_mut("info").and_then(|info| info.get_mut("version")));

    let Some(paths) = root.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };
    for item in paths.values_mut().filter_map(Value::as_object_mut) {
        for method in METHOD_ORDER {
            if let Some(operation) = item.get_mut(method).and_then(Value::as_object_mut) {
                operation
                    .entry("responses")
                    .or_insert_with(|| Value::Object(Map::new()));
            }
        }
    }
}

fn stringify(value: Option<&mut Value>) {
    if let Some(value) = value {
        if let Some(text) = value.as_number().map(|n| n.to_string()) {
            *value = Value::String(text);
        }
    }
}

struct Extractor<'a> {
    doc: &'a OpenAPI,
    body_media_types: &'a [String],
}

impl<'a> Extractor<'a> {
    fn components(&self) -> Option<&'a Components> {
        self.doc.components.as_ref()
    }

    fn endpoints(&self) -> Result<Vec<EndpointDescriptor>> {
        let mut out = Vec::new();

        for (path, item) in self.doc.paths.paths.iter() {
            let item = match item {
                ReferenceOr::Item(item) => item,
                ReferenceOr::Reference { reference } => {
                    return Err(Error::Schema(format!(
                        "path item reference '{}' for {} is not supported",
                        reference, path
                    )))
                }
            };

            let shared = self.parameters(&item.parameters)?;
            for (method, operation) in operations(item) {
                let mut parameters =
                    merge_parameters(self.parameters(&operation.parameters)?, shared.clone());
                if let Some(body) = &operation.request_body {
                    let body = follow(body, REQUEST_BODIES, self.components().map(|c| &c.request_bodies))?;
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

    fn parameters(&self, refs: &'a [ReferenceOr<Parameter>]) -> Result<Vec<ParameterDescriptor>> {
        refs.iter()
            .map(|r| {
                let param = follow(r, PARAMETERS, self.components().map(|c| &c.parameters))?;
                self.parameter(param)
            })
            .collect()
    }

    fn parameter(&self, param: &'a Parameter) -> Result<ParameterDescriptor> {
        let (data, location) = parameter_data(param);
        let schema = match &data.format {
            ParameterSchemaOrContent::Schema(schema) => Some(self.schema(schema)?),
            ParameterSchemaOrContent::Content(content) => match content.values().next() {
                Some(media) => media.schema.as_ref().map(|s| self.schema(s)).transpose()?,
                None => None,
            },
        };

        Ok(ParameterDescriptor {
            name: data.name.clone(),
            location,
            required: data.required,
            declared_type: match schema {
                Some(schema) => self.type_tag(schema, 0)?,
                None => DEFAULT_TYPE.to_string(),
            },
            enum_values: schema.map(enum_values).unwrap_or_default(),
            description: data.description.clone().unwrap_or_default(),
        })
    }

    /// Expand the properties of the first matching body media type
    fn body_parameters(&self, body: &'a RequestBody) -> Result<Vec<ParameterDescriptor>> {
        let media = self
            .body_media_types
            .iter()
            .find_map(|mt| body.content.get(mt.as_str()));
        let Some(schema) = media.and_then(|m| m.schema.as_ref()) else {
            return Ok(Vec::new());
        };

        let schema = self.schema(schema)?;
        let (properties, required) = match &schema.schema_kind {
            SchemaKind::Type(Type::Object(obj)) => (&obj.properties, &obj.required),
            SchemaKind::Any(any) => (&any.properties, &any.required),
            _ => return Ok(Vec::new()),
        };

        properties
            .iter()
            .map(|(name, prop)| {
                let prop = self.boxed_schema(prop)?;
                Ok(ParameterDescriptor {
                    name: name.clone(),
                    location: ParameterLocation::Body,
                    required: required.contains(name),
                    declared_type: self.type_tag(prop, 0)?,
                    enum_values: enum_values(prop),
                    description: prop.schema_data.description.clone().unwrap_or_default(),
                })
            })
            .collect()
    }

    fn schema(&self, r: &'a ReferenceOr<Schema>) -> Result<&'a Schema> {
        follow(r, SCHEMAS, self.components().map(|c| &c.schemas))
    }

    fn boxed_schema(&self, r: &'a ReferenceOr<Box<Schema>>) -> Result<&'a Schema> {
        match r {
            ReferenceOr::Item(schema) => Ok(schema.as_ref()),
            ReferenceOr::Reference { reference } => {
                let named = lookup(reference, SCHEMAS, self.components().map(|c| &c.schemas))?;
                follow(named, SCHEMAS, self.components().map(|c| &c.schemas))
            }
        }
    }

    fn type_tag(&self, schema: &'a Schema, depth: usize) -> Result<String> {
        if depth > MAX_TYPE_DEPTH {
            return Err(Error::Schema(
                "array item types nest too deeply (circular reference?)".to_string(),
            ));
        }

        let tag = match &schema.schema_kind {
            SchemaKind::Type(Type::Array(array)) => match &array.items {
                Some(items) => {
                    let items = self.boxed_schema(items)?;
                    format!("array[{}]", self.type_tag(items, depth + 1)?)
                }
                None => "array".to_string(),
            },
            SchemaKind::Type(Type::Object(_)) => "object".to_string(),
            SchemaKind::Type(Type::String(_)) => "string".to_string(),
            SchemaKind::Type(Type::Integer(_)) => "integer".to_string(),
            SchemaKind::Type(Type::Number(_)) => "number".to_string(),
            SchemaKind::Type(Type::Boolean { .. }) => "boolean".to_string(),
            SchemaKind::Any(any) => match (any.typ.as_deref(), &any.items) {
                (Some("array"), Some(items)) => {
                    let items = self.boxed_schema(items)?;
                    format!("array[{}]", self.type_tag(items, depth + 1)?)
                }
                (Some(typ), _) => typ.to_string(),
                (None, _) => DEFAULT_TYPE.to_string(),
            },
            _ => DEFAULT_TYPE.to_string(),
        };
        Ok(tag)
    }
}

fn operations(item: &PathItem) -> impl Iterator<Item = (&'static str, &Operation)> {
    let slots = [
        item.get.as_ref(),
        item.put.as_ref(),
        item.post.as_ref(),
        item.delete.as_ref(),
        item.options.as_ref(),
        item.head.as_ref(),
        item.patch.as_ref(),
        item.trace.as_ref(),
    ];
    METHOD_ORDER
        .into_iter()
        .zip(slots)
        .filter_map(|(method, op)| op.map(|op| (method, op)))
}

fn parameter_data(param: &Parameter) -> (&ParameterData, ParameterLocation) {
    match param {
        Parameter::Query { parameter_data, .. } => (parameter_data, ParameterLocation::Query),
        Parameter::Header { parameter_data, .. } => (parameter_data, ParameterLocation::Header),
        Parameter::Path { parameter_data, .. } => (parameter_data, ParameterLocation::Path),
        Parameter::Cookie { parameter_data, .. } => (parameter_data, ParameterLocation::Cookie),
    }
}

fn enum_values(schema: &Schema) -> Vec<Value> {
    match &schema.schema_kind {
        SchemaKind::Type(Type::String(s)) => s
            .enumeration
            .iter()
            .map(|v| v.clone().map_or(Value::Null, Value::String))
            .collect(),
        SchemaKind::Type(Type::Integer(i)) => i
            .enumeration
            .iter()
            .map(|v| v.map_or(Value::Null, Value::from))
            .collect(),
        SchemaKind::Type(Type::Number(n)) => n
            .enumeration
            .iter()
            .map(|v| v.map_or(Value::Null, Value::from))
            .collect(),
        SchemaKind::Type(Type::Boolean(b)) => b
            .enumeration
            .iter()
            .map(|v| v.map_or(Value::Null, Value::Bool))
            .collect(),
        SchemaKind::Any(any) => any.enumeration.clone(),
        _ => Vec::new(),
    }
}

/// Follow a chain of references within one component table
fn follow<'a, T>(
    r: &'a ReferenceOr<T>,
    prefix: &str,
    table: Option<&'a IndexMap<String, ReferenceOr<T>>>,
) -> Result<&'a T> {
    let mut current = r;
    let mut seen: Vec<&'a str> = Vec::new();
    loop {
        match current {
            ReferenceOr::Item(item) => return Ok(item),
            ReferenceOr::Reference { reference } => {
                if seen.contains(&reference.as_str()) {
                    return Err(Error::Schema(format!("circular reference '{}'", reference)));
                }
                seen.push(reference.as_str());
                current = lookup(reference, prefix, table)?;
            }
        }
    }
}

fn lookup<'a, T>(
    reference: &str,
    prefix: &str,
    table: Option<&'a IndexMap<String, ReferenceOr<T>>>,
) -> Result<&'a ReferenceOr<T>> {
    reference
        .strip_prefix(prefix)
        .and_then(|name| table.and_then(|t| t.get(name)))
        .ok_or_else(|| Error::Schema(format!("unresolved reference '{}'", reference)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(yaml: &str) -> Result<Vec<EndpointDescriptor>> {
        OpenApi3Adapter::default().extract(yaml)
    }

    const USERS: &str = r#"
openapi: 3.0.0
info:
  title: Users
  version: "1.0"
paths:
  /users/{id}:
    parameters:
      - name: X-Trace
        in: header
        schema:
          type: string
    get:
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
        - name: status
          in: query
          schema:
            type: string
            enum: [active, inactive]
    put:
      parameters:
        - $ref: '#/components/parameters/UserId'
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/User'
components:
  parameters:
    UserId:
      name: id
      in: path
      required: true
      schema:
        type: integer
  schemas:
    User:
      type: object
      required: [name]
      properties:
        name:
          type: string
          description: Display name
        tags:
          type: array
          items:
            type: string
        role:
          $ref: '#/components/schemas/Role'
    Role:
      type: string
      enum: [admin, member]
"#;

    #[test]
    fn test_extracts_operations_in_method_order() {
        let endpoints = extract(USERS).unwrap();
        let methods: Vec<_> = endpoints.iter().map(|e| e.http_method.as_str()).collect();
        assert_eq!(methods, vec!["GET", "PUT"]);
        assert!(endpoints.iter().all(|e| e.path == "/users/{id}"));
    }

    #[test]
    fn test_query_enum_and_path_level_parameter() {
        let endpoints = extract(USERS).unwrap();
        let get = &endpoints[0];
        let names: Vec<_> = get.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "status", "X-Trace"]);

        let status = &get.parameters[1];
        assert_eq!(status.location, ParameterLocation::Query);
        assert_eq!(status.enum_values, vec![json!("active"), json!("inactive")]);
        assert_eq!(get.parameters[0].declared_type, "integer");
        assert!(get.parameters[0].required);
    }

    #[test]
    fn test_body_properties_expand_with_refs() {
        let endpoints = extract(USERS).unwrap();
        let put = &endpoints[1];
        let body: Vec<_> = put
            .parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Body)
            .collect();

        assert_eq!(body.len(), 3);
        assert_eq!(body[0].name, "name");
        assert!(body[0].required);
        assert_eq!(body[0].description, "Display name");
        assert_eq!(body[1].declared_type, "array[string]");
        assert!(!body[1].required);
        assert_eq!(body[2].enum_values, vec![json!("admin"), json!("member")]);
    }

    #[test]
    fn test_dangling_reference_is_schema_error() {
        let doc = r#"
openapi: 3.0.0
info: {title: t, version: "1"}
paths:
  /a:
    get:
      parameters:
        - $ref: '#/components/parameters/Missing'
"#;
        assert!(matches!(extract(doc), Err(Error::Schema(_))));
    }

    #[test]
    fn test_missing_schema_defaults_to_string() {
        let doc = r#"
openapi: 3.0.0
info: {title: t, version: "1"}
paths:
  /a:
    get:
      parameters:
        - name: q
          in: query
          content:
            text/plain: {}
"#;
        let endpoints = extract(doc).unwrap();
        assert_eq!(endpoints[0].parameters[0].declared_type, "string");
    }

    #[test]
    fn test_rejects_non_3_version() {
        let doc = r#"{"openapi": "2.5", "info": {"title": "t", "version": "1"}, "paths": {}}"#;
        assert!(matches!(extract(doc), Err(Error::Schema(_))));
    }

    #[test]
    fn test_unparseable_document_is_parse_error() {
        assert!(matches!(
            extract("openapi: [unterminated"),
            Err(Error::ContractParse(_))
        ));
    }

    #[test]
    fn test_responses_are_optional() {
        let without = r#"
openapi: 3.0
info: {title: t, version: 1.0}
paths:
  /a:
    get:
      parameters:
        - name: q
          in: query
          schema: {type: integer}
"#;
        let with = r#"
openapi: 3.0.3
info: {title: t, version: "1.0"}
paths:
  /a:
    get:
      parameters:
        - name: q
          in: query
          schema: {type: integer}
      responses:
        200:
          description: ok
"#;
        assert_eq!(extract(without).unwrap(), extract(with).unwrap());
        assert_eq!(extract(with).unwrap()[0].parameters[0].declared_type, "integer");
    }

    #[test]
    fn test_boolean_enum_is_kept() {
        let doc = r#"
openapi: 3.0.0
info: {title: t, version: "1"}
paths:
  /flags:
    get:
      parameters:
        - name: on
          in: query
          schema:
            type: boolean
            enum: [true]
      responses: {}
"#;
        let endpoints = extract(doc).unwrap();
        let on = &endpoints[0].parameters[0];
        assert_eq!(on.declared_type, "boolean");
        assert_eq!(on.enum_values, vec![json!(true)]);
    }

    #[test]
    fn test_loose_array_schema_keeps_item_type() {
        let doc = r#"
openapi: 3.0.0
info: {title: t, version: "1"}
paths:
  /a:
    get:
      parameters:
        - name: ids
          in: query
          schema:
            type: array
            minLength: 2
            items:
              type: integer
        - name: refs
          in: query
          schema:
            type: array
            minLength: 1
            items:
              $ref: '#/components/schemas/Code'
      responses: {}
components:
  schemas:
    Code:
      type: string
"#;
        let endpoints = extract(doc).unwrap();
        assert_eq!(endpoints[0].parameters[0].declared_type, "array[integer]");
        assert_eq!(endpoints[0].parameters[1].declared_type, "array[string]");
    }
}
