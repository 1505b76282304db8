use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::DdlResult;
use crate::schema_model::SchemaModel;
use crate::types::FieldDecl;

/// Serialized schema model, as handed over by the XML Schema parser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub simple_types: Vec<SimpleTypeDecl>,
    #[serde(default)]
    pub complex_types: Vec<EntityDecl>,
    #[serde(default)]
    pub elements: Vec<EntityDecl>,
}

/// Enumerated simple type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTypeDecl {
    pub name: String,
    #[serde(default)]
    pub enumerations: Vec<String>,
}

/// Complex type or top-level element with its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDecl {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl EntityDecl {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDecl>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

impl SchemaDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> DdlResult<Self> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        debug!(
            simple_types = document.simple_types.len(),
            complex_types = document.complex_types.len(),
            elements = document.elements.len(),
            "Parsed schema document"
        );
        Ok(document)
    }

    pub fn from_path(path: impl AsRef<Path>) -> DdlResult<Self> {
        let path = path.as_ref();
        info!("Loading schema model from {:?}", path);
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_simple_type(mut self, name: &str, literals: &[&str]) -> Self {
        self.simple_types.push(SimpleTypeDecl {
            name: name.to_string(),
            enumerations: literals.iter().map(|l| l.to_string()).collect(),
        });
        self
    }

    pub fn with_complex_type(mut self, name: &str, fields: Vec<FieldDecl>) -> Self {
        self.complex_types.push(EntityDecl::new(name, fields));
        self
    }

    pub fn with_element(mut self, name: &str, fields: Vec<FieldDecl>) -> Self {
        self.elements.push(EntityDecl::new(name, fields));
        self
    }
}

impl SchemaModel for SchemaDocument {
    fn complex_types(&self) -> Vec<&str> {
        self.complex_types.iter().map(|c| c.name.as_str()).collect()
    }

    fn simple_types(&self) -> Vec<&str> {
        self.simple_types.iter().map(|s| s.name.as_str()).collect()
    }

    fn top_level_elements(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.name.as_str()).collect()
    }

    fn fields_of(&self, entity: &str) -> Option<&[FieldDecl]> {
        // complex types shadow elements, matching the generation order
        self.complex_types
            .iter()
            .chain(self.elements.iter())
            .find(|e| e.name == entity)
            .map(|e| e.fields.as_slice())
    }

    fn literals_of(&self, simple_type: &str) -> Option<&[String]> {
        self.simple_types
            .iter()
            .find(|s| s.name == simple_type)
            .map(|s| s.enumerations.as_slice())
    }

    fn is_simple_type(&self, name: &str) -> bool {
        self.simple_types.iter().any(|s| s.name == name)
    }

    fn is_complex_type(&self, name: &str) -> bool {
        self.complex_types.iter().any(|c| c.name == name)
    }
}
