// Read-only view of a parsed XML Schema
pub mod document;


pub use document::*;

use crate::types::FieldDecl;

/// The parsed schema the generator walks.
///
/// Implementations hand out names in schema order; the generator never
/// mutates the model.
pub trait SchemaModel {
    /// Complex type names, in declaration order
    fn complex_types(&self) -> Vec<&str>;

    /// Enumerated simple type names, in declaration order
    fn simple_types(&self) -> Vec<&str>;

    /// Top-level element names, in declaration order
    fn top_level_elements(&self) -> Vec<&str>;

    /// Declared fields of a complex type or element
    fn fields_of(&self, entity: &str) -> Option<&[FieldDecl]>;

    /// Enumeration literals of a simple type, as written in the schema
    fn literals_of(&self, simple_type: &str) -> Option<&[String]>;

    fn is_simple_type(&self, name: &str) -> bool {
        self.simple_types().contains(&name)
    }

    fn is_complex_type(&self, name: &str) -> bool {
        self.complex_types().contains(&name)
    }
}
