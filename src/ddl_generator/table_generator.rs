use tracing::{debug, trace};

use crate::ddl_generator::enum_synthesizer;
use crate::ddl_generator::type_registry::{keys, TypeMapRegistry};
use crate::error::{DdlError, DdlResult};
use crate::schema_model::SchemaModel;
use crate::types::{Dialect, EntityKind, FieldDecl, TableSpec, TypeRef};

/// Entity that does not get a `vip_id` column
pub const SOURCE_ENTITY: &str = "source";

/// Entity that does not get an `election_id` column
pub const CONTEST_ENTITY: &str = "contest";

/// Builds the CREATE TABLE definition for one entity
pub struct TableGenerator<'a> {
    dialect: Dialect,
    registry: &'a TypeMapRegistry,
}

impl<'a> TableGenerator<'a> {
    pub fn new(dialect: Dialect, registry: &'a TypeMapRegistry) -> Self {
        Self { dialect, registry }
    }

    fn token(&self, key: &str) -> DdlResult<&'a str> {
        self.registry.lookup(self.dialect, key)
    }

    /// Table for `name`, with the field list taken from the model
    pub fn generate<M: SchemaModel + ?Sized>(&self, model: &M, name: &str, kind: EntityKind) -> DdlResult<TableSpec> {
        let fields = model.fields_of(name).ok_or_else(|| DdlError::UnknownEntity {
            entity: name.to_string(),
        })?;
        self.generate_with_fields(model, name, kind, fields)
            .map_err(|e| e.in_entity(name))
    }

    pub fn generate_with_fields<M: SchemaModel + ?Sized>(
        &self,
        model: &M,
        name: &str,
        kind: EntityKind,
        fields: &[FieldDecl],
    ) -> DdlResult<TableSpec> {
        let mut table = TableSpec::new(name);

        table.add_column("id", self.token(keys::ID)?);
        if kind == EntityKind::Element {
            table.add_column("normalized_id", self.token(keys::INTEGER)?);
            table.add_column("received_id", self.token(keys::INTEGER)?);
        }
        // exact, case-sensitive comparison
        if name != SOURCE_ENTITY {
            table.add_column("vip_id", self.token(keys::INT)?);
        }
        if name != CONTEST_ENTITY {
            table.add_column("election_id", self.token(keys::INT)?);
        }

        for field in fields {
            if field.is_placeholder() {
                trace!(entity = name, "Skipping placeholder field");
                continue;
            }
            self.add_field(model, name, field, &mut table)?;
        }

        if kind == EntityKind::Element {
            table.add_column("is_used", self.token(keys::BOOLEAN)?);
        }
        table.add_column("last_updated", self.token(keys::TIMESTAMP)?);
        table.add_column("date_created", self.token(keys::TIMESTAMP)?);

        debug!(
            table = name,
            dialect = %self.dialect,
            columns = table.columns.len(),
            "Generated table definition"
        );
        Ok(table)
    }

    fn add_field<M: SchemaModel + ?Sized>(
        &self,
        model: &M,
        entity: &str,
        field: &FieldDecl,
        table: &mut TableSpec,
    ) -> DdlResult<()> {
        match &field.type_ref {
            TypeRef::Primitive(key) => {
                table.add_column(field.name.as_str(), self.token(key)?);
            }
            TypeRef::Named(type_name) if model.is_simple_type(type_name) => {
                let literals = model.literals_of(type_name).unwrap_or_default();
                let sql_type = enum_synthesizer::column_type(type_name, literals, self.dialect)?;
                table.add_column(field.name.as_str(), sql_type);
            }
            TypeRef::Named(type_name) if model.is_complex_type(type_name) => {
                // reference by naming convention only, no constraint is emitted
                table.add_column(format!("{}_id", field.name), self.token(keys::INTEGER)?);
            }
            TypeRef::Named(type_name) => {
                return Err(DdlError::UnknownTypeReference {
                    entity: entity.to_string(),
                    field: field.name.clone(),
                    type_ref: type_name.clone(),
                });
            }
        }
        Ok(())
    }
}
