use std::collections::HashSet;
use tracing::{debug, info};

use crate::ddl_generator::enum_synthesizer;
use crate::ddl_generator::table_generator::TableGenerator;
use crate::ddl_generator::type_registry::TypeMapRegistry;
use crate::error::{DdlError, DdlResult};
use crate::schema_model::SchemaModel;
use crate::types::{Dialect, EntityKind, Statement, StatementKind};

/// One object the run will create, in submission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedObject {
    EnumType(String),
    Table { name: String, kind: EntityKind },
}

impl PlannedObject {
    pub fn name(&self) -> &str {
        match self {
            PlannedObject::EnumType(name) => name,
            PlannedObject::Table { name, .. } => name,
        }
    }

    pub fn statement_kind(&self) -> StatementKind {
        match self {
            PlannedObject::EnumType(_) => StatementKind::CreateType,
            PlannedObject::Table { .. } => StatementKind::CreateTable,
        }
    }
}

/// Generation context: the target dialect and the type map it renders with.
pub struct DdlGenerator<'a> {
    dialect: Dialect,
    registry: &'a TypeMapRegistry,
}

impl<'a> DdlGenerator<'a> {
    /// Fails with `UnknownDialect` if the registry has no entry for `dialect`
    pub fn new(dialect: Dialect, registry: &'a TypeMapRegistry) -> DdlResult<Self> {
        registry.ensure_dialect(dialect)?;
        Ok(Self { dialect, registry })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn registry(&self) -> &TypeMapRegistry {
        self.registry
    }

    /// Validate the model and list the objects to create.
    ///
    /// Enum types come first (postgres only), then complex types, then
    /// top-level elements, each in model order. Nothing is rendered here.
    pub fn plan<M: SchemaModel + ?Sized>(&self, model: &M) -> DdlResult<Vec<PlannedObject>> {
        let simple_types = model.simple_types();
        let complex_types = model.complex_types();
        let elements = model.top_level_elements();

        let mut seen_types = HashSet::new();
        for simple in &simple_types {
            if !seen_types.insert(*simple) {
                return Err(DdlError::DuplicateEntityName {
                    name: simple.to_string(),
                });
            }
            let literals = model.literals_of(simple).unwrap_or_default();
            enum_synthesizer::normalize_literals(simple, literals, self.dialect)?;
        }

        let mut seen_tables = HashSet::new();
        for name in complex_types.iter().chain(elements.iter()) {
            if !seen_tables.insert(*name) {
                return Err(DdlError::DuplicateEntityName {
                    name: name.to_string(),
                });
            }
        }

        let mut plan = Vec::with_capacity(simple_types.len() + complex_types.len() + elements.len());
        if self.dialect.has_enum_types() {
            plan.extend(simple_types.iter().map(|s| PlannedObject::EnumType(s.to_string())));
        }
        let enum_types = plan.len();
        plan.extend(complex_types.iter().map(|c| PlannedObject::Table {
            name: c.to_string(),
            kind: EntityKind::ComplexType,
        }));
        plan.extend(elements.iter().map(|e| PlannedObject::Table {
            name: e.to_string(),
            kind: EntityKind::Element,
        }));

        info!(
            dialect = %self.dialect,
            enum_types,
            complex_types = complex_types.len(),
            elements = elements.len(),
            "Planned schema generation"
        );
        Ok(plan)
    }

    /// Render the statement for one planned object
    pub fn statement_for<M: SchemaModel + ?Sized>(&self, model: &M, object: &PlannedObject) -> DdlResult<Statement> {
        match object {
            PlannedObject::EnumType(name) => self.enum_statement(model, name),
            PlannedObject::Table { name, kind } => self.table_statement(model, name, *kind),
        }
    }

    pub fn enum_statement<M: SchemaModel + ?Sized>(&self, model: &M, simple_type: &str) -> DdlResult<Statement> {
        let literals = model.literals_of(simple_type).unwrap_or_default();
        let statement = enum_synthesizer::create_type_statement(simple_type, literals, self.dialect)
            .map_err(|e| e.in_entity(simple_type))?;
        debug!(simple_type, "Generated enum type");
        Ok(statement)
    }

    pub fn table_statement<M: SchemaModel + ?Sized>(&self, model: &M, name: &str, kind: EntityKind) -> DdlResult<Statement> {
        let table = TableGenerator::new(self.dialect, self.registry).generate(model, name, kind)?;
        Ok(Statement {
            kind: StatementKind::CreateTable,
            object: name.to_string(),
            sql: table.to_string(),
        })
    }

    /// Every statement for the model, in submission order
    pub fn generate_all<M: SchemaModel + ?Sized>(&self, model: &M) -> DdlResult<Vec<Statement>> {
        self.plan(model)?
            .iter()
            .map(|object| self.statement_for(model, object))
            .collect()
    }
}
