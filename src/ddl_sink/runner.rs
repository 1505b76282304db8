use serde::Serialize;
use std::time::Instant;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::ddl_generator::{DdlGenerator, PlannedObject};
use crate::ddl_sink::DdlSink;
use crate::error::{DdlError, DdlResult};
use crate::schema_model::SchemaModel;
use crate::types::{Dialect, StatementKind};

/// What a completed run applied
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub dialect: Dialect,
    pub enum_types: usize,
    pub tables: usize,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn statements(&self) -> usize {
        self.enum_types + self.tables
    }

    pub fn summary(&self) -> String {
        format!(
            "{} statements applied ({} enum types, {} tables) for {} in {}ms",
            self.statements(),
            self.enum_types,
            self.tables,
            self.dialect,
            self.duration_ms
        )
    }
}

/// Generate every statement for `model` and submit each to `sink` as soon as
/// it is rendered.
///
/// Stops at the first generation or sink error; nothing is submitted after
/// it, and statements already applied stay applied.
pub async fn apply_schema<M, S>(generator: &DdlGenerator<'_>, model: &M, sink: &mut S) -> DdlResult<RunSummary>
where
    M: SchemaModel + ?Sized,
    S: DdlSink,
{
    let run_id = Uuid::new_v4();
    let span = info_span!("apply_schema", run_id = %run_id, dialect = %generator.dialect());
    run(generator, model, sink, run_id).instrument(span).await
}

async fn run<M, S>(generator: &DdlGenerator<'_>, model: &M, sink: &mut S, run_id: Uuid) -> DdlResult<RunSummary>
where
    M: SchemaModel + ?Sized,
    S: DdlSink,
{
    let start_time = Instant::now();
    let dialect = generator.dialect();
    let plan = generator.plan(model)?;
    info!("Applying {} statements", plan.len());

    let mut summary = RunSummary {
        run_id,
        dialect,
        enum_types: 0,
        tables: 0,
        duration_ms: 0,
    };

    for object in &plan {
        let statement = match generator.statement_for(model, object) {
            Ok(statement) => statement,
            Err(e) => {
                error!(
                    object = object.name(),
                    applied = summary.statements(),
                    "Generation failed; no further statements submitted"
                );
                return Err(e);
            }
        };

        if let Err(source) = sink.apply(&statement).await {
            error!(
                object = %statement.object,
                applied = summary.statements(),
                "Statement failed; schema is partially created"
            );
            return Err(DdlError::SinkFailure {
                dialect,
                object: object.name().to_string(),
                source,
            });
        }

        match statement.kind {
            StatementKind::CreateType => summary.enum_types += 1,
            StatementKind::CreateTable => summary.tables += 1,
        }
        info!(object = %statement.object, kind = ?statement.kind, "Applied statement");
    }

    sink.finish().await.map_err(|source| DdlError::SinkFailure {
        dialect,
        object: plan.last().map(PlannedObject::name).unwrap_or_default().to_string(),
        source,
    })?;

    summary.duration_ms = start_time.elapsed().as_millis() as u64;
    info!("{}", summary.summary());
    Ok(summary)
}
