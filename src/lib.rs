pub mod config;
pub mod ddl_generator;
pub mod ddl_sink;
pub mod error;
pub mod schema_model;
pub mod types;
