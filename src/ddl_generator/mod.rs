// Schema-to-DDL translation
pub mod enum_synthesizer;
pub mod generator;
pub mod table_generator;
pub mod type_registry;


pub use generator::*;
pub use table_generator::TableGenerator;
pub use type_registry::TypeMapRegistry;
