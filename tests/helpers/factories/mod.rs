pub mod label_factory;
pub mod node_table_factory;
pub mod rewrite_engine_factory;

pub use label_factory::LabelFactory;
pub use node_table_factory::NodeTableFactory;
pub use rewrite_engine_factory::RewriteEngineFactory;
