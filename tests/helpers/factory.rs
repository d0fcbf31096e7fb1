pub use super::factories::{LabelFactory, NodeTableFactory, RewriteEngineFactory};

pub struct Factory;

impl Factory {
    pub fn label() -> LabelFactory {
        LabelFactory::new()
    }

    pub fn node_table() -> NodeTableFactory {
        NodeTableFactory::new()
    }

    pub fn rewrite_engine() -> RewriteEngineFactory {
        RewriteEngineFactory::new()
    }
}
