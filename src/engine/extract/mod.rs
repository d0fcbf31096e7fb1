pub mod dir_extractor;
pub mod publish;
pub mod resource;

pub use dir_extractor::DirExtractor;
pub use publish::{PublishMode, PublishReport, publish};
pub use resource::{ExtractError, Extractor, Resource, ResourceData};

#[cfg(test)]
mod dir_extractor_test;
#[cfg(test)]
mod publish_test;
