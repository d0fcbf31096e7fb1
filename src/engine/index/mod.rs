pub mod all_index;
pub mod codec;
pub mod errors;
pub mod label;
pub mod resource_index;

pub use all_index::AllIndex;
pub use errors::IndexError;
pub use label::Label;
pub use resource_index::ResourceIndex;

#[cfg(test)]
mod all_index_test;
#[cfg(test)]
mod label_test;
#[cfg(test)]
mod resource_index_test;
