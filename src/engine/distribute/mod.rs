pub mod distributor;
pub mod errors;
pub mod mirror;
pub mod sweep;

pub use distributor::Distributor;
pub use errors::DistributeError;
pub use mirror::Mirror;
pub use sweep::{SweepReport, sweep_orphans};
