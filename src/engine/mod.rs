pub mod distribute;
pub mod extract;
pub mod index;
pub mod ring;
