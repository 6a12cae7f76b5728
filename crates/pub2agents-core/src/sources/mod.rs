//! Literature search sources

pub mod europepmc;
pub mod traits;

pub use europepmc::*;
pub use traits::*;
