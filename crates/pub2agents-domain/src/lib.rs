//! Domain types shared by the pub2agents crates
//!
//! - Agent: a cataloged software/tool entry mined from the literature
//! - Publication: a publication entry, keyed by its DOI/PMID/PMCID
//!   (PublicationIdentifier)

pub mod agent;
pub mod publication;

pub use agent::*;
pub use publication::*;
