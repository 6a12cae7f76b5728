pub mod fake_search;
pub mod fixtures;
