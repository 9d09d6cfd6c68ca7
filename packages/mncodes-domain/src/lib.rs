pub mod embedding;
pub mod query;
