pub mod statistics;
pub mod summary;
