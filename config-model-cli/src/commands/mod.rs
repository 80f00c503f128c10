pub mod compile;
pub mod list;
