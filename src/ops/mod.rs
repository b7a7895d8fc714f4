pub mod drop;
pub mod filter;
pub mod validate;
