pub mod advisor;
pub mod gateway;
