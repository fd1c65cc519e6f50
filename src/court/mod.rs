pub mod mapper;
pub mod types;
