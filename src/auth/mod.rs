pub mod authenticator;
pub mod types;
