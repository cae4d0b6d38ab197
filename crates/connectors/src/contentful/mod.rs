pub mod client;
pub mod config;
pub mod links;
pub mod response;
