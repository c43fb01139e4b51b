pub mod commands;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod runtime;
