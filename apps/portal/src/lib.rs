pub mod backend;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod form;
pub mod identity;
pub mod models;
pub mod routing;
pub mod session;
pub mod shell;
