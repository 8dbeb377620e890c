pub mod config;
pub mod dashboard;
pub mod dates;
pub mod details;
pub mod employee;
pub mod error;
pub mod init;
pub mod institution;
pub mod io;
pub mod notification;
pub mod password;
pub mod paths;
pub mod report;
pub mod request;
pub mod state;
pub mod store;
pub mod track;
pub mod types;
pub mod user;
pub mod workflow;

pub use error::{CsmsError, Result};
