pub mod client;
pub mod client_location;
pub mod employee;
pub mod health;
pub mod lab;
pub mod lead;
pub mod login;
pub mod package;
