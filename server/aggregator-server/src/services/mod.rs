//! Business logic between the HTTP handlers and the repositories.

pub mod client;
pub mod client_location;
pub mod employee;
pub mod lab;
pub mod lead;
pub mod login;
pub mod package;

pub use client::ClientService;
pub use client_location::ClientLocationService;
pub use employee::EmployeeService;
pub use lab::LabService;
pub use lead::{generate_patient_id, CsvImportError, LeadService};
pub use login::{LoginRequest, LoginService, Principal};
pub use package::PackageService;
pub use test::TestService;
