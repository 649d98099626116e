//! Row types for every aggregator table.
//!
//! Rust fields follow the snake_case Postgres columns; JSON keeps the
//! PascalCase names the existing clients already send and expect.

pub mod client;
pub mod client_location;
pub mod employee;
pub mod flex;
pub mod lab;
pub mod lead;
pub mod login;
pub mod mapping;
pub mod package;

pub use client::{Client, ClientUpdate, NewClient};
pub use client_location::{ClientLocation, ClientLocationUpdate, NewClientLocation};
pub use employee::{Employee, EmployeeUpdate, NewEmployee};
pub use lab::{Lab, LabUpdate, NewLab};
pub use lead::{Lead, LeadAction, LeadHistory, LeadUpdate, LeadWithNames, NewLead};
pub use login::{ForgotPassword, Login, UserType};
pub use mapping::{PackageClientMapping, PackageLabMapping, PackageTestMapping};
pub use package::{NewPackage, Package};
pub use test::Test;
