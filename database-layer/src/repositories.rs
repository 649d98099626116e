//! Pool-backed repositories, one per table family

pub mod client;
pub mod client_location;
pub mod employee;
pub mod forgot_password;
pub mod lab;
pub mod lead;
pub mod lead_history;
pub mod login;
pub mod mapping;
pub mod package;
pub mod test;

pub use client::{ClientListFilter, ClientRepository};
pub use client_location::ClientLocationRepository;
pub use employee::EmployeeRepository;
pub use forgot_password::ForgotPasswordRepository;
pub use lab::{LabListFilter, LabRepository};
pub use lead::{LeadListFilter, LeadRepository, LeadWriter};
pub use lead_history::{LeadHistoryRepository, LeadHistoryWriter};
pub use login::LoginRepository;
pub use mapping::{
    PackageClientMappingRepository, PackageLabMappingRepository, PackageTestMappingRepository,
};
pub use package::{CascadeCounts, PackageListFilter, PackageRepository};
pub use test::TestRepository;
