//! Token issuance and domain-based identity typing

pub mod domain;
pub mod tokens;

pub use domain::{domain_from_headers, require_domain, DomainResolver, DOMAIN_HEADER};
pub use tokens::{TokenClaims, TokenPair, TokenService};
