/// Data models for authentication and reference data
pub mod company;
pub mod user;

pub use company::Company;
pub use user::{Credential, LoginResponse, UserProfile, UserRecord};
