/// Storage seams for auth-service
///
/// Services depend on these traits only; `PgUserStore`/`PgCompanyStore` back
/// them in production and the in-memory stores back tests and local runs.
use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Company, UserRecord};

pub mod companies;
pub mod memory;
pub mod users;

pub use companies::PgCompanyStore;
pub use memory::{InMemoryCompanyStore, InMemoryUserStore, SeedData};
pub use users::PgUserStore;

/// Read access to the user table
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact, case-sensitive username match
    ///
    /// # Errors
    ///
    /// `AuthError::StoreUnavailable` when the backing store cannot be reached.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;
}

/// Read access to the company reference table
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// All companies ordered by name
    async fn list(&self) -> Result<Vec<Company>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Company>>;
}
