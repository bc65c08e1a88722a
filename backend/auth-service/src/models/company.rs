use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `companies` reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i32,
    pub company_name: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub founded_year: Option<i32>,
    pub headquarters: Option<String>,
}
