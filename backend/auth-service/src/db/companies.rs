/// Company reference table queries
use async_trait::async_trait;
use sqlx::PgPool;

use super::CompanyStore;
use crate::error::Result;
use crate::models::Company;

#[derive(Clone)]
pub struct PgCompanyStore {
    pool: PgPool,
}

impl PgCompanyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyStore for PgCompanyStore {
    async fn list(&self) -> Result<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, company_name, website, description, founded_year, headquarters
            FROM companies
            ORDER BY company_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(companies)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, company_name, website, description, founded_year, headquarters
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }
}
