//! Wholesale inquiry repository.
//!
//! Queries are built at runtime (`sqlx::query_as`) so the crate compiles
//! without a live database or offline query cache.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use wholesale_bridge_core::{InquiryId, InquiryStatus};

use super::{InquiryStore, RepositoryError};
use crate::models::{InquiryAddress, InquiryLinks, NewInquiry, WholesaleInquiry};

/// Column list shared by every query that returns full inquiry rows.
const INQUIRY_COLUMNS: &str = r"
    id, company_name, first_name, last_name, email, phone_number,
    address1, address2, city, province, postal_code, country,
    website_url, instagram_url, facebook_url, tiktok_url, marketplace_url,
    status::text AS status, created_at
";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct InquiryRow {
    id: InquiryId,
    company_name: String,
    first_name: String,
    last_name: String,
    // Unvalidated: one malformed address must not fail the whole listing.
    email: String,
    phone_number: Option<String>,
    address1: Option<String>,
    address2: Option<String>,
    city: Option<String>,
    province: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    website_url: Option<String>,
    instagram_url: Option<String>,
    facebook_url: Option<String>,
    tiktok_url: Option<String>,
    marketplace_url: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<InquiryRow> for WholesaleInquiry {
    type Error = RepositoryError;

    fn try_from(row: InquiryRow) -> Result<Self, Self::Error> {
        let status: InquiryStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("inquiry {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            company_name: row.company_name,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            address: InquiryAddress {
                address1: row.address1,
                address2: row.address2,
                city: row.city,
                province: row.province,
                postal_code: row.postal_code,
                country: row.country,
            },
            links: InquiryLinks {
                website_url: row.website_url,
                instagram_url: row.instagram_url,
                facebook_url: row.facebook_url,
                tiktok_url: row.tiktok_url,
                marketplace_url: row.marketplace_url,
            },
            status,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// `PostgreSQL`-backed [`InquiryStore`].
#[derive(Clone)]
pub struct PgInquiryStore {
    pool: PgPool,
}

impl PgInquiryStore {
    /// Create a new inquiry store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl InquiryStore for PgInquiryStore {
    #[instrument(skip(self))]
    async fn list_newest_first(&self) -> Result<Vec<WholesaleInquiry>, RepositoryError> {
        let sql = format!(
            "SELECT {INQUIRY_COLUMNS} FROM wholesale.wholesale_inquiry \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, InquiryRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    #[instrument(skip(self), fields(inquiry_id = %id))]
    async fn get(&self, id: InquiryId) -> Result<Option<WholesaleInquiry>, RepositoryError> {
        let sql = format!("SELECT {INQUIRY_COLUMNS} FROM wholesale.wholesale_inquiry WHERE id = $1");
        let row = sqlx::query_as::<_, InquiryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    #[instrument(skip(self), fields(inquiry_id = %id))]
    async fn mark_approved(&self, id: InquiryId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE wholesale.wholesale_inquiry
            SET status = 'APPROVED'
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self, inquiry), fields(email = %inquiry.email))]
    async fn insert(&self, inquiry: NewInquiry) -> Result<WholesaleInquiry, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO wholesale.wholesale_inquiry (
                company_name, first_name, last_name, email, phone_number,
                address1, address2, city, province, postal_code, country,
                website_url, instagram_url, facebook_url, tiktok_url, marketplace_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {INQUIRY_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, InquiryRow>(&sql)
            .bind(inquiry.company_name.trim())
            .bind(inquiry.first_name.trim())
            .bind(inquiry.last_name.trim())
            .bind(&inquiry.email)
            .bind(inquiry.phone_number)
            .bind(inquiry.address.address1)
            .bind(inquiry.address.address2)
            .bind(inquiry.address.city)
            .bind(inquiry.address.province)
            .bind(inquiry.address.postal_code)
            .bind(inquiry.address.country)
            .bind(inquiry.links.website_url)
            .bind(inquiry.links.instagram_url)
            .bind(inquiry.links.facebook_url)
            .bind(inquiry.links.tiktok_url)
            .bind(inquiry.links.marketplace_url)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
