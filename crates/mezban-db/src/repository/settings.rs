//! # Settings Repository
//!
//! The singleton settings record (row id pinned to 1, seeded by the
//! initial migration). Saves are whole-record upserts: after the first
//! save the record is never partially null, because every field travels
//! on every save.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{db_err, StoreResult};
use mezban_core::validation::validate_settings;
use mezban_core::Settings;

/// Repository for the store-wide settings record.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Fetches the settings record.
    ///
    /// Always present: the initial migration seeds the default row.
    pub async fn get(&self) -> StoreResult<Settings> {
        let settings = sqlx::query_as::<_, Settings>(
            r#"
            SELECT restaurant_name, address, phone, email, tax_rate,
                   currency, opening_time, closing_time, receipt_footer, logo
            FROM settings
            WHERE id = 1
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("get_settings"))?;

        Ok(settings)
    }

    /// Upserts the whole settings record.
    ///
    /// ## Failure Modes
    /// - malformed currency tag or HH:MM time field → `Validation`
    /// - opening_time not earlier than closing_time → `Validation`
    pub async fn save(&self, settings: &Settings) -> StoreResult<()> {
        validate_settings(settings)?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO settings (
                id, restaurant_name, address, phone, email, tax_rate,
                currency, opening_time, closing_time, receipt_footer, logo
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(settings.restaurant_name.trim())
        .bind(&settings.address)
        .bind(&settings.phone)
        .bind(&settings.email)
        .bind(settings.tax_rate)
        .bind(&settings.currency)
        .bind(&settings.opening_time)
        .bind(&settings.closing_time)
        .bind(&settings.receipt_footer)
        .bind(&settings.logo)
        .execute(&self.pool)
        .await
        .map_err(db_err("save_settings"))?;

        debug!(restaurant = %settings.restaurant_name, "Settings saved");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::{Store, StoreConfig};

    async fn store() -> Store {
        Store::open(StoreConfig::in_memory()).await.unwrap()
    }

    fn sample_settings() -> Settings {
        Settings {
            restaurant_name: "Chai Khana".to_string(),
            address: Some("14-A Mall Road, Lahore".to_string()),
            phone: Some("042-1234567".to_string()),
            email: Some("hello@chaikhana.pk".to_string()),
            tax_rate: Some(16.0),
            currency: "PKR".to_string(),
            opening_time: Some("09:00".to_string()),
            closing_time: Some("23:00".to_string()),
            receipt_footer: Some("Shukriya! Come again.".to_string()),
            logo: Some(vec![1, 2, 3, 4]),
        }
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let store = store().await;
        let repo = store.settings();

        let settings = sample_settings();
        repo.save(&settings).await.unwrap();

        let loaded = repo.get().await.unwrap();
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_record() {
        let store = store().await;
        let repo = store.settings();

        repo.save(&sample_settings()).await.unwrap();

        // A later save with fewer optional fields clears the old ones.
        let minimal = Settings {
            restaurant_name: "Chai Khana".to_string(),
            currency: "PKR".to_string(),
            ..Default::default()
        };
        repo.save(&minimal).await.unwrap();

        let loaded = repo.get().await.unwrap();
        assert_eq!(loaded, minimal);
        assert!(loaded.logo.is_none());
    }

    #[tokio::test]
    async fn test_save_rejects_malformed_fields() {
        let store = store().await;
        let repo = store.settings();

        let mut settings = sample_settings();
        settings.currency = "rupees".to_string();
        assert!(matches!(
            repo.save(&settings).await,
            Err(StoreError::Validation(_))
        ));

        let mut settings = sample_settings();
        settings.opening_time = Some("25:00".to_string());
        assert!(matches!(
            repo.save(&settings).await,
            Err(StoreError::Validation(_))
        ));

        let mut settings = sample_settings();
        settings.opening_time = Some("23:00".to_string());
        settings.closing_time = Some("09:00".to_string());
        assert!(matches!(
            repo.save(&settings).await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_logo_blob_round_trip() {
        let store = store().await;
        let repo = store.settings();

        let mut settings = sample_settings();
        settings.logo = Some((0u8..=255).collect());
        repo.save(&settings).await.unwrap();

        let loaded = repo.get().await.unwrap();
        assert_eq!(loaded.logo.as_deref().map(|l| l.len()), Some(256));
        assert_eq!(loaded.logo, settings.logo);
    }
}
