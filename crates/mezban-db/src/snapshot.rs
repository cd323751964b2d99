//! # Whole-Store Snapshots
//!
//! Export and import of the entire ledger as one opaque blob - the
//! store's native SQLite container, byte for byte. Export-then-import
//! must reproduce an equivalent store; nothing derived, nothing lossy.
//!
//! ## Import Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     import_snapshot(bytes)                          │
//! │                                                                     │
//! │  1. BACKUP     copy live file → <db>.backup                         │
//! │  2. OVERWRITE  close pool, drop WAL sidecars, write bytes           │
//! │  3. VERIFY     reopen, PRAGMA integrity_check, probe all tables     │
//! │  4a. SUCCESS   discard backup                                       │
//! │  4b. FAILURE   restore backup, reopen, THEN report the error        │
//! │                                                                     │
//! │  This is the one place the core recovers on its own: leaving a      │
//! │  half-written, unopenable store is categorically worse than a       │
//! │  failed import.                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{db_err, StoreError, StoreResult};
use crate::pool::Store;

/// Serializes the entire store as its native on-disk container.
///
/// The WAL is checkpointed first so the returned bytes hold every
/// committed transaction, not just what has already reached the main
/// file.
pub async fn export_snapshot(store: &Store) -> StoreResult<Vec<u8>> {
    let path = file_backed_path(store, "export_snapshot")?;

    sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
        .execute(store.pool())
        .await
        .map_err(db_err("export_snapshot"))?;

    let bytes = fs::read(&path).map_err(|e| StoreError::storage("export_snapshot", e))?;

    info!(bytes = bytes.len(), "Snapshot exported");
    Ok(bytes)
}

/// Replaces the entire store with a previously exported snapshot.
///
/// Follows the backup / overwrite / verify / rollback sequence above.
/// On return with an error, the store holds exactly the data it held
/// before the call and is open for business.
pub async fn import_snapshot(store: &mut Store, bytes: &[u8]) -> StoreResult<()> {
    let live = file_backed_path(store, "import_snapshot")?;
    let backup = live.with_extension("db.backup");

    // Quiesce the current database before touching the file.
    sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
        .execute(store.pool())
        .await
        .map_err(db_err("import_snapshot"))?;
    store.close().await;

    // Step 1: backup. If even this fails, reopen the untouched store
    // and report - nothing has been modified yet.
    if let Err(e) = fs::copy(&live, &backup) {
        if let Err(reopen) = store.reconnect().await {
            warn!(error = %reopen, "Reopen after failed backup copy also failed");
        }
        return Err(StoreError::storage("import_snapshot", e));
    }

    // Steps 2-3: overwrite and verify.
    match overwrite_and_verify(store, &live, bytes).await {
        Ok(()) => {
            // Step 4a: discard the backup; the import is live.
            if let Err(e) = fs::remove_file(&backup) {
                warn!(error = %e, "Imported snapshot is live but backup cleanup failed");
            }
            info!(bytes = bytes.len(), "Snapshot imported");
            Ok(())
        }
        Err(e) => {
            // Step 4b: put the old store back before surfacing anything.
            restore_backup(store, &live, &backup).await?;
            Err(e)
        }
    }
}

/// Writes the candidate bytes over the live file and proves the result
/// is a usable ledger. Any error here triggers a rollback in the caller.
async fn overwrite_and_verify(store: &mut Store, live: &Path, bytes: &[u8]) -> StoreResult<()> {
    // Stale WAL/SHM sidecars from the previous database would shadow
    // the freshly written main file.
    remove_sidecars(live);

    fs::write(live, bytes).map_err(|e| StoreError::storage("import_snapshot", e))?;

    // Reopen runs migrations, which also upgrades a snapshot taken by
    // an older release. A garbage container fails here.
    store.reconnect().await?;

    let verdict: String = sqlx::query_scalar("PRAGMA integrity_check")
        .fetch_one(store.pool())
        .await
        .map_err(db_err("import_snapshot"))?;
    if !verdict.eq_ignore_ascii_case("ok") {
        return Err(StoreError::storage(
            "import_snapshot",
            format!("integrity check failed: {verdict}"),
        ));
    }

    // Schema probe: all four collections must be present and readable.
    for table in ["settings", "products", "sales", "sale_items"] {
        let _count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(store.pool())
            .await
            .map_err(db_err("import_snapshot"))?;
    }

    Ok(())
}

/// Puts the pre-import file back and reopens it.
async fn restore_backup(store: &mut Store, live: &Path, backup: &Path) -> StoreResult<()> {
    store.close().await;
    remove_sidecars(live);

    fs::copy(backup, live).map_err(|e| {
        StoreError::storage(
            "import_snapshot",
            format!(
                "restore from backup failed, backup retained at {}: {e}",
                backup.display()
            ),
        )
    })?;

    store.reconnect().await?;

    if let Err(e) = fs::remove_file(backup) {
        warn!(error = %e, "Store restored but backup cleanup failed");
    }

    info!("Store restored from pre-import backup");
    Ok(())
}

/// The snapshot operations need a real file; in-memory test stores have
/// no on-disk container to copy.
fn file_backed_path(store: &Store, op: &'static str) -> StoreResult<PathBuf> {
    if store.config().is_in_memory() {
        return Err(StoreError::storage(
            op,
            "in-memory store has no on-disk container",
        ));
    }
    Ok(store.path().to_path_buf())
}

/// Drops the `-wal` and `-shm` sidecar files, if present.
fn remove_sidecars(live: &Path) {
    for suffix in ["-wal", "-shm"] {
        let mut sidecar = live.as_os_str().to_os_string();
        sidecar.push(suffix);
        let _ = fs::remove_file(PathBuf::from(sidecar));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use mezban_core::{NewProduct, NewSaleLine, Settings, Transaction};

    fn product(name: &str, price_cents: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price_cents,
            unit: "item".to_string(),
        }
    }

    fn sale_line(name: &str, price_cents: i64, quantity: f64) -> NewSaleLine {
        NewSaleLine {
            name: name.to_string(),
            unit_price_cents: price_cents,
            quantity,
            unit: "item".to_string(),
        }
    }

    async fn file_store(dir: &tempfile::TempDir) -> Store {
        let config = StoreConfig::new(dir.path().join("mezban.db"));
        Store::open(config).await.unwrap()
    }

    /// Everything a snapshot round trip must preserve, as the UI sees it.
    async fn observable_state(
        store: &Store,
    ) -> (Vec<mezban_core::Product>, Vec<Transaction>, Settings) {
        (
            store.products().list().await.unwrap(),
            store.sales().get_transactions(None).await.unwrap(),
            store.settings().get().await.unwrap(),
        )
    }

    async fn seed_store(store: &Store) {
        store.products().add(&product("Tea", 200)).await.unwrap();
        store.products().add(&product("Naan", 30)).await.unwrap();
        store
            .sales()
            .record(&[sale_line("Tea", 200, 3.0)], "PKR")
            .await
            .unwrap();

        let mut settings = store.settings().get().await.unwrap();
        settings.restaurant_name = "Chai Khana".to_string();
        settings.logo = Some(vec![9, 8, 7]);
        store.settings().save(&settings).await.unwrap();
    }

    #[tokio::test]
    async fn test_export_is_native_sqlite_container() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir).await;
        seed_store(&store).await;

        let bytes = export_snapshot(&store).await.unwrap();
        assert!(bytes.starts_with(b"SQLite format 3\0"));
    }

    #[tokio::test]
    async fn test_round_trip_restores_observable_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(&dir).await;
        seed_store(&store).await;

        let before = observable_state(&store).await;
        let bytes = export_snapshot(&store).await.unwrap();

        // Diverge from the snapshot point.
        store.products().add(&product("Lassi", 150)).await.unwrap();
        store
            .sales()
            .record(&[sale_line("Lassi", 150, 2.0)], "PKR")
            .await
            .unwrap();
        assert_ne!(observable_state(&store).await, before);

        import_snapshot(&mut store, &bytes).await.unwrap();

        assert_eq!(observable_state(&store).await, before);
        // The backup is gone after a successful import.
        assert!(!dir.path().join("mezban.db.backup").exists());
    }

    #[tokio::test]
    async fn test_immediate_reimport_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(&dir).await;
        seed_store(&store).await;

        let before = observable_state(&store).await;
        let bytes = export_snapshot(&store).await.unwrap();
        import_snapshot(&mut store, &bytes).await.unwrap();

        assert_eq!(observable_state(&store).await, before);
    }

    #[tokio::test]
    async fn test_corrupt_import_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(&dir).await;
        seed_store(&store).await;

        let before = observable_state(&store).await;

        let result = import_snapshot(&mut store, b"definitely not a database").await;
        assert!(matches!(result, Err(StoreError::Storage { .. })));

        // Same state as before the call, store open for business.
        assert!(store.health_check().await);
        assert_eq!(observable_state(&store).await, before);
        assert!(!dir.path().join("mezban.db.backup").exists());
    }

    #[tokio::test]
    async fn test_truncated_snapshot_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(&dir).await;
        seed_store(&store).await;

        let before = observable_state(&store).await;
        let bytes = export_snapshot(&store).await.unwrap();

        // A torn download: half the container.
        let truncated = &bytes[..bytes.len() / 2];
        let result = import_snapshot(&mut store, truncated).await;
        assert!(result.is_err());

        assert_eq!(observable_state(&store).await, before);
    }

    #[tokio::test]
    async fn test_snapshot_requires_file_backed_store() {
        let mut store = Store::open(StoreConfig::in_memory()).await.unwrap();

        assert!(matches!(
            export_snapshot(&store).await,
            Err(StoreError::Storage { .. })
        ));
        assert!(matches!(
            import_snapshot(&mut store, b"").await,
            Err(StoreError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn test_import_into_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let donor = file_store(&dir).await;
        seed_store(&donor).await;
        let bytes = export_snapshot(&donor).await.unwrap();
        let donor_state = observable_state(&donor).await;
        donor.close().await;

        // A brand-new empty store on a different path adopts the blob.
        let other_dir = tempfile::tempdir().unwrap();
        let mut fresh = Store::open(StoreConfig::new(other_dir.path().join("mezban.db")))
            .await
            .unwrap();
        assert!(fresh.products().list().await.unwrap().is_empty());

        import_snapshot(&mut fresh, &bytes).await.unwrap();
        assert_eq!(observable_state(&fresh).await, donor_state);
    }
}
