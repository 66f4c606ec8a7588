//! JSON file storage for wallets and target sets.
//!
//! Everything lives in one `splitpay.json` document inside the storage
//! directory. Writes go to a temporary file that is then renamed over the
//! original, so a replaced target set is never observed half written.
//! Concurrent writers within one process are serialized; separate processes
//! sharing a directory are not coordinated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{StorageResult, TargetStore, WalletDirectory};
use crate::{KeyKind, Target, Wallet, WalletId};

const DATA_FILE: &str = "splitpay.json";

#[derive(Serialize, Deserialize, Default)]
struct StoreData {
    #[serde(default)]
    wallets: BTreeMap<WalletId, Wallet>,
    #[serde(default)]
    targets: BTreeMap<WalletId, Vec<Target>>,
}

/// File-backed [`TargetStore`] and [`WalletDirectory`].
pub struct JsonFileStore {
    storage_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store rooted at `storage_dir`. The directory is created on
    /// first write.
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: storage_dir.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    pub fn data_path(&self) -> PathBuf {
        self.storage_dir.join(DATA_FILE)
    }

    /// Create a wallet with fresh id and keys.
    pub async fn create_wallet(&self, name: &str) -> StorageResult<Wallet> {
        let wallet = Wallet {
            id: WalletId::new(uuid::Uuid::new_v4().simple().to_string()),
            name: name.to_string(),
            admin_key: uuid::Uuid::new_v4().simple().to_string(),
            invoice_key: uuid::Uuid::new_v4().simple().to_string(),
        };

        let _guard = self.write_lock.lock().await;
        let mut data = self.load_data()?;
        data.wallets.insert(wallet.id.clone(), wallet.clone());
        self.save_data(&data)?;
        Ok(wallet)
    }

    /// List all wallets sorted by name.
    pub async fn list_wallets(&self) -> StorageResult<Vec<Wallet>> {
        let data = self.load_data()?;
        let mut wallets: Vec<_> = data.wallets.into_values().collect();
        wallets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(wallets)
    }

    fn load_data(&self) -> StorageResult<StoreData> {
        let path = self.data_path();
        if !path.exists() {
            return Ok(StoreData::default());
        }
        let json = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save_data(&self, data: &StoreData) -> StorageResult<()> {
        std::fs::create_dir_all(&self.storage_dir)?;
        let path = self.data_path();
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(data)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[async_trait]
impl TargetStore for JsonFileStore {
    async fn get_targets(&self, source: &WalletId) -> StorageResult<Vec<Target>> {
        let mut data = self.load_data()?;
        Ok(data.targets.remove(source).unwrap_or_default())
    }

    async fn set_targets(&self, source: &WalletId, targets: Vec<Target>) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load_data()?;
        if targets.is_empty() {
            data.targets.remove(source);
        } else {
            data.targets.insert(source.clone(), targets);
        }
        self.save_data(&data)
    }
}

#[async_trait]
impl WalletDirectory for JsonFileStore {
    async fn get_wallet(&self, id: &WalletId) -> StorageResult<Option<Wallet>> {
        let mut data = self.load_data()?;
        Ok(data.wallets.remove(id))
    }

    async fn get_wallet_for_key(&self, key: &str, kind: KeyKind) -> StorageResult<Option<Wallet>> {
        let data = self.load_data()?;
        Ok(data.wallets.into_values().find(|w| w.has_key(key, kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn wallets_and_targets_persist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path());

        let wallet = store.create_wallet("alice").await.unwrap();
        let source = wallet.id.clone();
        let targets = vec![Target {
            source: source.clone(),
            wallet: "bob@example.com".into(),
            wallet_name: "bob@example.com".into(),
            alias: Some("bob".into()),
            percent: dec!(20.5),
        }];
        store.set_targets(&source, targets.clone()).await.unwrap();

        let reopened = JsonFileStore::new(temp_dir.path());
        assert_eq!(reopened.get_targets(&source).await.unwrap(), targets);
        assert_eq!(
            reopened.get_wallet(&source).await.unwrap(),
            Some(wallet.clone())
        );
        assert_eq!(
            reopened
                .get_wallet_for_key(&wallet.invoice_key, KeyKind::Invoice)
                .await
                .unwrap()
                .map(|w| w.id),
            Some(source.clone())
        );

        reopened.set_targets(&source, Vec::new()).await.unwrap();
        assert!(reopened.get_targets(&source).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("nested"));
        assert!(store.list_wallets().await.unwrap().is_empty());
        assert!(store
            .get_targets(&WalletId::new("x"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_serialization_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path());
        std::fs::write(store.data_path(), "{not json").unwrap();

        let err = store.list_wallets().await.unwrap_err();
        assert!(matches!(err, crate::StorageError::Serialization(_)));
    }
}
