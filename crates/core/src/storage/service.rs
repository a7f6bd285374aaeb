//! Storage service implementation using Apache OpenDAL.

use opendal::{Operator, services};

use balanza_shared::types::TenantId;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Blob storage for signed XML documents and digital certificates.
pub struct StorageService {
    operator: Operator,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Storage key for a document's signed XML, by access key.
    #[must_use]
    pub fn signed_xml_key(tenant_id: TenantId, access_key: &str) -> String {
        format!("{tenant_id}/fiscal/signed/{access_key}.xml")
    }

    /// Storage key for a tenant's digital certificate.
    #[must_use]
    pub fn certificate_key(tenant_id: TenantId) -> String {
        format!("{tenant_id}/fiscal/certificate.p12")
    }

    /// Uploads a blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.operator.write(key, bytes).await?;
        Ok(())
    }

    /// Downloads a blob.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the key does not exist.
    pub async fn download(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let buffer = self.operator.read(key).await?;
        Ok(buffer.to_vec())
    }

    /// Deletes a blob; deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails for another reason.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_xml_key_layout() {
        let tenant = TenantId::new();
        let key = StorageService::signed_xml_key(tenant, "0502202601179214673900110010010000000011234567813");
        assert!(key.starts_with(&tenant.to_string()));
        assert!(key.ends_with(".xml"));
        assert!(key.contains("/fiscal/signed/"));
    }

    #[test]
    fn test_certificate_key_layout() {
        let tenant = TenantId::new();
        let key = StorageService::certificate_key(tenant);
        assert_eq!(key, format!("{tenant}/fiscal/certificate.p12"));
    }

    #[tokio::test]
    async fn test_local_fs_roundtrip() {
        let dir = std::env::temp_dir().join(format!("balanza-storage-{}", uuid::Uuid::new_v4()));
        let service =
            StorageService::from_config(&StorageConfig::new(StorageProvider::local_fs(&dir)))
                .unwrap();

        service
            .upload("t/fiscal/signed/key.xml", b"<xml/>".to_vec())
            .await
            .unwrap();
        let bytes = service.download("t/fiscal/signed/key.xml").await.unwrap();
        assert_eq!(bytes, b"<xml/>");

        service.delete("t/fiscal/signed/key.xml").await.unwrap();
        assert!(matches!(
            service.download("t/fiscal/signed/key.xml").await,
            Err(StorageError::NotFound { .. })
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
