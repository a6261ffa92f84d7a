//! Azure Blob Storage over plain REST: container-scoped SAS token for
//! read/write, or anonymous reads from a public container.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use crate::errors::{WeedScopeError, WeedScopeResult};
use crate::storage::{validate_blob_name, BlobStore};

pub struct AzureBlobStore {
    base: Url,
    sas_token: Option<String>,
    client: reqwest::Client,
}

impl AzureBlobStore {
    pub fn with_sas(account_url: &str, container: &str, sas_token: &str) -> WeedScopeResult<Self> {
        let mut base = parse_base(account_url)?;
        base.path_segments_mut()
            .map_err(|_| WeedScopeError::Config(format!("'{account_url}' cannot be a base URL")))?
            .pop_if_empty()
            .push(container.trim_matches('/'));

        let sas = sas_token.trim().trim_start_matches('?');
        if sas.is_empty() {
            tracing::warn!(container, "no SAS token configured; writes will likely be rejected");
        }

        Ok(Self {
            base,
            sas_token: (!sas.is_empty()).then(|| sas.to_string()),
            client: reqwest::Client::new(),
        })
    }

    /// `url` already names the container, e.g. `https://acct.blob.core.windows.net/testdata/`.
    pub fn anonymous(url: &str) -> WeedScopeResult<Self> {
        let mut base = parse_base(url)?;
        base.path_segments_mut()
            .map_err(|_| WeedScopeError::Config(format!("'{url}' cannot be a base URL")))?
            .pop_if_empty();

        Ok(Self {
            base,
            sas_token: None,
            client: reqwest::Client::new(),
        })
    }

    fn blob_url(&self, name: &str) -> WeedScopeResult<Url> {
        validate_blob_name(name)?;
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| WeedScopeError::Internal("blob base URL lost its path".into()))?
            .push(name);
        url.set_query(self.sas_token.as_deref());
        Ok(url)
    }
}

fn parse_base(raw: &str) -> WeedScopeResult<Url> {
    Url::parse(raw.trim())
        .map_err(|e| WeedScopeError::Config(format!("invalid storage URL '{raw}': {e}")))
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    fn name(&self) -> &str {
        "azure-blob"
    }

    async fn write(&self, name: &str, data: Vec<u8>, content_type: &str) -> WeedScopeResult<()> {
        let url = self.blob_url(name)?;
        let size = data.len();

        let response = self
            .client
            .put(url)
            .header("x-ms-blob-type", "BlockBlob")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| WeedScopeError::Storage(format!("upload of '{name}' failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(WeedScopeError::Storage(format!(
                "upload of '{name}' rejected: {status}: {err_body}"
            )));
        }

        tracing::debug!(blob = name, size, "blob written");
        Ok(())
    }

    async fn read(&self, name: &str) -> WeedScopeResult<Vec<u8>> {
        let url = self.blob_url(name)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WeedScopeError::Storage(format!("download of '{name}' failed: {e}")))?;

        match response.status() {
            status if status.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| WeedScopeError::Storage(format!("reading '{name}': {e}")))?;
                tracing::debug!(blob = name, size = bytes.len(), "blob read");
                Ok(bytes.to_vec())
            }
            StatusCode::NOT_FOUND => {
                Err(WeedScopeError::Storage(format!("blob '{name}' not found")))
            }
            status => Err(WeedScopeError::Storage(format!(
                "download of '{name}' rejected: {status}"
            ))),
        }
    }
}
