//! S3-backed blob store, MinIO-compatible for local development.

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;

use super::{BlobStore, StoreError};
use crate::config::Config;

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    endpoint: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, endpoint: String) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Builds the store from environment configuration.
    ///
    /// Path-style addressing is forced: [`BlobStore::public_url`] hands
    /// out `<endpoint>/<bucket>/<key>` links for profile pictures, and
    /// MinIO only serves the resume and picture buckets in that layout —
    /// virtual-hosted style would mint URLs the bucket never answers.
    pub fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "nightingale",
        );
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .force_path_style(true)
            .build();

        Self::new(aws_sdk_s3::Client::from_conf(s3_config), config.s3_endpoint.clone())
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(path)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("S3 upload failed: {e}")))?;
        Ok(())
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StoreError> {
        for path in paths {
            self.client
                .delete_object()
                .bucket(bucket)
                .key(path)
                .send()
                .await
                .map_err(|e| StoreError::Backend(format!("S3 delete failed: {e}")))?;
        }
        Ok(())
    }

    async fn signed_url(
        &self,
        bucket: &str,
        path: &str,
        ttl_secs: u64,
    ) -> Result<String, StoreError> {
        let presigning = PresigningConfig::expires_in(std::time::Duration::from_secs(ttl_secs))
            .map_err(|e| StoreError::Backend(format!("presigning config: {e}")))?;
        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(path)
            .presigned(presigning)
            .await
            .map_err(|e| StoreError::Backend(format!("S3 presign failed: {e}")))?;
        Ok(request.uri().to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/{}", self.endpoint, bucket, path)
    }
}
