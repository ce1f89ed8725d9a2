use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use crate::media::{public_url, MediaObject, MediaStore, StoredMedia, UploadError};

/// Uploads to an S3-compatible bucket. References are `<public_url>/<key>`.
#[derive(Clone)]
pub struct S3MediaStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: String,
}

pub struct S3Settings<'a> {
    pub bucket: &'a str,
    pub endpoint: &'a str,
    pub region: &'a str,
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub public_url: &'a str,
}

impl S3MediaStore {
    /// Constructs a client configured for MinIO (local) or AWS (production).
    pub async fn connect(settings: S3Settings<'_>) -> Self {
        let credentials = Credentials::new(
            settings.access_key_id,
            settings.secret_access_key,
            None,
            None,
            "jobboard-static",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(settings.region.to_string()))
            .credentials_provider(credentials)
            .endpoint_url(settings.endpoint)
            .load()
            .await;

        // MinIO serves buckets by path rather than by virtual host.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: settings.bucket.to_string(),
            public_url: settings.public_url.to_string(),
        }
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    fn backend(&self) -> &'static str {
        "s3"
    }

    async fn store(&self, object: MediaObject) -> Result<StoredMedia, UploadError> {
        let key = object.object_key();
        let size = object.data.len();

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(object.data));
        if let Some(content_type) = object.content_type {
            request = request.content_type(content_type);
        }
        request
            .send()
            .await
            .map_err(|e| UploadError::s3(format!("put_object {key}"), e))?;

        info!("Uploaded {size} bytes to s3://{}/{}", self.bucket, key);

        Ok(StoredMedia {
            url: public_url(&self.public_url, &key),
            public_id: key,
        })
    }

    async fn remove(&self, public_id: &str) -> Result<(), UploadError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(public_id)
            .send()
            .await
            .map_err(|e| UploadError::s3(format!("delete_object {public_id}"), e))?;
        Ok(())
    }
}
