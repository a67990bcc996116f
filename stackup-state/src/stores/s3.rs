//! S3 object store

use std::path::Path;

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ServerSideEncryption;
use log::debug;
use stackup_core::Environment;

use crate::store::{ObjectStore, StorageError, StorageResult};

/// S3-backed object store
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a client for `region`, taking credentials from the layered environment
    ///
    /// Environment overrides such as `PRODUCTION_AWS_PROFILE` never reach the
    /// process environment, so the SDK is pointed at them explicitly.
    pub async fn connect(region: &str, env: &Environment) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()));

        match CredentialSource::from_env(env) {
            CredentialSource::Static {
                access_key_id,
                secret_access_key,
                session_token,
            } => {
                debug!("Using static AWS credentials from the environment");
                loader = loader.credentials_provider(Credentials::new(
                    access_key_id,
                    secret_access_key,
                    session_token,
                    None,
                    "stackup-environment",
                ));
            }
            CredentialSource::Profile(profile) => {
                debug!("Using AWS profile {}", profile);
                loader = loader.profile_name(profile);
            }
            CredentialSource::DefaultChain => {}
        }

        let config = loader.load().await;

        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) if is_not_found_error(&err) => Ok(false),
            Err(err) => Err(StorageError::probe(bucket, DisplayErrorContext(&err))),
        }
    }

    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> StorageResult<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload(bucket, key, e))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .server_side_encryption(ServerSideEncryption::Aes256)
            .send()
            .await
            .map_err(|e| StorageError::upload(bucket, key, DisplayErrorContext(&e)))?;

        Ok(())
    }
}

/// Where the S3 client gets its credentials from
#[derive(Debug, Clone, PartialEq, Eq)]
enum CredentialSource {
    Static {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },
    Profile(String),
    DefaultChain,
}

impl CredentialSource {
    fn from_env(env: &Environment) -> Self {
        if let (Some(id), Some(secret)) =
            (env.get("AWS_ACCESS_KEY_ID"), env.get("AWS_SECRET_ACCESS_KEY"))
        {
            return Self::Static {
                access_key_id: id.to_string(),
                secret_access_key: secret.to_string(),
                session_token: env.get("AWS_SESSION_TOKEN").map(str::to_string),
            };
        }
        match env.get("AWS_PROFILE") {
            Some(profile) => Self::Profile(profile.to_string()),
            None => Self::DefaultChain,
        }
    }
}

/// HeadBucket reports a missing bucket as a 404 without an error body
fn is_not_found_error(err: &SdkError<HeadBucketError>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => {
            service_err.err().is_not_found() || service_err.raw().status().as_u16() == 404
        }
        _ => false,
    }
}
