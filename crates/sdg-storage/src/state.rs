use aws_sdk_s3::Client;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::objects;

/// Load a JSON document from S3.
pub async fn load_json<T: DeserializeOwned>(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<T, StorageError> {
    let output = objects::get_object(client, bucket, key).await?;
    let value: T = serde_json::from_slice(&output.body)?;
    Ok(value)
}

/// Load a JSON document along with its ETag.
pub async fn load_json_with_etag<T: DeserializeOwned>(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<(T, String), StorageError> {
    let output = objects::get_object(client, bucket, key).await?;
    let value: T = serde_json::from_slice(&output.body)?;
    Ok((value, output.etag.unwrap_or_default()))
}

/// Load a JSON document, treating a missing object as `None`.
pub async fn load_json_opt<T: DeserializeOwned>(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match load_json(client, bucket, key).await {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Save a JSON document to S3. Returns the new ETag.
pub async fn save_json<T: Serialize>(
    client: &Client,
    bucket: &str,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec(value)?;
    objects::put_object(client, bucket, key, body, Some("application/json")).await
}

/// Save a JSON document with ETag optimistic locking. Returns the new ETag.
pub async fn save_json_if_match<T: Serialize>(
    client: &Client,
    bucket: &str,
    key: &str,
    value: &T,
    expected_etag: &str,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec(value)?;
    objects::put_object_if_match(
        client,
        bucket,
        key,
        body,
        Some("application/json"),
        expected_etag,
    )
    .await
}

/// Load every JSON document under a prefix.
pub async fn load_all_json<T: DeserializeOwned>(
    client: &Client,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<T>, StorageError> {
    let keys = objects::list_objects(client, bucket, prefix).await?;
    let mut values = Vec::with_capacity(keys.len());
    for key in &keys {
        values.push(load_json(client, bucket, key).await?);
    }
    Ok(values)
}
