//! Minimal S3-compatible object store client.
//!
//! Requests are authorised with SigV4 query-string presigning, so every
//! object operation is "presign, then plain HTTP".

use crate::ProviderError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Method};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// SigV4 escapes everything except unreserved characters.
const SIGV4_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');
const SIGV4_PATH_SET: &AsciiSet = &SIGV4_SET.remove(b'/');

#[derive(Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Custom endpoint (MinIO, LocalStack, ...). Without one the AWS
    /// virtual-hosted endpoint for `bucket` and `region` is used.
    pub endpoint: Option<String>,
    pub path_style: bool,
}

#[derive(Clone)]
pub struct S3Client {
    client: Client,
    cfg: Arc<S3Config>,
}

struct ObjectLocation {
    scheme: String,
    host: String,
    path: String,
}

impl S3Client {
    pub fn new(cfg: S3Config) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        Ok(Self {
            client,
            cfg: Arc::new(cfg),
        })
    }

    fn locate(&self, key: &str) -> Result<ObjectLocation, ProviderError> {
        let encoded_key = uri_encode(key, false);
        let Some(endpoint) = &self.cfg.endpoint else {
            return Ok(ObjectLocation {
                scheme: "https".to_string(),
                host: format!("{}.s3.{}.amazonaws.com", self.cfg.bucket, self.cfg.region),
                path: format!("/{}", encoded_key),
            });
        };

        let parsed = url::Url::parse(endpoint)
            .map_err(|e| ProviderError::RequestFailed(format!("bad endpoint {endpoint}: {e}")))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ProviderError::RequestFailed(format!("endpoint has no host: {endpoint}")))?;
        let host = match parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let path = if self.cfg.path_style {
            format!("/{}/{}", uri_encode(&self.cfg.bucket, false), encoded_key)
        } else {
            format!("/{}", encoded_key)
        };
        Ok(ObjectLocation {
            scheme: parsed.scheme().to_string(),
            host,
            path,
        })
    }

    /// Presigned URL for `method` on `key`, valid for `expires_secs` from now.
    pub fn presign(&self, method: &str, key: &str, expires_secs: u64) -> Result<String, ProviderError> {
        self.presign_at(method, key, expires_secs, Utc::now())
    }

    pub fn presign_at(
        &self,
        method: &str,
        key: &str,
        expires_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<String, ProviderError> {
        let loc = self.locate(key)?;
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let scope = format!("{}/{}/{}/aws4_request", date, self.cfg.region, SERVICE);
        let credential = format!("{}/{}", self.cfg.access_key_id, scope);

        // Already in sorted key order.
        let query = [
            ("X-Amz-Algorithm", ALGORITHM.to_string()),
            ("X-Amz-Credential", credential),
            ("X-Amz-Date", amz_date.clone()),
            ("X-Amz-Expires", expires_secs.to_string()),
            ("X-Amz-SignedHeaders", "host".to_string()),
        ]
        .iter()
        .map(|(k, v)| format!("{}={}", k, uri_encode(v, true)))
        .collect::<Vec<_>>()
        .join("&");

        let canonical_request = format!(
            "{}\n{}\n{}\nhost:{}\n\nhost\nUNSIGNED-PAYLOAD",
            method, loc.path, query, loc.host
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = [self.cfg.region.as_str(), SERVICE, "aws4_request"].iter().try_fold(
            hmac_sha256(format!("AWS4{}", self.cfg.secret_access_key).as_bytes(), date.as_bytes())?,
            |k, part| hmac_sha256(&k, part.as_bytes()),
        )?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        Ok(format!(
            "{}://{}{}?{}&X-Amz-Signature={}",
            loc.scheme, loc.host, loc.path, query, signature
        ))
    }

    /// Downloads an object through a URL presigned for `expires_secs`.
    ///
    /// An expired URL comes back as a non-success status and surfaces as
    /// `ProviderError::Fetch`.
    pub async fn get_object(&self, key: &str, expires_secs: u64) -> Result<Bytes, ProviderError> {
        let url = self.presign("GET", key, expires_secs)?;
        debug!(bucket = %self.cfg.bucket, key, "fetching object");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Fetch(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ProviderError::Fetch(format!(
                "S3 fetch failed: {}",
                resp.status().as_u16()
            )));
        }
        resp.bytes()
            .await
            .map_err(|e| ProviderError::Fetch(e.to_string()))
    }

    /// Deletes an object. Deleting a missing object is not an error.
    pub async fn delete_object(&self, key: &str, expires_secs: u64) -> Result<(), ProviderError> {
        let url = self.presign("DELETE", key, expires_secs)?;
        let resp = self
            .client
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() && status.as_u16() != 404 {
            let body = resp.bytes().await.unwrap_or(Bytes::from_static(b""));
            return Err(ProviderError::RequestFailed(format!(
                "status {} body {:?}",
                status, body
            )));
        }
        Ok(())
    }
}

/// Object key addressed by a stored file URL: its trailing path segment,
/// with any query string or fragment dropped and percent-escapes decoded.
pub fn key_from_url(file_url: &str) -> Option<String> {
    let without_query = file_url
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let segment = without_query.rsplit('/').next().unwrap_or_default();
    if segment.is_empty() {
        return None;
    }
    Some(percent_decode_str(segment).decode_utf8_lossy().into_owned())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ProviderError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn uri_encode(input: &str, encode_slash: bool) -> String {
    let set = if encode_slash { SIGV4_SET } else { SIGV4_PATH_SET };
    utf8_percent_encode(input, set).to_string()
}
