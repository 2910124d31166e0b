//! EdgeGrid `EG1-HMAC-SHA256` request signing.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::{Digest, Sha256};
use time::{macros::format_description, OffsetDateTime};
use uuid::Uuid;

use crate::config::EdgegridSection;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "EG1-HMAC-SHA256";

#[derive(Debug, Clone)]
pub struct EdgegridSigner {
    client_token: String,
    client_secret: String,
    access_token: String,
    max_body: usize,
}

impl EdgegridSigner {
    pub fn new(section: &EdgegridSection) -> Self {
        Self {
            client_token: section.client_token.clone(),
            client_secret: section.client_secret.clone(),
            access_token: section.access_token.clone(),
            max_body: section.max_body,
        }
    }

    /// Build the `Authorization` header value for a request.
    pub fn authorization(&self, method: &str, url: &Url, body: &[u8]) -> Result<String> {
        let timestamp = OffsetDateTime::now_utc()
            .format(format_description!(
                "[year][month][day]T[hour]:[minute]:[second]+0000"
            ))
            .context("Failed to format EdgeGrid timestamp")?;
        let nonce = Uuid::new_v4().to_string();

        Ok(self.sign(method, url, body, &timestamp, &nonce))
    }

    pub(crate) fn sign(
        &self,
        method: &str,
        url: &Url,
        body: &[u8],
        timestamp: &str,
        nonce: &str,
    ) -> String {
        let auth_header = format!(
            "{} client_token={};access_token={};timestamp={};nonce={};",
            ALGORITHM, self.client_token, self.access_token, timestamp, nonce
        );

        let method = method.to_uppercase();
        let relative_url = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };

        // Only POST bodies are hashed.
        let content_hash = if method == "POST" && !body.is_empty() {
            let end = body.len().min(self.max_body);
            STANDARD.encode(Sha256::digest(&body[..end]))
        } else {
            String::new()
        };

        let data_to_sign = [
            method.as_str(),
            url.scheme(),
            url.host_str().unwrap_or_default(),
            relative_url.as_str(),
            "",
            content_hash.as_str(),
            auth_header.as_str(),
        ]
        .join("\t");

        let signing_key = hmac_sha256_base64(self.client_secret.as_bytes(), timestamp.as_bytes());
        let signature = hmac_sha256_base64(signing_key.as_bytes(), data_to_sign.as_bytes());

        format!("{}signature={}", auth_header, signature)
    }
}

fn hmac_sha256_base64(key: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMESTAMP: &str = "20240115T08:00:00+0000";
    const NONCE: &str = "nonce-xx-xxxx-xxxx-xxxx-xxxxxxxxxxxx";

    fn signer(secret: &str) -> EdgegridSigner {
        EdgegridSigner {
            client_token: "akab-client-token".to_string(),
            client_secret: secret.to_string(),
            access_token: "akab-access-token".to_string(),
            max_body: 16,
        }
    }

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://akab-host.luna.akamaiapis.net{}", path)).unwrap()
    }

    fn signature_of(header: &str) -> &str {
        header.rsplit("signature=").next().unwrap()
    }

    #[test]
    fn header_format() {
        let header = signer("secret").sign("GET", &url("/"), b"", TIMESTAMP, NONCE);

        assert!(header.starts_with("EG1-HMAC-SHA256 client_token=akab-client-token;"));
        assert!(header.contains("access_token=akab-access-token;"));
        assert!(header.contains(&format!("timestamp={};", TIMESTAMP)));
        assert!(header.contains(&format!("nonce={};", NONCE)));
        // base64 of a 32-byte digest
        assert_eq!(signature_of(&header).len(), 44);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let s = signer("secret");
        let a = s.sign("GET", &url("/config-gtm/v1/domains/example.akadns.net"), b"", TIMESTAMP, NONCE);
        let b = s.sign("get", &url("/config-gtm/v1/domains/example.akadns.net"), b"", TIMESTAMP, NONCE);
        assert_eq!(a, b);
    }

    #[test]
    fn path_and_query_change_signature() {
        let s = signer("secret");
        let a = s.sign("GET", &url("/a"), b"", TIMESTAMP, NONCE);
        let b = s.sign("GET", &url("/b"), b"", TIMESTAMP, NONCE);
        let c = s.sign("GET", &url("/a?x=1"), b"", TIMESTAMP, NONCE);
        assert_ne!(signature_of(&a), signature_of(&b));
        assert_ne!(signature_of(&a), signature_of(&c));
    }

    #[test]
    fn secret_changes_signature() {
        let a = signer("alpha").sign("GET", &url("/"), b"", TIMESTAMP, NONCE);
        let b = signer("beta").sign("GET", &url("/"), b"", TIMESTAMP, NONCE);
        assert_ne!(signature_of(&a), signature_of(&b));
    }

    #[test]
    fn put_body_is_not_hashed() {
        let s = signer("secret");
        let a = s.sign("PUT", &url("/p"), br#"{"name":"a"}"#, TIMESTAMP, NONCE);
        let b = s.sign("PUT", &url("/p"), br#"{"name":"b"}"#, TIMESTAMP, NONCE);
        assert_eq!(a, b);
    }

    #[test]
    fn post_body_is_hashed_up_to_max_body() {
        let s = signer("secret");
        let a = s.sign("POST", &url("/p"), b"0123456789abcdef-tail-one", TIMESTAMP, NONCE);
        let b = s.sign("POST", &url("/p"), b"0123456789abcdef-tail-two", TIMESTAMP, NONCE);
        let c = s.sign("POST", &url("/p"), b"fedcba9876543210", TIMESTAMP, NONCE);
        // max_body is 16, so differences past it are ignored
        assert_eq!(a, b);
        assert_ne!(signature_of(&a), signature_of(&c));
    }

    #[test]
    fn authorization_uses_fresh_nonce() {
        let s = signer("secret");
        let a = s.authorization("GET", &url("/"), b"").unwrap();
        let b = s.authorization("GET", &url("/"), b"").unwrap();
        assert_ne!(a, b);
        assert!(a.contains("+0000;nonce="));
    }
}
