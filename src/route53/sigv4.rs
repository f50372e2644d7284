//! AWS Signature Version 4 request signing.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";

pub(super) struct Signer {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub service: String,
}

pub(super) fn amz_date(now: DateTime<Utc>) -> String {
    now.format(AMZ_DATE_FORMAT).to_string()
}

pub(super) fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &str) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn canonical_query(url: &url::Url) -> String {
    let mut pairs: Vec<&str> = url
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .collect();
    pairs.sort_unstable();
    pairs.join("&")
}

/// Lowercases, trims and sorts the headers that take part in the signature.
fn canonical_headers(headers: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut canonical: Vec<(String, String)> = headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.trim().to_string()))
        .collect();
    canonical.sort();
    canonical
}

impl Signer {
    fn signing_key(&self, date: &str) -> Vec<u8> {
        let k_date = hmac_sha256(format!("AWS4{}", self.secret_access_key).as_bytes(), date);
        let k_region = hmac_sha256(&k_date, &self.region);
        let k_service = hmac_sha256(&k_region, &self.service);
        hmac_sha256(&k_service, "aws4_request")
    }

    /// Value of the `Authorization` header for the request.
    ///
    /// `headers` must contain every header that is signed, including `host`
    /// and `x-amz-date` matching `now`.
    pub fn authorization(
        &self,
        method: &str,
        url: &url::Url,
        headers: &[(&str, &str)],
        payload_hash: &str,
        now: DateTime<Utc>,
    ) -> String {
        let headers = canonical_headers(headers);
        let signed_headers = headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");
        let header_block: String = headers
            .iter()
            .map(|(name, value)| format!("{name}:{value}\n"))
            .collect();

        let canonical_request = format!(
            "{method}\n{}\n{}\n{header_block}\n{signed_headers}\n{payload_hash}",
            url.path(),
            canonical_query(url),
        );

        let date = now.format(DATE_FORMAT).to_string();
        let scope = format!("{date}/{}/{}/aws4_request", self.region, self.service);
        let string_to_sign = format!(
            "{ALGORITHM}\n{}\n{scope}\n{}",
            amz_date(now),
            sha256_hex(canonical_request.as_bytes())
        );

        let signature = format!(
            "{:x}",
            Hmac::<Sha256>::new_from_slice(&self.signing_key(&date))
                .expect("HMAC accepts keys of any length")
                .chain_update(string_to_sign.as_bytes())
                .finalize()
                .into_bytes()
        );

        format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.access_key_id
        )
    }
}
