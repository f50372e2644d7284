use snafu::prelude::*;

use crate::common::{
    key_file_or_string, ConfigSnafu, DnsChange, Frontend, FrontendSnafu, RequestSnafu,
    ResponseSnafu, Result, WriteSnafu,
};

use super::models::{
    change_batch_xml, change_info_id, error_message, API_VERSION, CHANGE_BATCH_COMMENT,
};
use super::sigv4::{amz_date, sha256_hex, Signer};

pub const FRONTEND_NAME: &str = "Route53";

/// Route 53 is a global service and is always signed against us-east-1.
const SIGNING_REGION: &str = "us-east-1";
const SIGNING_SERVICE: &str = "route53";
const HOSTED_ZONE_PREFIX: &str = "hostedzone/";

pub struct Route53Frontend {
    endpoint: url::Url,
    signer: Signer,
    session_token: Option<String>,
}

/// Accepts both `Z123` and the `/hostedzone/Z123` form returned by the API.
fn normalize_zone_id(zone_id: &str) -> &str {
    let zone_id = zone_id.trim_start_matches('/');
    zone_id
        .strip_prefix(HOSTED_ZONE_PREFIX)
        .unwrap_or(zone_id)
        .trim_matches('/')
}

impl Route53Frontend {
    fn rrset_url(&self, zone_id: &str) -> Result<url::Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ConfigSnafu {
                    message: format!("{} is not a HTTP URL", self.endpoint),
                    prefix: "route53_endpoint",
                }
                .build()
            })?
            .pop_if_empty()
            .extend(&[API_VERSION, "hostedzone", normalize_zone_id(zone_id), "rrset"]);
        Ok(url)
    }

    fn host_header(url: &url::Url) -> String {
        let host = url.host_str().unwrap_or_default();
        match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }
}

impl Frontend for Route53Frontend {
    fn apply_changes(&self, zone_id: &str, changes: &[DnsChange]) -> Result<String> {
        ensure!(
            !changes.is_empty(),
            ResponseSnafu {
                message: "Refusing to submit an empty change batch",
            }
        );

        let url = self.rrset_url(zone_id)?;
        let body = change_batch_xml(changes, CHANGE_BATCH_COMMENT);

        let now = chrono::Utc::now();
        let date = amz_date(now);
        let host = Self::host_header(&url);
        let mut signed: Vec<(&str, &str)> =
            vec![("host", host.as_str()), ("x-amz-date", date.as_str())];
        if let Some(token) = &self.session_token {
            signed.push(("x-amz-security-token", token.as_str()));
        }
        let authorization =
            self.signer
                .authorization("POST", &url, &signed, &sha256_hex(body.as_bytes()), now);

        tracing::debug!(
            url = url.as_str(),
            method = "POST",
            frontend = FRONTEND_NAME,
            changes = changes.len(),
            "Sending request"
        );

        let mut request = ureq::post(url.as_str())
            .set("Content-Type", "text/xml")
            .set("Authorization", &authorization);
        for (name, value) in signed.iter().filter(|(name, _)| *name != "host") {
            request = request.set(name, value);
        }

        let response = match request.send_string(&body) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let document = response.into_string().unwrap_or_default();
                let message = error_message(&document)
                    .unwrap_or_else(|| format!("Route 53 returned status {status}"));
                return WriteSnafu { message }.fail();
            }
            Err(err) => {
                return Err(err).context(RequestSnafu {
                    url: url.as_str(),
                    method: "POST",
                });
            }
        };

        let document = response
            .into_string()
            .boxed_local()
            .context(FrontendSnafu {
                message: "Failed to read change response",
            })?;

        let change_id = change_info_id(&document).context(ResponseSnafu {
            message: "Change response did not contain a ChangeInfo Id",
        })?;

        tracing::debug!(
            frontend = FRONTEND_NAME,
            change_id = change_id.as_str(),
            "Change submitted",
        );

        Ok(change_id)
    }
}

impl TryFrom<super::Config> for Route53Frontend {
    type Error = crate::common::Error;

    fn try_from(value: super::Config) -> Result<Self> {
        Ok(Self {
            endpoint: value.endpoint,
            signer: Signer {
                access_key_id: value.access_key_id,
                secret_access_key: key_file_or_string(
                    value.secret_access_key,
                    "aws_secret_access_key",
                )?,
                region: SIGNING_REGION.to_string(),
                service: SIGNING_SERVICE.to_string(),
            },
            session_token: value.session_token.filter(|token| !token.is_empty()),
        })
    }
}
