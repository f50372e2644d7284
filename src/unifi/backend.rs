use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::common::{
    key_file_or_string, Backend, BackendSnafu, ConfigSnafu, DeviceGroup, HostRecord, RequestSnafu,
    Result, UpstreamSnafu,
};

use super::models::ListResponse;

pub const BACKEND_NAME: &str = "UniFi";

const HOSTS_ENDPOINT: &str = "/v1/hosts";
const DEVICES_ENDPOINT: &str = "/v1/devices";

pub struct UnifiBackend {
    api_key: String,
    hosts_url: url::Url,
    devices_url: url::Url,
}

fn endpoint_url(base_url: &url::Url, endpoint: &str) -> Result<url::Url> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| {
            ConfigSnafu {
                message: format!("{base_url} is not a HTTP URL"),
                prefix: "unifi_api_url",
            }
            .build()
        })?
        .pop_if_empty()
        .extend(endpoint.trim_start_matches('/').split('/'));
    Ok(url)
}

impl UnifiBackend {
    fn get_listing<T: DeserializeOwned>(&self, url: &url::Url, endpoint: &str) -> Result<Vec<T>> {
        tracing::debug!(
            url = url.as_str(),
            method = "GET",
            backend = BACKEND_NAME,
            "Sending request"
        );

        let response = match ureq::get(url.as_str())
            .set("X-API-KEY", &self.api_key)
            .set("Accept", "application/json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return UpstreamSnafu { endpoint, status }.fail();
            }
            Err(err) => {
                return Err(err).context(RequestSnafu {
                    url: url.as_str(),
                    method: "GET",
                });
            }
        };

        let listing = response
            .into_json::<ListResponse<T>>()
            .boxed_local()
            .context(BackendSnafu {
                message: format!("Failed to deserialize {endpoint} response"),
            })?
            .into_data();

        tracing::info!(
            backend = BACKEND_NAME,
            endpoint = endpoint,
            entries = listing.len(),
            "Read completed",
        );

        Ok(listing)
    }
}

impl Backend for UnifiBackend {
    fn fetch_hosts(&self) -> Result<Vec<HostRecord>> {
        self.get_listing(&self.hosts_url, HOSTS_ENDPOINT)
    }

    fn fetch_devices(&self) -> Result<Vec<DeviceGroup>> {
        self.get_listing(&self.devices_url, DEVICES_ENDPOINT)
    }
}

impl TryFrom<super::Config> for UnifiBackend {
    type Error = crate::common::Error;

    fn try_from(value: super::Config) -> Result<Self> {
        Ok(Self {
            api_key: key_file_or_string(value.api_key, "unifi_api_key")?,
            hosts_url: endpoint_url(&value.base_url, HOSTS_ENDPOINT)?,
            devices_url: endpoint_url(&value.base_url, DEVICES_ENDPOINT)?,
        })
    }
}
