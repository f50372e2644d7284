use crate::common::{split_list, Backend, Frontend, Result};
use crate::route53::Route53Frontend;
use crate::unifi::{GatewayMatcher, UnifiBackend};

pub const DEFAULT_TTL: u32 = 300;
pub const DEFAULT_UNIFI_API_URL: &str = "https://api.ui.com";
pub const DEFAULT_ROUTE53_ENDPOINT: &str = "https://route53.amazonaws.com";

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_unifi_api_url() -> url::Url {
    url::Url::parse(DEFAULT_UNIFI_API_URL).expect("default UniFi API URL is valid")
}

fn default_route53_endpoint() -> url::Url {
    url::Url::parse(DEFAULT_ROUTE53_ENDPOINT).expect("default Route 53 endpoint is valid")
}

/// Settings read from the environment, one field per variable.
#[derive(Clone, serde::Deserialize)]
pub struct Config {
    pub unifi_api_key: String,
    #[serde(default = "default_unifi_api_url")]
    pub unifi_api_url: url::Url,
    /// Comma separated model substrings identifying the gateway.
    pub gateway_models: Option<String>,

    pub hosted_zone_id: String,
    pub record_name: String,
    pub record_name_wan2: Option<String>,
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_session_token: Option<String>,
    #[serde(default = "default_route53_endpoint")]
    pub route53_endpoint: url::Url,
}

impl Config {
    #[cfg(feature = "cli")]
    pub fn from_env() -> Result<Self> {
        Self::from_source(None)
    }

    /// Loads the configuration from `source`, or from the process
    /// environment when it is `None`.
    #[cfg(feature = "cli")]
    pub fn from_source(source: Option<config::Map<String, String>>) -> Result<Self> {
        let to_error = |err: config::ConfigError| {
            crate::common::ConfigSnafu {
                message: err.to_string(),
                prefix: "environment",
            }
            .build()
        };

        config::Config::builder()
            .add_source(config::Environment::default().source(source))
            .build()
            .map_err(to_error)?
            .try_deserialize()
            .map_err(to_error)
    }

    pub fn gateway_matcher(&self) -> GatewayMatcher {
        let models = self
            .gateway_models
            .as_deref()
            .map(split_list)
            .unwrap_or_default();
        if models.is_empty() {
            GatewayMatcher::default()
        } else {
            GatewayMatcher::new(models)
        }
    }

    pub fn service_config(&self) -> crate::service::Config {
        crate::service::Config {
            zone_id: self.hosted_zone_id.clone(),
            record_name: self.record_name.clone(),
            record_name_wan2: self
                .record_name_wan2
                .clone()
                .filter(|name| !name.trim().is_empty()),
            ttl: self.ttl,
        }
    }

    pub fn into_impls(self) -> Result<(Box<dyn Backend>, Box<dyn Frontend>)> {
        let backend: Box<dyn Backend> = Box::new(UnifiBackend::try_from(crate::unifi::Config {
            api_key: self.unifi_api_key,
            base_url: self.unifi_api_url,
        })?);

        let frontend: Box<dyn Frontend> =
            Box::new(Route53Frontend::try_from(crate::route53::Config {
                access_key_id: self.aws_access_key_id,
                secret_access_key: self.aws_secret_access_key,
                session_token: self.aws_session_token,
                endpoint: self.route53_endpoint,
            })?);

        Ok((backend, frontend))
    }

    pub fn get_service(self) -> Result<crate::service::DNSSync> {
        let service_config = self.service_config();
        let matcher = self.gateway_matcher();
        let (backend, frontend) = self.into_impls()?;
        Ok(crate::service::DNSSync::new(
            service_config,
            matcher,
            backend,
            frontend,
        ))
    }
}
