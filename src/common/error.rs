use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{method} {url} failed: {source}"))]
    RequestError {
        url: String,
        method: String,
        source: ureq::Error,
    },
    #[snafu(display("UniFi API {endpoint} returned status {status}"))]
    UpstreamError { endpoint: String, status: u16 },
    #[snafu(display("WAN1 IP address not found in UniFi devices API response"))]
    ResolutionError,
    #[snafu(display("{message}"))]
    WriteError { message: String },
    #[snafu(display("{message}"))]
    ResponseError { message: String },
    #[snafu(display("{prefix}: {message}"))]
    ConfigError { prefix: String, message: String },
    #[snafu(display("{message}: {source}"))]
    BackendError {
        message: String,
        source: Box<dyn std::error::Error>,
    },
    #[snafu(display("{message}: {source}"))]
    FrontendError {
        message: String,
        source: Box<dyn std::error::Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
