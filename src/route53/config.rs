#[derive(Clone, serde::Deserialize)]
pub struct Config {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub endpoint: url::Url,
}
