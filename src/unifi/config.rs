#[derive(Clone, serde::Deserialize)]
pub struct Config {
    pub api_key: String,
    pub base_url: url::Url,
}
