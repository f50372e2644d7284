#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Config {
    pub zone_id: String,

    pub record_name: String,

    pub record_name_wan2: Option<String>,

    pub ttl: u32,
}
