#[derive(serde::Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub(super) struct ListResponse<T> {
    /// Both a missing and a `null` listing read as empty.
    #[serde(default)]
    data: Option<Vec<T>>,
}

impl<T> ListResponse<T> {
    pub fn into_data(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}
