use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// Missing decisions are rejected as invalid by the review service.
    #[serde(default)]
    pub decision: String,
    pub comment: Option<String>,
}
