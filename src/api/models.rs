use serde::Deserialize;

/// JSON body for `POST /api/summarize`.
#[derive(Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
}

/// Form body posted by the summary page.
#[derive(Deserialize, Default)]
pub struct SummaryForm {
    #[serde(default)]
    pub url: String,
}
