use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct ErrorDetail {
    status_code: u16,
    error: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    detail: String,
}

impl ErrorDetail {
    pub fn new(status_code: u16, error: impl ToString, detail: impl ToString) -> Self {
        ErrorDetail {
            status_code,
            error: error.to_string(),
            detail: detail.to_string(),
        }
    }
}
