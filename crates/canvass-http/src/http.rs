//! Shared response handling: non-success statuses become
//! [`HttpBackendError::Api`] carrying the status and body.

use serde::de::DeserializeOwned;

use crate::error::HttpBackendError;

/// Return the response unchanged on success, otherwise an `Api` error with
/// the body as message (the reason phrase when the body is empty).
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, HttpBackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        body
    };
    Err(HttpBackendError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Decode a JSON body, reporting shape mismatches as `Parse`.
pub async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, HttpBackendError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| HttpBackendError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(mock_response(204, "")).await.is_ok());
    }

    #[tokio::test]
    async fn error_keeps_body() {
        let err = check_response(mock_response(422, "title: must not be empty"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HttpBackendError::Api { status: 422, ref message } if message == "title: must not be empty"
        ));
    }

    #[tokio::test]
    async fn empty_error_body_uses_reason() {
        let err = check_response(mock_response(404, "")).await.unwrap_err();
        assert!(matches!(
            err,
            HttpBackendError::Api { status: 404, ref message } if message == "Not Found"
        ));
    }

    #[tokio::test]
    async fn read_json_reports_shape_errors() {
        #[derive(serde::Deserialize, Debug)]
        struct Id {
            #[allow(dead_code)]
            id: String,
        }
        let err = read_json::<Id>(mock_response(200, "{\"nope\":1}")).await.unwrap_err();
        assert!(matches!(err, HttpBackendError::Parse(_)));
    }
}
