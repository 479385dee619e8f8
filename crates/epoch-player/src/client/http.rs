//! Response status handling shared by every request.

use epoch_core::responses::ApiErrorBody;

use crate::error::ClientError;

/// Pass successful responses through; turn anything else into
/// [`ClientError::Status`] carrying the server's `error` message.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn success_passes_through() {
        let resp = check_response(mock_response(200, "[]")).await.unwrap();
        assert_eq!(resp.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn error_body_message_is_kept() {
        let err = check_response(mock_response(404, r#"{"error":"Company not found"}"#))
            .await
            .unwrap_err();
        let ClientError::Status { status, message } = err else {
            panic!("expected status error");
        };
        assert_eq!(status, 404);
        assert_eq!(message, "Company not found");
    }

    #[tokio::test]
    async fn non_json_body_falls_back_to_reason() {
        let err = check_response(mock_response(502, "<html>bad gateway</html>"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Bad Gateway");
    }
}
