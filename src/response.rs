use actix_web::HttpResponse;
use serde::Serialize;

/// Wire envelope for successful requests: `{statusCode, data, message, success}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
            success: true,
        }
    }

    /// 200 response with the envelope as body.
    pub fn ok(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Ok().json(Self::new(200, data, message))
    }

    /// 201 response with the envelope as body.
    pub fn created(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Created().json(Self::new(201, data, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_keys_are_camel_case() {
        let envelope = ApiResponse::new(200, serde_json::json!({"id": 1}), "ok");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "ok");
        assert!(value.get("data").is_some());
    }
}
