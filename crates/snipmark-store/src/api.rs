//! JSON request routing for the snippet API.
//!
//! Transport-agnostic: callers translate their HTTP framework's request into
//! an [`ApiRequest`] and write the returned [`ApiResponse`] back out.
//!
//! | Route | Success body |
//! |---|---|
//! | `POST /api/save` | `{"success":true,"id":"…"}` |
//! | `GET /api/get?id=…` | `{"code":"…"}` |
//! | `DELETE /api/delete?id=…` | `{"success":true,"id":"…"}` |
//! | `GET /api/list` | `{"success":true,"ids":[…],"list_complete":bool}` |
//!
//! Failures are `{"error":"…"}` with the status from [`StoreError::status`].

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::{SnippetId, SnippetService, StoreError};

/// Headers attached to every API response.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl Method {
    /// Parses an HTTP method name (case-insensitive).
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            "OPTIONS" => Some(Method::Options),
            _ => None,
        }
    }
}

/// A decoded API request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest<'a> {
    pub method: Method,
    pub path: &'a str,
    /// Decoded value of the `id` query parameter, if present
    pub id: Option<Cow<'a, str>>,
    pub body: &'a str,
}

impl<'a> ApiRequest<'a> {
    /// Splits a request target such as `/api/get?id=abc` into path and id.
    ///
    /// The query is form-decoded, so `%2D` and `+` arrive as `-` and space.
    pub fn new(method: Method, target: &'a str, body: &'a str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let id = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value);
        Self {
            method,
            path,
            id,
            body,
        }
    }
}

/// Status plus optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    fn json(status: u16, body: impl Serialize) -> Self {
        let body = serde_json::to_value(body).unwrap_or_else(|e| {
            tracing::warn!("Failed to encode response body: {}", e);
            Value::Null
        });
        Self {
            status,
            body: Some(body),
        }
    }

    fn preflight() -> Self {
        Self {
            status: 200,
            body: None,
        }
    }

    /// Response headers: CORS always, plus a JSON content type when there is a body.
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        let mut headers = Vec::with_capacity(CORS_HEADERS.len() + 1);
        if self.body.is_some() {
            headers.push(("Content-Type", "application/json"));
        }
        headers.extend(CORS_HEADERS);
        headers
    }

    /// Serialized body, empty for preflight responses.
    pub fn body_string(&self) -> String {
        self.body.as_ref().map(Value::to_string).unwrap_or_default()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<StoreError> for ApiResponse {
    fn from(err: StoreError) -> Self {
        ApiResponse::json(
            err.status(),
            ErrorBody {
                error: err.to_string(),
            },
        )
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct IdBody<'a> {
    success: bool,
    id: &'a SnippetId,
}

#[derive(Serialize)]
struct CodeBody<'a> {
    code: &'a str,
}

#[derive(Serialize)]
struct ListBody<'a> {
    success: bool,
    ids: &'a [SnippetId],
    list_complete: bool,
}

/// Routes an API request. Returns `None` for paths outside the API, which
/// the caller serves itself.
pub fn handle(service: &SnippetService, request: &ApiRequest<'_>) -> Option<ApiResponse> {
    if request.method == Method::Options {
        return Some(ApiResponse::preflight());
    }

    let id = request.id.as_deref().unwrap_or_default();
    let response = match (request.method, request.path) {
        (Method::Post, "/api/save") => match service.save(request.body) {
            Ok(id) => ApiResponse::json(200, IdBody { success: true, id: &id }),
            Err(err) => err.into(),
        },
        (Method::Get, "/api/get") => match service.get(id) {
            Ok(code) => ApiResponse::json(200, CodeBody { code: &code }),
            Err(err) => err.into(),
        },
        (Method::Delete, "/api/delete") => match service.delete(id) {
            Ok(id) => ApiResponse::json(200, IdBody { success: true, id: &id }),
            Err(err) => err.into(),
        },
        (Method::Get, "/api/list") => match service.list() {
            Ok(listing) => ApiResponse::json(
                200,
                ListBody {
                    success: true,
                    ids: &listing.ids,
                    list_complete: listing.complete,
                },
            ),
            Err(err) => err.into(),
        },
        _ => return None,
    };

    tracing::debug!(path = request.path, status = response.status, "api request");
    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn service() -> SnippetService {
        SnippetService::new(Arc::new(MemoryStore::default()))
    }

    fn call(service: &SnippetService, method: Method, target: &str, body: &str) -> ApiResponse {
        handle(service, &ApiRequest::new(method, target, body)).unwrap()
    }

    #[test]
    fn test_request_target_parsing() {
        let request = ApiRequest::new(Method::Get, "/api/get?x=1&id=ab12", "");
        assert_eq!(request.path, "/api/get");
        assert_eq!(request.id.as_deref(), Some("ab12"));

        let request = ApiRequest::new(Method::Get, "/api/list", "");
        assert_eq!(request.id, None);
    }

    #[test]
    fn test_request_id_is_decoded() {
        let request = ApiRequest::new(Method::Get, "/api/get?id=ab%2Dcd", "");
        assert_eq!(request.id.as_deref(), Some("ab-cd"));

        let request = ApiRequest::new(Method::Delete, "/api/delete?id=a+b", "");
        assert_eq!(request.id.as_deref(), Some("a b"));
    }

    #[test]
    fn test_encoded_id_reaches_store() {
        let service = service();
        let saved = call(&service, Method::Post, "/api/save", "return 1;");
        let id = saved.body.unwrap()["id"].as_str().unwrap().to_string();
        let encoded: String = id.chars().map(|c| format!("%{:02X}", c as u32)).collect();

        let fetched = call(&service, Method::Get, &format!("/api/get?id={}", encoded), "");
        assert_eq!(fetched.body, Some(json!({ "code": "return 1;" })));
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("delete"), Some(Method::Delete));
        assert_eq!(Method::parse("PATCH"), None);
    }

    #[test]
    fn test_save_get_delete_flow() {
        let service = service();

        let saved = call(&service, Method::Post, "/api/save", "let a = 1;");
        assert_eq!(saved.status, 200);
        let body = saved.body.unwrap();
        assert_eq!(body["success"], true);
        let id = body["id"].as_str().unwrap().to_string();

        let fetched = call(&service, Method::Get, &format!("/api/get?id={}", id), "");
        assert_eq!(fetched.body, Some(json!({ "code": "let a = 1;" })));

        let listed = call(&service, Method::Get, "/api/list", "");
        assert_eq!(
            listed.body,
            Some(json!({ "success": true, "ids": [id.clone()], "list_complete": true }))
        );

        let deleted = call(&service, Method::Delete, &format!("/api/delete?id={}", id), "");
        assert_eq!(deleted.body, Some(json!({ "success": true, "id": id })));

        let missing = call(&service, Method::Get, &format!("/api/get?id={}", id), "");
        assert_eq!(missing.status, 404);
        assert_eq!(missing.body, Some(json!({ "error": "Not found" })));
    }

    #[test]
    fn test_error_responses() {
        let service = service();
        assert_eq!(call(&service, Method::Post, "/api/save", "   ").status, 400);
        assert_eq!(call(&service, Method::Delete, "/api/delete", "").status, 400);

        let unconfigured = SnippetService::unconfigured();
        let response = call(&unconfigured, Method::Get, "/api/list", "");
        assert_eq!(response.status, 500);
        assert!(!response.is_success());
    }

    #[test]
    fn test_preflight_and_headers() {
        let response = call(&service(), Method::Options, "/anything", "");
        assert_eq!(response.status, 200);
        assert_eq!(response.body_string(), "");
        assert_eq!(response.headers().len(), 3);
        assert!(response.headers().contains(&("Access-Control-Allow-Origin", "*")));

        let listed = call(&service(), Method::Get, "/api/list", "");
        assert!(listed.headers().contains(&("Content-Type", "application/json")));
    }

    #[test]
    fn test_non_api_paths_fall_through() {
        assert!(handle(&service(), &ApiRequest::new(Method::Get, "/", "")).is_none());
        assert!(handle(&service(), &ApiRequest::new(Method::Put, "/api/save", "x")).is_none());
    }
}
