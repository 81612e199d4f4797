use axum::http::HeaderMap;

/// Header carrying an Instantly key.
pub const API_KEY_HEADER: &str = "x-instantly-api-key";

/// Path segments that name transport endpoints, never keys.
const RESERVED_SEGMENTS: [&str; 2] = ["sse", "messages"];

/// Resolve the caller's key for a multi-tenant HTTP request.
///
/// The URL path segment (`/mcp/{api_key}`) wins, then `x-instantly-api-key`,
/// then `Authorization` with or without a `Bearer ` prefix.
pub fn extract_api_key(path_key: Option<&str>, headers: &HeaderMap) -> Option<String> {
    path_key
        .map(str::trim)
        .filter(|key| !key.is_empty() && !RESERVED_SEGMENTS.contains(key))
        .map(str::to_string)
        .or_else(|| header_value(headers, API_KEY_HEADER).map(str::to_string))
        .or_else(|| {
            let value = headers.get("authorization")?.to_str().ok()?.trim_start();
            let token = value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
                .unwrap_or(value);
            Some(token.trim().to_string())
        })
        .filter(|key| !key.is_empty())
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
