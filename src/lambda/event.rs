//! Netlify function invocation payloads (the AWS Lambda proxy shapes).

use crate::ordered::OrderedMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Inbound invocation event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<OrderedMap<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_headers: Option<OrderedMap<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<OrderedMap<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_query_string_parameters: Option<OrderedMap<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,
}

impl LambdaEvent {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            http_method: Some(method.into()),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(OrderedMap::new)
            .insert(name, value.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(OrderedMap::new)
            .insert(name, value.into());
        self
    }

    pub fn multi_query(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.multi_value_query_string_parameters
            .get_or_insert_with(OrderedMap::new)
            .insert(name, values);
        self
    }

    pub fn body(mut self, body: impl Into<String>, is_base64_encoded: bool) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = is_base64_encoded;
        self
    }
}

/// Outbound invocation result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaResult {
    pub status_code: u16,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: OrderedMap<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_headers: Option<OrderedMap<Vec<String>>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserialization() {
        let event: LambdaEvent = serde_json::from_str(
            r#"{
                "path": "/api/hello",
                "httpMethod": "POST",
                "headers": { "Content-Type": "text/plain" },
                "multiValueHeaders": null,
                "queryStringParameters": { "x": "1" },
                "multiValueQueryStringParameters": { "x": ["1", "2"] },
                "body": "aGk=",
                "isBase64Encoded": true,
                "resource": "/my/path"
            }"#,
        )
        .unwrap();

        assert_eq!(event.path, "/api/hello");
        assert_eq!(event.http_method.as_deref(), Some("POST"));
        assert!(event.multi_value_headers.is_none());
        assert_eq!(
            event.multi_value_query_string_parameters.unwrap().get("x"),
            Some(&vec!["1".to_string(), "2".to_string()])
        );
        assert!(event.is_base64_encoded);
    }

    #[test]
    fn test_result_serialization() {
        let result = LambdaResult {
            status_code: 200,
            headers: OrderedMap::new().with("content-type", "text/plain".to_string()),
            multi_value_headers: None,
            body: "ok".to_string(),
            is_base64_encoded: false,
        };
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"statusCode":200,"headers":{"content-type":"text/plain"},"body":"ok","isBase64Encoded":false}"#
        );
    }

    #[test]
    fn test_null_fields_use_defaults() {
        let event: LambdaEvent = serde_json::from_str(
            r#"{ "path": null, "httpMethod": "GET", "body": null, "isBase64Encoded": null }"#,
        )
        .unwrap();
        assert_eq!(event.path, "");
        assert!(event.body.is_none());
        assert!(!event.is_base64_encoded);

        let result: LambdaResult =
            serde_json::from_str(r#"{ "statusCode": 204, "headers": null, "body": null }"#)
                .unwrap();
        assert_eq!(result.status_code, 204);
        assert!(result.headers.is_empty());
        assert_eq!(result.body, "");
    }
}
