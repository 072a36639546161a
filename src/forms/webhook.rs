use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
struct Body {
    #[serde(rename = "type")]
    kind: Option<String>,
    topic: Option<String>,
    data: Option<BodyData>,
    id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct BodyData {
    id: Option<Value>,
}

/// A gateway notification, from the JSON body or the legacy query form
/// (`?type=payment&data.id=..` or `?topic=payment&id=..`)
#[derive(Debug, Default, PartialEq)]
pub struct GatewayNotification {
    pub kind: Option<String>,
    pub resource_id: Option<String>,
    /// `data.id` as sent in the query string, which is what gets signed
    pub signed_id: Option<String>,
}

fn id_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
}

impl GatewayNotification {
    /// Body fields win over query parameters; an unreadable body counts as empty
    pub fn parse(query: &HashMap<String, String>, body: &[u8]) -> Self {
        let body: Body = if body.iter().all(u8::is_ascii_whitespace) {
            Body::default()
        } else {
            serde_json::from_slice(body).unwrap_or_else(|err| {
                tracing::warn!("Unreadable webhook body: {}", err);
                Body::default()
            })
        };

        let query_value = |key: &str| {
            query
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let kind = body
            .kind
            .or(body.topic)
            .or_else(|| query_value("type"))
            .or_else(|| query_value("topic"));

        let signed_id = query_value("data.id");
        let resource_id = body
            .data
            .and_then(|data| data.id)
            .and_then(id_text)
            .or_else(|| body.id.and_then(id_text))
            .or_else(|| signed_id.clone())
            .or_else(|| query_value("id"));

        Self {
            kind,
            resource_id,
            signed_id,
        }
    }

    pub fn is_payment(&self) -> bool {
        self.kind.as_deref() == Some("payment")
    }

    /// Id covered by the signature: the query `data.id`, else the resource id
    pub fn signature_id(&self) -> Option<&str> {
        self.signed_id.as_deref().or(self.resource_id.as_deref())
    }

    /// False when the signed query id names another resource than the one
    /// that would be processed
    pub fn ids_agree(&self) -> bool {
        match (self.signed_id.as_deref(), self.resource_id.as_deref()) {
            (Some(signed), Some(resource)) => signed.eq_ignore_ascii_case(resource),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn json_body_with_numeric_id() {
        let n = GatewayNotification::parse(
            &HashMap::new(),
            br#"{"type":"payment","action":"payment.updated","data":{"id":1319283761}}"#,
        );
        assert!(n.is_payment());
        assert_eq!(n.resource_id.as_deref(), Some("1319283761"));
        assert_eq!(n.signature_id(), Some("1319283761"));
    }

    #[test]
    fn legacy_query_forms() {
        let n = GatewayNotification::parse(&query(&[("type", "payment"), ("data.id", "42")]), b"");
        assert!(n.is_payment());
        assert_eq!(n.resource_id.as_deref(), Some("42"));

        let n = GatewayNotification::parse(&query(&[("topic", "payment"), ("id", "43")]), b"");
        assert!(n.is_payment());
        assert_eq!(n.resource_id.as_deref(), Some("43"));
        assert_eq!(n.signed_id, None);
    }

    #[test]
    fn body_id_must_match_signed_query_id() {
        let n = GatewayNotification::parse(
            &query(&[("type", "payment"), ("data.id", "9005")]),
            br#"{"type":"payment","data":{"id":"9999"}}"#,
        );
        assert_eq!(n.resource_id.as_deref(), Some("9999"));
        assert_eq!(n.signature_id(), Some("9005"));
        assert!(!n.ids_agree());

        let n = GatewayNotification::parse(
            &query(&[("type", "payment"), ("data.id", "9005")]),
            br#"{"type":"payment","data":{"id":9005}}"#,
        );
        assert!(n.ids_agree());

        let n = GatewayNotification::parse(&HashMap::new(), br#"{"data":{"id":"1"}}"#);
        assert!(n.ids_agree());
    }

    #[test]
    fn other_topics_are_not_payments() {
        let n = GatewayNotification::parse(
            &query(&[("topic", "merchant_order"), ("id", "7")]),
            b"not json",
        );
        assert!(!n.is_payment());
    }
}
