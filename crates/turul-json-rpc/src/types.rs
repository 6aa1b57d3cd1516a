use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Correlation identifier linking a call to its response.
///
/// Calls carry a string or a number. Integers that fit in an `i64` decode as
/// `Number`; any other JSON number (above `i64::MAX`, or fractional) is kept
/// verbatim in `Numeric` so it echoes back unchanged. `Null` only appears on responses to
/// requests whose id could not be determined, or when a peer sent an explicit
/// `"id": null`. A notification has no id at all, which is modelled as
/// `Option::None` on [`crate::JsonRpcRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i64),
    Numeric(Number),
    Null,
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{}", s),
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::Numeric(n) => write!(f, "{}", n),
            RequestId::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

impl RequestId {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RequestId::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RequestId::Number(n) => Some(*n),
            RequestId::Numeric(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RequestId::Null)
    }
}

/// JSON-RPC version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonRpcVersion {
    #[default]
    V2_0,
}

impl JsonRpcVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonRpcVersion::V2_0 => crate::JSONRPC_VERSION,
        }
    }
}

impl fmt::Display for JsonRpcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            crate::JSONRPC_VERSION => Ok(JsonRpcVersion::V2_0),
            _ => Err(serde::de::Error::custom(format!("Invalid JSON-RPC version: {}", s))),
        }
    }
}

/// Deserializes an optional member so that an explicit `null` becomes
/// `Some(..)` rather than collapsing into `None`.
///
/// Use together with `#[serde(default)]` so a missing key still yields `None`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_id_serialization() {
        let id_str = RequestId::String("test".to_string());
        let id_num = RequestId::Number(42);

        assert_eq!(serde_json::to_string(&id_str).unwrap(), r#""test""#);
        assert_eq!(serde_json::to_string(&id_num).unwrap(), "42");
        assert_eq!(serde_json::to_string(&RequestId::Null).unwrap(), "null");
    }

    #[test]
    fn test_numeric_ids_outside_i64_round_trip() {
        let id: RequestId = serde_json::from_value(json!(u64::MAX)).unwrap();
        assert!(matches!(id, RequestId::Numeric(_)));
        assert_eq!(id.as_i64(), None);
        assert_eq!(id.to_string(), u64::MAX.to_string());
        assert_eq!(serde_json::to_value(&id).unwrap(), json!(u64::MAX));

        let id: RequestId = serde_json::from_value(json!(1.5)).unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), json!(1.5));

        let id: RequestId = serde_json::from_value(json!(-7)).unwrap();
        assert_eq!(id, RequestId::Number(-7));
    }

    #[test]
    fn test_request_id_accessors() {
        let named = RequestId::from("abc");
        assert_eq!(named.as_str(), Some("abc"));
        assert_eq!(named.as_i64(), None);
        assert!(!named.is_null());

        let numbered = RequestId::from(42i64);
        assert_eq!(numbered.as_i64(), Some(42));
        assert_eq!(numbered.as_str(), None);

        assert_eq!(RequestId::Null.as_str(), None);
        assert_eq!(RequestId::Null.as_i64(), None);
    }

    #[test]
    fn test_request_id_from_null() {
        let id: RequestId = serde_json::from_value(json!(null)).unwrap();
        assert!(id.is_null());
    }

    #[test]
    fn test_json_rpc_version() {
        let version = JsonRpcVersion::V2_0;
        assert_eq!(version.as_str(), "2.0");
        assert_eq!(serde_json::to_string(&version).unwrap(), r#""2.0""#);

        assert!(serde_json::from_value::<JsonRpcVersion>(json!("1.0")).is_err());
    }
}
