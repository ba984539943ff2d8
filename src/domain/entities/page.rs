use serde_json::Value;

use super::user_record::UserRecord;

/// One reply from a paginated collection endpoint.
///
/// `pages` is optional here because only the first page's count is used; the paginator
/// decides whether its absence is fatal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResponse {
    pub docs: Vec<Value>,
    pub pages: Option<u32>,
    pub total: Option<u64>,
}

impl PageResponse {
    /// Interpret a decoded response body.
    ///
    /// `docs` must be an array. `pages` and `total` accept a non-negative integer or a
    /// numeric string; any other shape is a malformed response.
    pub fn from_json(body: Value) -> Result<Self, String> {
        let Value::Object(mut body) = body else {
            return Err("response body is not a JSON object".into());
        };

        let docs = match body.remove("docs") {
            Some(Value::Array(docs)) => docs,
            Some(_) => return Err("`docs` is not an array".into()),
            None => return Err("response is missing `docs`".into()),
        };

        let pages = match body.get("pages") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                as_count(value)
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| format!("`pages` is not a page count: {value}"))?,
            ),
        };

        let total = match body.get("total") {
            None | Some(Value::Null) => None,
            Some(value) => {
                Some(as_count(value).ok_or_else(|| format!("`total` is not a count: {value}"))?)
            }
        };

        Ok(Self { docs, pages, total })
    }

    /// Project the documents that carry an identity; the rest are dropped.
    pub fn records(&self) -> impl Iterator<Item = UserRecord> + '_ {
        self.docs.iter().filter_map(UserRecord::project)
    }
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
