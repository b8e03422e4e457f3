use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ── GitHub traffic ────────────────────────────────────────────────────────────

/// One day's traffic as reported by GitHub's `/traffic/views` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewRecord {
    pub timestamp: DateTime<Utc>,
    pub count: u64,
    pub uniques: u64,
}

/// Response envelope of `GET /repos/{owner}/{repo}/traffic/views`.
///
/// The top-level `count`/`uniques` are window totals; only the daily series
/// matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct TrafficResponse {
    pub views: Vec<ViewRecord>,
}

// ── Pending write ─────────────────────────────────────────────────────────────

/// A daily record that passed filtering and is queued for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub date: NaiveDate,
    pub count: u64,
    pub uniques: u64,
}

// ── kintone wire types ────────────────────────────────────────────────────────

/// kintone wraps every field in `{ "value": … }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValue<T> {
    pub value: T,
}

impl<T> FieldValue<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

/// `GET /k/v1/records.json` response. Only the date field is requested.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsResponse {
    pub records: Vec<StoredRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoredRecord {
    pub date: Option<FieldValue<String>>,
}

/// `POST /k/v1/record.json` request body.
#[derive(Debug, Clone, Serialize)]
pub struct InsertRequest {
    pub app: String,
    pub record: RecordFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordFields {
    pub project: FieldValue<String>,
    pub date: FieldValue<String>,
    pub count: FieldValue<u64>,
    pub uniques: FieldValue<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertResponse {
    pub id: String,
}

// ── Run outcome ───────────────────────────────────────────────────────────────

/// Result of a completed sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Every upstream record was already stored (or is today's partial data).
    NothingToDo,
    /// Ids of the records created, in write (ascending date) order.
    Recorded(Vec<String>),
}

impl SyncOutcome {
    /// Human-readable completion message for the invoking context.
    pub fn message(&self) -> String {
        match self {
            SyncOutcome::NothingToDo => "nothing to do".to_string(),
            SyncOutcome::Recorded(ids) => format!("record id: {}", ids.join(", ")),
        }
    }

    pub fn created(&self) -> usize {
        match self {
            SyncOutcome::NothingToDo => 0,
            SyncOutcome::Recorded(ids) => ids.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        assert_eq!(SyncOutcome::NothingToDo.message(), "nothing to do");
        let done = SyncOutcome::Recorded(vec!["7".into(), "8".into()]);
        assert_eq!(done.message(), "record id: 7, 8");
        assert_eq!(done.created(), 2);
    }

    #[test]
    fn test_traffic_response_deserializes() {
        let json = r#"{
            "count": 12,
            "uniques": 7,
            "views": [
                { "timestamp": "2024-01-01T00:00:00Z", "count": 5, "uniques": 3 },
                { "timestamp": "2024-01-02T00:00:00Z", "count": 7, "uniques": 4 }
            ]
        }"#;
        let resp: TrafficResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.views.len(), 2);
        assert_eq!(resp.views[0].count, 5);
        assert_eq!(resp.views[1].uniques, 4);
        assert_eq!(
            resp.views[1].timestamp.date_naive(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_insert_request_shape() {
        let req = InsertRequest {
            app: "42".into(),
            record: RecordFields {
                project: FieldValue::new("owner/repo".into()),
                date: FieldValue::new("2024-01-02".into()),
                count: FieldValue::new(7),
                uniques: FieldValue::new(4),
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["app"], "42");
        assert_eq!(json["record"]["project"]["value"], "owner/repo");
        assert_eq!(json["record"]["date"]["value"], "2024-01-02");
        assert_eq!(json["record"]["count"]["value"], 7);
        assert_eq!(json["record"]["uniques"]["value"], 4);
    }
}
