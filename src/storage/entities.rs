use chrono::DateTime;
use chrono::Utc;

use serde::Deserialize;
use serde::Serialize;

use std::sync::Arc;

/// A record created by the user. Charts only look at the moment it was created; the title is
/// there for browsing.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize, Clone)]
pub struct CreationRecordEntity {
    #[serde(default = "empty_title")]
    pub title: Arc<str>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl CreationRecordEntity {
    pub fn new(title: impl Into<Arc<str>>, created_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            created_at,
        }
    }
}

fn empty_title() -> Arc<str> {
    "".into()
}
