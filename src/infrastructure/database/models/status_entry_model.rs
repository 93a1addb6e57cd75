use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::database::schema::status_entries;

/// One key/value row. Status keys carry no expiry; rate-limit counters
/// carry the end of their current window.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = status_entries)]
#[diesel(primary_key(key))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusEntryModel {
    pub key: String,
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = status_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewStatusEntryModel {
    pub key: String,
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
}
