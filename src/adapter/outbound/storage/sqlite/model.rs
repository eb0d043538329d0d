//! Database row types for the key/value table.

use diesel::prelude::*;

use super::schema::kv_entries;

/// One stored preference.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = kv_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KvEntryRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}
