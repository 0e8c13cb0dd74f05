//! SQLite implementation of ListingRepository.
//!
//! One transaction per mutating operation keeps the atomicity contract:
//! concurrent status changes on the same listing serialize, and the event
//! log always matches the current status column.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::TryStreamExt;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::collections::BTreeMap;

use crate::domain::foundation::{ActorHandle, ActorId, EventId, ListingId, StateMachine, Timestamp};
use crate::domain::listing::{Listing, ListingStatus, PhotoRef, PublicationRef, StatusEvent};
use crate::domain::schema::FieldKey;
use crate::ports::{ListingRepository, StoreError};

/// SQLite implementation of [`ListingRepository`].
#[derive(Clone)]
pub struct SqliteListingStore {
    pool: SqlitePool,
}

impl SqliteListingStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for the given sqlite URL (e.g. `sqlite://data/desk.db?mode=rwc`).
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(db_err)?;
        Ok(Self::new(pool))
    }

    /// Creates the tables if they do not exist yet.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS listings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                creator_id INTEGER NOT NULL,
                creator_handle TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT '',
                property_kind TEXT NOT NULL DEFAULT '',
                street TEXT NOT NULL DEFAULT '',
                city TEXT NOT NULL DEFAULT '',
                district TEXT NOT NULL DEFAULT '',
                advantages TEXT NOT NULL DEFAULT '',
                rent TEXT NOT NULL DEFAULT '',
                deposit TEXT NOT NULL DEFAULT '',
                commission TEXT NOT NULL DEFAULT '',
                parking TEXT NOT NULL DEFAULT '',
                move_in_from TEXT NOT NULL DEFAULT '',
                viewings_from TEXT NOT NULL DEFAULT '',
                broker TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                channel_id INTEGER,
                message_id INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS listing_photos (
                listing_id INTEGER NOT NULL,
                pos INTEGER NOT NULL,
                photo_ref TEXT NOT NULL,
                FOREIGN KEY(listing_id) REFERENCES listings(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS status_events (
                event_id TEXT PRIMARY KEY,
                listing_id INTEGER NOT NULL,
                occurred_at TEXT NOT NULL,
                actor_id INTEGER NOT NULL,
                actor_handle TEXT NOT NULL,
                status TEXT NOT NULL,
                FOREIGN KEY(listing_id) REFERENCES listings(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Io(e.to_string())
}

// Uniform fractional-second format so lexicographic TEXT comparison matches
// chronological order in range queries.
fn encode_ts(ts: Timestamp) -> String {
    ts.as_datetime().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_ts(raw: &str) -> Result<Timestamp, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Timestamp::from_datetime(dt.with_timezone(&Utc)))
        .map_err(|e| StoreError::Io(format!("corrupt timestamp '{raw}': {e}")))
}

fn decode_status(raw: &str) -> Result<ListingStatus, StoreError> {
    raw.parse()
        .map_err(|_| StoreError::Io(format!("corrupt status '{raw}'")))
}

// The column set is closed: every FieldKey maps to a fixed column name, so
// interpolating it into UPDATE statements is safe.
fn column_for(key: FieldKey) -> &'static str {
    key.wire_name()
}

fn row_to_event(row: &SqliteRow) -> Result<StatusEvent, StoreError> {
    let event_id: String = row.try_get("event_id").map_err(db_err)?;
    let occurred_at: String = row.try_get("occurred_at").map_err(db_err)?;
    let status: String = row.try_get("status").map_err(db_err)?;
    Ok(StatusEvent {
        event_id: event_id
            .parse::<EventId>()
            .map_err(|e| StoreError::Io(format!("corrupt event id: {e}")))?,
        listing_id: ListingId::from_i64(row.try_get("listing_id").map_err(db_err)?),
        occurred_at: decode_ts(&occurred_at)?,
        actor_id: ActorId::from_i64(row.try_get("actor_id").map_err(db_err)?),
        actor_handle: ActorHandle::new(row.try_get::<String, _>("actor_handle").map_err(db_err)?),
        status: decode_status(&status)?,
    })
}

fn row_to_listing(row: &SqliteRow, photos: Vec<PhotoRef>) -> Result<Listing, StoreError> {
    let mut fields = BTreeMap::new();
    for key in FieldKey::all() {
        let value: String = row.try_get(column_for(*key)).map_err(db_err)?;
        fields.insert(*key, value);
    }

    let created_at: String = row.try_get("created_at").map_err(db_err)?;
    let status: String = row.try_get("status").map_err(db_err)?;
    let channel_id: Option<i64> = row.try_get("channel_id").map_err(db_err)?;
    let message_id: Option<i64> = row.try_get("message_id").map_err(db_err)?;
    let publication = match (channel_id, message_id) {
        (Some(channel), Some(message)) => Some(PublicationRef::new(channel, message)),
        (None, None) => None,
        _ => {
            return Err(StoreError::Io(
                "corrupt publication reference: half-set channel/message pair".to_string(),
            ))
        }
    };

    Ok(Listing::from_parts(
        ListingId::from_i64(row.try_get("id").map_err(db_err)?),
        decode_ts(&created_at)?,
        ActorId::from_i64(row.try_get("creator_id").map_err(db_err)?),
        ActorHandle::new(row.try_get::<String, _>("creator_handle").map_err(db_err)?),
        fields,
        photos,
        decode_status(&status)?,
        publication,
    ))
}

#[async_trait]
impl ListingRepository for SqliteListingStore {
    async fn create_listing(
        &self,
        creator_id: ActorId,
        creator_handle: ActorHandle,
    ) -> Result<Listing, StoreError> {
        let now = Timestamp::now();
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let result = sqlx::query(
            "INSERT INTO listings (created_at, creator_id, creator_handle, status) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(encode_ts(now))
        .bind(creator_id.as_i64())
        .bind(creator_handle.as_str())
        .bind(ListingStatus::Unknown.wire_name())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let id = ListingId::from_i64(result.last_insert_rowid());
        let event = StatusEvent::record(
            id,
            ListingStatus::Unknown,
            creator_id,
            creator_handle.clone(),
            now,
        );
        insert_event(&mut tx, &event).await?;

        tx.commit().await.map_err(db_err)?;
        Ok(Listing::new(id, now, creator_id, creator_handle))
    }

    async fn set_field(
        &self,
        id: ListingId,
        key: FieldKey,
        value: &str,
    ) -> Result<(), StoreError> {
        let query = format!("UPDATE listings SET {} = ?1 WHERE id = ?2", column_for(key));
        let result = sqlx::query(&query)
            .bind(value)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn append_photo(&self, id: ListingId, photo: PhotoRef) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM listings WHERE id = ?1")
            .bind(id.as_i64())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;
        if exists.is_none() {
            return Err(StoreError::NotFound(id));
        }

        sqlx::query(
            "INSERT INTO listing_photos (listing_id, pos, photo_ref) \
             SELECT ?1, COALESCE(MAX(pos), 0) + 1, ?2 FROM listing_photos WHERE listing_id = ?1",
        )
        .bind(id.as_i64())
        .bind(photo.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }

    async fn get_listing(&self, id: ListingId) -> Result<Listing, StoreError> {
        let row = sqlx::query("SELECT * FROM listings WHERE id = ?1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(StoreError::NotFound(id))?;

        let photo_rows = sqlx::query(
            "SELECT photo_ref FROM listing_photos WHERE listing_id = ?1 ORDER BY pos ASC",
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        let photos = photo_rows
            .iter()
            .map(|r| {
                r.try_get::<String, _>("photo_ref")
                    .map(PhotoRef::new)
                    .map_err(db_err)
            })
            .collect::<Result<Vec<_>, _>>()?;

        row_to_listing(&row, photos)
    }

    async fn record_status_change(
        &self,
        id: ListingId,
        status: ListingStatus,
        actor_id: ActorId,
        actor_handle: ActorHandle,
    ) -> Result<StatusEvent, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row: Option<(String, Option<i64>)> =
            sqlx::query_as("SELECT status, channel_id FROM listings WHERE id = ?1")
                .bind(id.as_i64())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;
        let (current_raw, channel_id) = row.ok_or(StoreError::NotFound(id))?;

        // Unpublished drafts are invisible to status changes; publication
        // marks the listing first and records `Active` after.
        if channel_id.is_none() {
            return Err(StoreError::NotFound(id));
        }

        let current = decode_status(&current_raw)?;
        if !current.can_transition_to(&status) {
            return Err(StoreError::InvalidTransition {
                from: current,
                to: status,
            });
        }

        sqlx::query("UPDATE listings SET status = ?1 WHERE id = ?2")
            .bind(status.wire_name())
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let event = StatusEvent::record(id, status, actor_id, actor_handle, Timestamp::now());
        insert_event(&mut tx, &event).await?;

        tx.commit().await.map_err(db_err)?;
        Ok(event)
    }

    async fn delete_listing(&self, id: ListingId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row: Option<(Option<i64>,)> =
            sqlx::query_as("SELECT channel_id FROM listings WHERE id = ?1")
                .bind(id.as_i64())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;
        let (channel_id,) = row.ok_or(StoreError::NotFound(id))?;
        if channel_id.is_some() {
            return Err(StoreError::DeletePublished(id));
        }

        for statement in [
            "DELETE FROM status_events WHERE listing_id = ?1",
            "DELETE FROM listing_photos WHERE listing_id = ?1",
            "DELETE FROM listings WHERE id = ?1",
        ] {
            sqlx::query(statement)
                .bind(id.as_i64())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)
    }

    async fn mark_published(
        &self,
        id: ListingId,
        publication: PublicationRef,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row: Option<(Option<i64>,)> =
            sqlx::query_as("SELECT channel_id FROM listings WHERE id = ?1")
                .bind(id.as_i64())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;
        let (channel_id,) = row.ok_or(StoreError::NotFound(id))?;
        if channel_id.is_some() {
            return Err(StoreError::AlreadyPublished(id));
        }

        sqlx::query("UPDATE listings SET channel_id = ?1, message_id = ?2 WHERE id = ?3")
            .bind(publication.channel_id)
            .bind(publication.message_id)
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }

    async fn events_in_range(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<StatusEvent>, StoreError> {
        let mut rows = sqlx::query(
            "SELECT event_id, listing_id, occurred_at, actor_id, actor_handle, status \
             FROM status_events \
             WHERE occurred_at >= ?1 AND occurred_at < ?2 \
             ORDER BY occurred_at ASC, rowid ASC",
        )
        .bind(encode_ts(start))
        .bind(encode_ts(end))
        .fetch(&self.pool);

        let mut events = Vec::new();
        while let Some(row) = rows.try_next().await.map_err(db_err)? {
            events.push(row_to_event(&row)?);
        }
        Ok(events)
    }
}

async fn insert_event(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    event: &StatusEvent,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO status_events (event_id, listing_id, occurred_at, actor_id, actor_handle, status) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(event.event_id.to_string())
    .bind(event.listing_id.as_i64())
    .bind(encode_ts(event.occurred_at))
    .bind(event.actor_id.as_i64())
    .bind(event.actor_handle.as_str())
    .bind(event.status.wire_name())
    .execute(&mut **tx)
    .await
    .map_err(db_err)?;
    Ok(())
}
