// repositories/profile_repository.rs

use deadpool_postgres::{Client, Transaction};
use tokio_postgres::Row;
use uuid::Uuid;

use crate::models::profile::Profile;

pub struct ProfileRepository;

fn profile_from_row(row: &Row) -> Profile {
    Profile {
        id: row.get(0),
        username: row.get(1),
        full_name: row.get(2),
        avatar_url: row.get(3),
    }
}

impl ProfileRepository {
    /// Fetches a single profile by user id
    pub async fn find_by_id(
        client: &Client,
        user_id: Uuid,
    ) -> Result<Option<Profile>, tokio_postgres::Error> {
        let query = "SELECT id, username, full_name, avatar_url FROM profiles WHERE id = $1";
        let row = client.query_opt(query, &[&user_id]).await?;
        Ok(row.as_ref().map(profile_from_row))
    }

    /// Fetches every profile in `ids` with a single query. Used to hydrate a
    /// whole thread's senders in one round trip.
    pub async fn find_by_ids(
        client: &Client,
        ids: &[Uuid],
    ) -> Result<Vec<Profile>, tokio_postgres::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = "SELECT id, username, full_name, avatar_url FROM profiles WHERE id = ANY($1)";
        let rows = client.query(query, &[&ids]).await?;
        Ok(rows.iter().map(profile_from_row).collect())
    }

    /// Case-insensitive exact username lookup, used when starting a new
    /// conversation by name.
    pub async fn find_by_username(
        client: &Client,
        username: &str,
    ) -> Result<Option<Profile>, tokio_postgres::Error> {
        let query =
            "SELECT id, username, full_name, avatar_url FROM profiles WHERE username ILIKE $1";
        let row = client.query_opt(query, &[&username]).await?;
        Ok(row.as_ref().map(profile_from_row))
    }

    /// Inserts the display-data row for a newly registered user
    pub async fn create(
        transaction: &Transaction<'_>,
        user_id: Uuid,
        username: &str,
        full_name: Option<&str>,
    ) -> Result<(), tokio_postgres::Error> {
        let query = "INSERT INTO profiles (id, username, full_name) VALUES ($1, $2, $3)";
        transaction
            .execute(query, &[&user_id, &username, &full_name])
            .await?;
        Ok(())
    }
}
