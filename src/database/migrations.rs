use tokio_postgres::Client;

/// Applies the schema at startup. Every statement is idempotent so the
/// service can be restarted against an existing database.
pub async fn apply_migrations(client: &Client) -> Result<(), tokio_postgres::Error> {
    client
        .execute("CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\"", &[])
        .await?;

    // Credential records, separate from public display data
    client
        .execute(
            "
        CREATE TABLE IF NOT EXISTS users (
            id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
            username VARCHAR(255) NOT NULL UNIQUE,
            password VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE
        )
    ",
            &[],
        )
        .await?;

    // Public display data referenced by messages and conversation summaries
    client
        .execute(
            "
        CREATE TABLE IF NOT EXISTS profiles (
            id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            username VARCHAR(255) NOT NULL UNIQUE,
            full_name VARCHAR(255),
            avatar_url TEXT
        )
    ",
            &[],
        )
        .await?;

    // direct_key is the canonical unordered participant pair of a direct
    // conversation; the partial unique index below is the invariant that at
    // most one direct conversation exists per pair.
    client
        .execute(
            "
        CREATE TABLE IF NOT EXISTS conversations (
            id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
            is_group BOOLEAN NOT NULL DEFAULT FALSE,
            direct_key TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
    ",
            &[],
        )
        .await?;

    client
        .execute(
            "
        CREATE UNIQUE INDEX IF NOT EXISTS conversations_direct_key_idx
            ON conversations (direct_key)
            WHERE NOT is_group
    ",
            &[],
        )
        .await?;

    // last_read_at is the per-participant read marker; NULL means the user
    // has never opened the conversation.
    client
        .execute(
            "
        CREATE TABLE IF NOT EXISTS conversation_participants (
            conversation_id UUID NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            last_read_at TIMESTAMPTZ,
            PRIMARY KEY (conversation_id, user_id)
        )
    ",
            &[],
        )
        .await?;

    client
        .execute(
            "
        CREATE TABLE IF NOT EXISTS messages (
            id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
            conversation_id UUID NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
            sender_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            content TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
    ",
            &[],
        )
        .await?;

    // History loads and last-message lookups both walk this index
    client
        .execute(
            "
        CREATE INDEX IF NOT EXISTS messages_conversation_created_idx
            ON messages (conversation_id, created_at)
    ",
            &[],
        )
        .await?;

    client
        .execute(
            "
        CREATE TABLE IF NOT EXISTS sessions (
            id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            token TEXT NOT NULL UNIQUE,
            expires_at TIMESTAMPTZ NOT NULL DEFAULT (NOW() + INTERVAL '30 days')
        )
    ",
            &[],
        )
        .await?;

    Ok(())
}
