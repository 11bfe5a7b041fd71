use crate::models::{FileRef, FileRow, NewFile};
use sqlx::SqlitePool;

pub async fn insert_user(pool: &SqlitePool, email: &str) -> Result<i64, sqlx::Error> {
    let res = sqlx::query("INSERT INTO users (email) VALUES (?1)")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(res.last_insert_rowid())
}

pub async fn insert_file(pool: &SqlitePool, file: &NewFile) -> Result<i64, sqlx::Error> {
    let res = sqlx::query(
        r#"
        INSERT INTO files (user_id, file_name, file_url, mime_type, file_size)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(file.user_id)
    .bind(&file.file_name)
    .bind(&file.file_url)
    .bind(&file.mime_type)
    .bind(file.file_size)
    .execute(pool)
    .await?;
    Ok(res.last_insert_rowid())
}

pub async fn get_file(pool: &SqlitePool, id: i64) -> Result<Option<FileRow>, sqlx::Error> {
    sqlx::query_as::<_, FileRow>("SELECT * FROM files WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_files(pool: &SqlitePool, user_id: i64) -> Result<Vec<FileRow>, sqlx::Error> {
    sqlx::query_as::<_, FileRow>("SELECT * FROM files WHERE user_id = ?1 ORDER BY id")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn list_file_refs(pool: &SqlitePool, user_id: i64) -> Result<Vec<FileRef>, sqlx::Error> {
    sqlx::query_as::<_, FileRef>(
        "SELECT id, file_name, file_url FROM files WHERE user_id = ?1 ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Returns the number of rows written; zero means the file does not exist.
pub async fn update_classification(
    pool: &SqlitePool,
    id: i64,
    category: &str,
    tags: &[String],
) -> Result<u64, sqlx::Error> {
    let tags_json = serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string());
    let res = sqlx::query("UPDATE files SET category = ?2, tags = ?3 WHERE id = ?1")
        .bind(id)
        .bind(category)
        .bind(tags_json)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_file(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM files WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
