use storage::files;
use storage::models::NewFile;
use storage::{connect, migrate};

async fn setup(name: &str) -> sqlx::SqlitePool {
    let db = format!("sqlite://file:{name}?mode=memory&cache=shared");
    let pool = connect(&db).await.unwrap();
    migrate(&pool).await.unwrap();
    pool
}

fn new_file(user_id: i64, name: &str) -> NewFile {
    NewFile {
        user_id,
        file_name: name.to_string(),
        file_url: format!("https://vault.s3.us-east-1.amazonaws.com/{name}"),
        mime_type: None,
        file_size: 10,
    }
}

#[tokio::test]
async fn new_files_start_uncategorized_without_tags() {
    let pool = setup("storage_defaults").await;
    let user = files::insert_user(&pool, "a@example.com").await.unwrap();
    let id = files::insert_file(&pool, &new_file(user, "cat.png")).await.unwrap();

    let row = files::get_file(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.category, "Uncategorized");
    assert!(row.tag_list().is_empty());
}

#[tokio::test]
async fn update_classification_writes_category_and_tags() {
    let pool = setup("storage_update").await;
    let user = files::insert_user(&pool, "b@example.com").await.unwrap();
    let id = files::insert_file(&pool, &new_file(user, "deck.pptx")).await.unwrap();

    let tags = vec!["presentation".to_string(), "slides".to_string()];
    let n = files::update_classification(&pool, id, "Presentations", &tags)
        .await
        .unwrap();
    assert_eq!(n, 1);

    let row = files::get_file(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.category, "Presentations");
    assert_eq!(row.tag_list(), tags);
}

#[tokio::test]
async fn update_of_missing_row_touches_nothing() {
    let pool = setup("storage_missing").await;
    let n = files::update_classification(&pool, 999, "Photos", &[])
        .await
        .unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn listings_are_owner_scoped_and_ordered() {
    let pool = setup("storage_listing").await;
    let alice = files::insert_user(&pool, "alice@example.com").await.unwrap();
    let bob = files::insert_user(&pool, "bob@example.com").await.unwrap();
    let first = files::insert_file(&pool, &new_file(alice, "one.pdf")).await.unwrap();
    files::insert_file(&pool, &new_file(bob, "other.pdf")).await.unwrap();
    let second = files::insert_file(&pool, &new_file(alice, "two.mp4")).await.unwrap();

    let refs = files::list_file_refs(&pool, alice).await.unwrap();
    let ids: Vec<i64> = refs.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(refs[1].file_name, "two.mp4");

    assert_eq!(files::list_files(&pool, bob).await.unwrap().len(), 1);

    assert_eq!(files::delete_file(&pool, first).await.unwrap(), 1);
    assert_eq!(files::list_files(&pool, alice).await.unwrap().len(), 1);
}
