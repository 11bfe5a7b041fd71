mod common;

use common::*;
use std::sync::Arc;
use vault_core::models::{BatchRetagSummary, Category, RetagOutcome};
use vault_core::retag::Retagger;
use vault_core::store::FileStore;

fn retagger(llm: Arc<StubLlm>, store: Arc<MemoryStore>) -> Retagger {
    let classifier = Arc::new(classifier(llm, StubFetcher::ok(), store.clone()));
    let store: Arc<dyn FileStore> = store;
    Retagger::new(classifier, store)
}

#[tokio::test]
async fn counts_tagged_files_and_keeps_first_error() {
    let log = new_log();
    let llm = StubLlm::new(log.clone(), |prompt| {
        if prompt.contains("broken") {
            Ok(text(""))
        } else {
            Ok(text(r#"{"category": "Documents", "tags": ["report"]}"#))
        }
    });
    let store = MemoryStore::new(
        log.clone(),
        vec![
            file_ref(1, "report.pdf"),
            file_ref(2, "letter.docx"),
            file_ref(3, "broken.pdf"),
        ],
    );
    let retagger = retagger(llm.clone(), store.clone());

    let outcome = retagger.retag_all(Some("7")).await;
    assert_eq!(
        outcome,
        RetagOutcome::Success(BatchRetagSummary {
            tagged: 2,
            total: 3,
            first_error: Some("Stub returned an empty response.".to_string()),
        })
    );

    let writes = store.writes();
    assert_eq!(
        writes.iter().map(|w| (w.id, w.category)).collect::<Vec<_>>(),
        vec![
            (1, Category::Pdfs),
            (2, Category::Documents),
            (3, Category::Uncategorized)
        ]
    );
}

#[tokio::test]
async fn files_are_visited_in_order_one_at_a_time() {
    let log = new_log();
    let llm = StubLlm::answering(log.clone(), r#"{"category": "PDFs", "tags": ["x"]}"#);
    let store = MemoryStore::new(
        log.clone(),
        vec![file_ref(10, "a.pdf"), file_ref(11, "b.pdf"), file_ref(12, "c.pdf")],
    );
    let retagger = retagger(llm, store);

    retagger.retag_all(Some("1")).await;
    let events = log.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "llm:start", "llm:end", "write:10",
            "llm:start", "llm:end", "write:11",
            "llm:start", "llm:end", "write:12",
        ]
    );
}

#[tokio::test]
async fn later_errors_do_not_replace_the_first() {
    let log = new_log();
    let llm = StubLlm::new(log.clone(), |prompt| {
        if prompt.contains("first-bad") {
            Ok(text("not json"))
        } else {
            Ok(text(""))
        }
    });
    let store = MemoryStore::new(
        log.clone(),
        vec![file_ref(1, "first-bad.pdf"), file_ref(2, "second-bad.pdf")],
    );
    let retagger = retagger(llm, store);

    let RetagOutcome::Success(summary) = retagger.retag_all(Some("1")).await else {
        panic!("expected success");
    };
    assert_eq!(summary.tagged, 0);
    assert_eq!(summary.total, 2);
    let first = summary.first_error.unwrap();
    assert!(first.starts_with("malformed response"), "{first}");
}

#[tokio::test]
async fn legacy_records_get_their_mime_type_from_the_name() {
    let log = new_log();
    let llm = StubLlm::answering(log.clone(), "{}");
    let store = MemoryStore::new(
        log.clone(),
        vec![
            file_ref(1, "clip.MP4"),
            file_ref(2, "deck.pptx"),
            file_ref(3, "data.csv"),
            file_ref(4, "archive.zip"),
        ],
    );
    let retagger = retagger(llm.clone(), store.clone());

    let outcome = retagger.retag_all(Some("3")).await;
    assert_eq!(
        outcome,
        RetagOutcome::Success(BatchRetagSummary {
            tagged: 4,
            total: 4,
            first_error: None,
        })
    );
    assert_eq!(llm.calls(), 0);
    let categories: Vec<Category> = store.writes().into_iter().map(|w| w.category).collect();
    assert_eq!(
        categories,
        vec![
            Category::Videos,
            Category::Presentations,
            Category::Spreadsheets,
            Category::Documents
        ]
    );
}

#[tokio::test]
async fn unauthenticated_calls_touch_nothing() {
    let log = new_log();
    let llm = StubLlm::answering(log.clone(), "{}");
    let store = MemoryStore::new(log.clone(), vec![file_ref(1, "a.pdf")]);
    let retagger = retagger(llm.clone(), store.clone());

    for user in [None, Some(""), Some("abc"), Some("0")] {
        assert_eq!(
            retagger.retag_all(user).await,
            RetagOutcome::Failure("Not authenticated".to_string())
        );
    }
    assert_eq!(store.list_calls(), 0);
    assert_eq!(llm.calls(), 0);
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn empty_library_is_a_zero_summary() {
    let log = new_log();
    let retagger = retagger(
        StubLlm::answering(log.clone(), "{}"),
        MemoryStore::new(log, vec![]),
    );
    assert_eq!(
        retagger.retag_all(Some("5")).await,
        RetagOutcome::Success(BatchRetagSummary::default())
    );
}

#[tokio::test]
async fn scalar_answers_are_not_counted_as_tagged() {
    let log = new_log();
    let store = MemoryStore::new(log.clone(), vec![file_ref(1, "a.pdf"), file_ref(2, "b.docx")]);
    let retagger = retagger(StubLlm::answering(log, "null"), store.clone());

    let RetagOutcome::Success(summary) = retagger.retag_all(Some("1")).await else {
        panic!("expected success");
    };
    assert_eq!(summary.tagged, 0);
    assert_eq!(summary.total, 2);
    assert_eq!(
        summary.first_error.as_deref(),
        Some("malformed response: expected a JSON object, got null")
    );
    assert!(store.writes().iter().all(|w| w.category == Category::Uncategorized));
}
