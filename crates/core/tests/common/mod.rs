#![allow(dead_code)]

use providers::inference::InferenceClient;
use providers::{ContentPart, GenerateRequest, GenerateResponse, LlmProvider, ProviderError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storage::models::FileRef;
use vault_core::classifier::Classifier;
use vault_core::models::Category;
use vault_core::objectstore::ContentFetcher;
use vault_core::store::{FileStore, StoreError};

pub type EventLog = Arc<Mutex<Vec<String>>>;

type Respond = dyn Fn(&str) -> Result<GenerateResponse, ProviderError> + Send + Sync;

/// Answers from a closure over the concatenated prompt text.
pub struct StubLlm {
    respond: Box<Respond>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerateRequest>>,
    log: EventLog,
}

impl StubLlm {
    pub fn new(
        log: EventLog,
        respond: impl Fn(&str) -> Result<GenerateResponse, ProviderError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            log,
        })
    }

    pub fn answering(log: EventLog, body: &'static str) -> Arc<Self> {
        Self::new(log, move |_| Ok(text(body)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn text(body: &str) -> GenerateResponse {
    GenerateResponse {
        text: Some(body.to_string()),
        candidate_parts: Vec::new(),
    }
}

#[async_trait::async_trait]
impl LlmProvider for StubLlm {
    fn name(&self) -> &str {
        "stub"
    }

    fn display_name(&self) -> &str {
        "Stub"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.log.lock().unwrap().push("llm:start".to_string());
        tokio::task::yield_now().await;
        let prompt: String = request
            .parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::InlineData { .. } => None,
            })
            .collect();
        let answer = (self.respond)(&prompt);
        self.log.lock().unwrap().push("llm:end".to_string());
        answer
    }
}

pub struct StubFetcher {
    calls: AtomicUsize,
    fail: bool,
}

impl StubFetcher {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ContentFetcher for StubFetcher {
    async fn fetch_base64(&self, _file_url: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Fetch("S3 fetch failed: 403".into()));
        }
        Ok("aGVsbG8=".to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Write {
    pub id: i64,
    pub category: Category,
    pub tags: Vec<String>,
}

/// In-memory file table; remembers every classification write.
pub struct MemoryStore {
    files: Vec<FileRef>,
    writes: Mutex<Vec<Write>>,
    list_calls: AtomicUsize,
    fail_writes: bool,
    log: EventLog,
}

impl MemoryStore {
    pub fn new(log: EventLog, files: Vec<FileRef>) -> Arc<Self> {
        Arc::new(Self {
            files,
            writes: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            fail_writes: false,
            log,
        })
    }

    pub fn failing_writes(log: EventLog) -> Arc<Self> {
        Arc::new(Self {
            files: Vec::new(),
            writes: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            fail_writes: true,
            log,
        })
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FileStore for MemoryStore {
    async fn update_classification(
        &self,
        id: i64,
        category: Category,
        tags: &[String],
    ) -> Result<(), StoreError> {
        self.log.lock().unwrap().push(format!("write:{id}"));
        if self.fail_writes {
            return Err(StoreError::NotFound(id));
        }
        self.writes.lock().unwrap().push(Write {
            id,
            category,
            tags: tags.to_vec(),
        });
        Ok(())
    }

    async fn list_files(&self, _owner_id: i64) -> Result<Vec<FileRef>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.files.clone())
    }
}

pub fn file_ref(id: i64, name: &str) -> FileRef {
    FileRef {
        id,
        file_name: name.to_string(),
        file_url: format!("https://vault.s3.us-east-1.amazonaws.com/{id}-{name}"),
    }
}

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn classifier(llm: Arc<StubLlm>, fetcher: Arc<StubFetcher>, store: Arc<MemoryStore>) -> Classifier {
    let llm: Arc<dyn LlmProvider> = llm;
    let fetcher: Arc<dyn ContentFetcher> = fetcher;
    let store: Arc<dyn FileStore> = store;
    Classifier::new(InferenceClient::new(llm), fetcher, store)
}
