//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use typewell::config::Config;
use typewell::notice::{Notice, Notifier};
use typewell::page::{BoundaryPoint, Document, NodeId, Page, Range};
use typewell::rewrite::{ChatClient, Rewriter};
use typewell::selection::TOKEN_ATTRIBUTE;
use typewell::store::MemoryStore;
use typewell::{Polisher, Tab};

pub const DRAFT: &str = "please reveiw the attached doc";
pub const NOTE: &str = "we should  meet tomorrow , ok";

/// Notifier that records every notice shown
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn was_shown(&self, notice: &Notice) -> bool {
        self.notices.lock().unwrap().contains(notice)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

/// A compose page: a textarea draft and a rich-text note editor
pub struct ComposePage {
    pub tab: Tab,
    pub draft: NodeId,
    pub editor: NodeId,
    pub note: NodeId,
}

impl ComposePage {
    pub fn new() -> Self {
        let mut doc = Document::new();
        let form = doc.append_element(doc.root(), "form").unwrap();
        let draft = doc.append_control(form, "textarea", None, DRAFT).unwrap();
        let editor = doc.append_element(doc.root(), "div").unwrap();
        doc.set_attribute(editor, "contenteditable", "true").unwrap();
        let p = doc.append_element(editor, "p").unwrap();
        let note = doc.append_text(p, NOTE).unwrap();

        Self {
            tab: Tab::new("https://mail.example.com/compose", Page::new(doc)),
            draft,
            editor,
            note,
        }
    }

    pub fn select_draft(&mut self, start: usize, end: usize) {
        self.tab.page.select_in_control(self.draft, start, end);
    }

    pub fn select_note(&mut self, start: usize, end: usize) {
        self.tab.page.focus = None;
        self.tab.page.select(Range::new(
            BoundaryPoint::new(self.note, start),
            BoundaryPoint::new(self.note, end),
        ));
    }

    pub fn draft_value(&self) -> String {
        self.tab.page.document.element(self.draft).unwrap().control.as_ref().unwrap().value.clone()
    }

    pub fn note_text(&self) -> String {
        self.tab.page.document.text_content(self.editor)
    }
}

/// True when capture left a token or marker in the page
pub fn has_residue(page: &Page) -> bool {
    let doc = &page.document;
    doc.tree_order().into_iter().any(|id| {
        doc.attribute(id, TOKEN_ATTRIBUTE).is_some()
            || doc
                .attribute(id, "id")
                .is_some_and(|v| v.starts_with("twStart_") || v.starts_with("twEnd_"))
    })
}

/// Mock rewrite endpoint answering every call with `status` and `content`
pub async fn rewrite_server(status: u16, content: &str) -> MockServer {
    let server = MockServer::start().await;
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
    } else {
        ResponseTemplate::new(status).set_body_string(content.to_string())
    };
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

/// Polisher against `server` with an API key stored
pub fn polisher(server: &MockServer, notifier: Arc<RecordingNotifier>) -> Polisher {
    let config = Config {
        endpoint: format!("{}/v1/chat/completions", server.uri()),
        ..Config::default()
    };
    let rewriter = Rewriter::new(
        Arc::new(ChatClient::new(&config)),
        Arc::new(MemoryStore::with_api_key("hf_test")),
    );
    Polisher::new(rewriter, notifier)
}

/// Polisher with no API key stored
pub fn offline_polisher(notifier: Arc<RecordingNotifier>) -> Polisher {
    let rewriter = Rewriter::new(
        Arc::new(ChatClient::new(&Config::default())),
        Arc::new(MemoryStore::new()),
    );
    Polisher::new(rewriter, notifier)
}
