#![allow(dead_code)]

use async_trait::async_trait;
use bill_persona_connector::app_state::{AppState, Settings};
use bill_persona_connector::error::{Error, Result};
use bill_persona_connector::genai::{GenerateContentRequest, GenerativeModel};
use bill_persona_connector::push::{PushMessage, PushSender};
use bill_persona_connector::triggers::StoreEvent;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

/// Answers requests from a script, one reply per call. An exhausted script fails the call.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String>>>,
    pub requests: Mutex<Vec<GenerateContentRequest>>,
}

impl ScriptedModel {
    pub fn replying(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn unavailable() -> Error {
    Error::Gemini {
        status: 503,
        message: "model overloaded".to_string(),
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_content(&self, request: GenerateContentRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}

#[derive(Default)]
pub struct RecordingPush {
    pub sent: Mutex<Vec<PushMessage>>,
    pub fail: bool,
    /// Time each send takes, to let concurrent callers overlap.
    pub delay: Option<Duration>,
}

impl RecordingPush {
    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushSender for RecordingPush {
    async fn send(&self, message: PushMessage) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(Error::Push("device unregistered".to_string()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

pub struct TestApp {
    pub app_state: AppState,
    pub events: UnboundedReceiver<StoreEvent>,
    pub model: Arc<ScriptedModel>,
    pub push: Arc<RecordingPush>,
    // keeps the DB folder alive
    pub dir: TempDir,
}

pub fn test_app(replies: Vec<Result<String>>) -> TestApp {
    test_app_with_push(replies, RecordingPush::default())
}

pub fn test_app_with_push(replies: Vec<Result<String>>, push: RecordingPush) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::replying(replies);
    let push = Arc::new(push);
    let (app_state, events) =
        AppState::open(dir.path(), model.clone(), push.clone(), Settings::default()).unwrap();
    TestApp {
        app_state,
        events,
        model,
        push,
        dir,
    }
}

impl TestApp {
    /// Events published so far, without running their triggers.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
