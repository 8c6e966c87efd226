use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::FillError;
use super::document::HtmlDocument;
use super::orchestrator::{FillConfig, fill_form};
use crate::model::{ControlValue, FillOutcome, ProfileRecord};

/// Messages a controller sends to the agent that owns a form page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    Ping,
    FillForm { data: ProfileRecord },
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Response {
    Pong { ready: bool, phase: FillPhase },
    Filled { result: FillOutcome },
    Snapshot { controls: Vec<ControlValue> },
    Failed { error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPhase {
    Idle,
    Filling,
    Completed,
    Failed,
}

/// Owns one form page and serves fill requests against it, one at a time.
pub struct FormAgent {
    document: Option<HtmlDocument>,
    config: FillConfig,
    phase: FillPhase,
}

impl FormAgent {
    pub fn new(config: FillConfig) -> Self {
        Self {
            document: None,
            config,
            phase: FillPhase::Idle,
        }
    }

    pub fn attach(&mut self, document: HtmlDocument) {
        self.document = Some(document);
        self.phase = FillPhase::Idle;
    }

    pub fn document(&self) -> Option<&HtmlDocument> {
        self.document.as_ref()
    }

    pub fn ping(&self) -> bool {
        self.document.is_some()
    }

    pub fn phase(&self) -> FillPhase {
        self.phase
    }

    pub fn fill(&mut self, record: &ProfileRecord) -> Result<FillOutcome, FillError> {
        let Some(document) = self.document.as_mut() else {
            self.phase = FillPhase::Failed;
            return Err(FillError::NoDocument);
        };

        self.phase = FillPhase::Filling;
        let outcome = fill_form(document, record, &self.config);
        debug!(events = document.events().len(), "dispatched form notifications");
        self.phase = FillPhase::Completed;
        Ok(outcome)
    }

    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Ping => Response::Pong {
                ready: self.ping(),
                phase: self.phase,
            },
            Request::FillForm { data } => match self.fill(&data) {
                Ok(result) => Response::Filled { result },
                Err(error) => Response::Failed {
                    error: error.to_string(),
                },
            },
            Request::Snapshot => match self.document() {
                Some(document) => Response::Snapshot {
                    controls: document.snapshot(),
                },
                None => Response::Failed {
                    error: FillError::NoDocument.to_string(),
                },
            },
        }
    }

    /// Decodes one JSON request and returns the encoded response. Undecodable
    /// requests are answered with a `failed` response rather than an error.
    pub fn handle_json(&mut self, payload: &str) -> Result<String, FillError> {
        let response = match serde_json::from_str::<Request>(payload) {
            Ok(request) => self.handle(request),
            Err(error) => Response::Failed {
                error: FillError::MalformedRequest(error.to_string()).to_string(),
            },
        };
        serde_json::to_string(&response).map_err(|error| FillError::Protocol(error.to_string()))
    }
}

struct Envelope {
    payload: String,
    reply: Sender<Result<String, FillError>>,
}

/// Controller-side end of a spawned agent.
pub struct AgentHandle {
    sender: Option<Sender<Envelope>>,
    worker: Option<JoinHandle<()>>,
}

/// Starts an agent thread that parses `markup` and serves JSON requests until
/// the handle is shut down. A page that fails to parse leaves the agent
/// without a document, so pings report not ready.
pub fn spawn_agent(markup: String, config: FillConfig) -> AgentHandle {
    let (sender, receiver) = mpsc::channel::<Envelope>();
    let worker = thread::spawn(move || serve(markup, config, receiver));

    AgentHandle {
        sender: Some(sender),
        worker: Some(worker),
    }
}

fn serve(markup: String, config: FillConfig, receiver: Receiver<Envelope>) {
    let mut agent = FormAgent::new(config);
    match HtmlDocument::parse(&markup) {
        Ok(document) => agent.attach(document),
        Err(error) => warn!(error = %error, "form agent started without a document"),
    }

    for envelope in receiver {
        debug!(bytes = envelope.payload.len(), "agent received request");
        let reply = agent.handle_json(&envelope.payload);
        if envelope.reply.send(reply).is_err() {
            debug!("controller dropped the reply channel");
        }
    }
    info!(phase = ?agent.phase(), "form agent stopped");
}

impl AgentHandle {
    pub fn call(&self, request: &Request) -> Result<Response, FillError> {
        let payload =
            serde_json::to_string(request).map_err(|error| FillError::Protocol(error.to_string()))?;
        let sender = self.sender.as_ref().ok_or(FillError::AgentGone)?;

        let (reply, replies) = mpsc::channel();
        sender
            .send(Envelope { payload, reply })
            .map_err(|_| FillError::AgentGone)?;
        let encoded = replies.recv().map_err(|_| FillError::AgentGone)??;

        serde_json::from_str(&encoded).map_err(|error| FillError::Protocol(error.to_string()))
    }

    pub fn shutdown(mut self) -> Result<(), FillError> {
        self.sender.take();
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| FillError::AgentGone),
            None => Ok(()),
        }
    }
}
