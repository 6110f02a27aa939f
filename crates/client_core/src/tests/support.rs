//! Recording collaborators shared by the action tests. Every side effect is
//! appended to one journal so tests can assert on ordering.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use super::*;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    Notified {
        message: String,
        options: ToastOptions,
    },
    Audited(AuditEvent),
    Requested {
        method: HttpMethod,
        path: String,
        body: Option<Value>,
    },
    Voted {
        id: LinkId,
        post_id: PostId,
        direction: VoteDirection,
    },
    LinksStored {
        post_id: PostId,
        links: Vec<Value>,
    },
}

#[derive(Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<Step>>>);

impl Journal {
    fn push(&self, step: Step) {
        self.0.lock().expect("journal lock").push(step);
    }

    pub(crate) fn steps(&self) -> Vec<Step> {
        self.0.lock().expect("journal lock").clone()
    }

    pub(crate) fn requests(&self) -> Vec<Step> {
        self.steps()
            .into_iter()
            .filter(|step| matches!(step, Step::Requested { .. }))
            .collect()
    }

    pub(crate) fn audits(&self) -> Vec<AuditEvent> {
        self.steps()
            .into_iter()
            .filter_map(|step| match step {
                Step::Audited(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn notifications(&self) -> Vec<String> {
        self.steps()
            .into_iter()
            .filter_map(|step| match step {
                Step::Notified { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }
}

pub(crate) struct RecordingTransport {
    journal: Journal,
    responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    delay: Option<Duration>,
}

impl RecordingTransport {
    pub(crate) fn respond_with(&self, response: Result<ApiResponse, TransportError>) {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(response);
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, TransportError> {
        self.journal.push(Step::Requested {
            method,
            path: path.to_string(),
            body,
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(200, Value::Null)))
    }
}

struct RecordingNotifier(Journal);

impl Notifier for RecordingNotifier {
    fn show_error(&self, message: &str, options: &ToastOptions) {
        self.0.push(Step::Notified {
            message: message.to_string(),
            options: *options,
        });
    }
}

struct RecordingAudit(Journal);

impl AuditSink for RecordingAudit {
    fn record(&self, event: AuditEvent) {
        self.0.push(Step::Audited(event));
    }
}

struct FixedAuth(bool);

impl AuthState for FixedAuth {
    fn is_logged_in(&self) -> bool {
        self.0
    }
}

struct RecordingLinks(Journal);

impl LinkStore for RecordingLinks {
    fn apply_vote(&self, id: &LinkId, post_id: &PostId, direction: VoteDirection) {
        self.0.push(Step::Voted {
            id: id.clone(),
            post_id: post_id.clone(),
            direction,
        });
    }

    fn set_related_links(&self, post_id: &PostId, links: &[Value]) {
        self.0.push(Step::LinksStored {
            post_id: post_id.clone(),
            links: links.to_vec(),
        });
    }
}

pub(crate) struct Harness {
    pub(crate) journal: Journal,
    pub(crate) transport: Arc<RecordingTransport>,
    pub(crate) context: ActionContext,
}

pub(crate) fn harness(logged_in: bool) -> Harness {
    build(logged_in, None)
}

pub(crate) fn slow_harness(logged_in: bool, delay: Duration) -> Harness {
    build(logged_in, Some(delay))
}

fn build(logged_in: bool, delay: Option<Duration>) -> Harness {
    let journal = Journal::default();
    let transport = Arc::new(RecordingTransport {
        journal: journal.clone(),
        responses: Mutex::new(VecDeque::new()),
        delay,
    });
    let context = ActionContext::new(
        transport.clone(),
        Arc::new(RecordingNotifier(journal.clone())),
        Arc::new(RecordingAudit(journal.clone())),
        Arc::new(FixedAuth(logged_in)),
        Arc::new(RecordingLinks(journal.clone())),
    );
    Harness {
        journal,
        transport,
        context,
    }
}

pub(crate) fn status_error(path: &str, status: u16, message: Option<&str>) -> TransportError {
    TransportError::Status {
        path: path.to_string(),
        status,
        message: message.map(str::to_string),
    }
}
