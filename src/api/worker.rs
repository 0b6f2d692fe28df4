//! Background thread that drives a [`ProjectSource`] for the UI thread
//!
//! The UI sends [`Request`]s without blocking; each one runs as its own task
//! on a current-thread tokio runtime, and its [`Reply`] comes back over a
//! std channel followed by a call to the wake callback (a repaint request in
//! the studio window).

use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::mpsc;
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{debug, info, warn};

use super::{AssistRequest, NewProject, Project, ProjectImpact, ProjectSource};

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    ListProjects,
    Impact { project_id: String },
    CreateProject(NewProject),
    Assist(AssistRequest),
}

impl Request {
    fn name(&self) -> &'static str {
        match self {
            Request::ListProjects => "list_projects",
            Request::Impact { .. } => "get_impact",
            Request::CreateProject(_) => "create_project",
            Request::Assist(_) => "ai_assist",
        }
    }
}

#[derive(Debug)]
pub enum Reply {
    Projects(Result<Vec<Project>>),
    Impact { project_id: String, result: Result<ProjectImpact> },
    Created(Result<Project>),
    Suggestions(Result<Vec<String>>),
}

pub struct ApiWorker {
    requests: tokio_mpsc::UnboundedSender<Request>,
    replies: mpsc::Receiver<Reply>,
}

impl ApiWorker {
    /// Start the worker thread. `wake` runs after every reply is queued.
    pub fn spawn<S, W>(source: S, wake: W) -> Result<Self>
    where
        S: ProjectSource + Clone,
        W: Fn() + Send + Sync + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("Failed to build project source runtime")?;

        let (request_tx, mut request_rx) = tokio_mpsc::unbounded_channel::<Request>();
        let (reply_tx, reply_rx) = mpsc::channel();
        let wake: Arc<dyn Fn() + Send + Sync> = Arc::new(wake);

        std::thread::Builder::new()
            .name("project-source".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(request) = request_rx.recv().await {
                        debug!(request = request.name(), "Dispatching project request");
                        let source = source.clone();
                        let reply_tx = reply_tx.clone();
                        let wake = Arc::clone(&wake);
                        tokio::spawn(async move {
                            let reply = dispatch(&source, request).await;
                            if reply_tx.send(reply).is_ok() {
                                wake();
                            }
                        });
                    }
                });
                info!("Project source worker stopped");
            })
            .context("Failed to spawn project source thread")?;

        Ok(Self {
            requests: request_tx,
            replies: reply_rx,
        })
    }

    pub fn send(&self, request: Request) {
        if let Err(err) = self.requests.send(request) {
            warn!(request = err.0.name(), "Project source worker is gone, dropping request");
        }
    }

    /// Replies that arrived since the last poll, in arrival order
    pub fn poll(&self) -> Vec<Reply> {
        self.replies.try_iter().collect()
    }
}

async fn dispatch<S: ProjectSource>(source: &S, request: Request) -> Reply {
    match request {
        Request::ListProjects => Reply::Projects(source.list_projects().await),
        Request::Impact { project_id } => {
            let result = source.get_impact(&project_id).await;
            Reply::Impact { project_id, result }
        }
        Request::CreateProject(new_project) => Reply::Created(source.create_project(new_project).await),
        Request::Assist(assist) => Reply::Suggestions(source.ai_assist(assist).await),
    }
}
