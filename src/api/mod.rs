//! Project data source for the studio dashboard
//!
//! The dashboard only ever talks to a [`ProjectSource`]; the shipped
//! implementation is [`mock::MockProjectSource`], which serves canned data
//! after a simulated network delay.

pub mod mock;
pub mod worker;

pub use mock::{Latency, MockProjectSource};
pub use worker::{ApiWorker, Reply, Request};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Concept,
    #[serde(rename = "In Progress")]
    InProgress,
    Review,
    Complete,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectStatus::Concept => "Concept",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Review => "Review",
            ProjectStatus::Complete => "Complete",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    /// kgCO2e
    pub carbon: f32,
    /// Percent
    pub efficiency: f32,
    pub timeline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub location: String,
    pub status: ProjectStatus,
    /// Percent complete, 0..=100
    pub progress: u8,
    pub thumbnail: String,
    pub stats: ProjectStats,
    pub collaborators: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f32,
}

impl ChartPoint {
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self { name: name.into(), value }
    }
}

/// Monthly efficiency and per-phase carbon series for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectImpact {
    pub efficiency: Vec<ChartPoint>,
    pub carbon: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistRequest {
    pub project_id: Option<String>,
    pub prompt: String,
}

/// Asynchronous project backend
pub trait ProjectSource: Send + Sync + 'static {
    fn list_projects(&self) -> impl Future<Output = Result<Vec<Project>>> + Send;

    fn get_impact(&self, project_id: &str) -> impl Future<Output = Result<ProjectImpact>> + Send;

    fn create_project(&self, request: NewProject) -> impl Future<Output = Result<Project>> + Send;

    /// Design suggestions for a project (or for new projects when `project_id` is `None`)
    fn ai_assist(&self, request: AssistRequest) -> impl Future<Output = Result<Vec<String>>> + Send;
}
