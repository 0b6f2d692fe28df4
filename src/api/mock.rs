//! In-process project source with simulated latency
//!
//! Created projects live only as long as the source (and its clones).

use anyhow::{Result, bail};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use super::{AssistRequest, ChartPoint, NewProject, Project, ProjectImpact, ProjectSource, ProjectStats, ProjectStatus};
use crate::constants::api::{
    ASSIST_LATENCY_MS, CREATE_LATENCY_MS, GENERATED_ID_LEN, IMPACT_LATENCY_MS, LIST_LATENCY_MS,
};

const EFFICIENCY_BASELINE: [(&str, f32); 6] =
    [("Jan", 65.0), ("Feb", 72.0), ("Mar", 68.0), ("Apr", 85.0), ("May", 82.0), ("Jun", 94.0)];
const CARBON_BASELINE: [(&str, f32); 5] = [("Ph1", 100.0), ("Ph2", 80.0), ("Ph3", 60.0), ("Ph4", 45.0), ("Ph5", 30.0)];

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Per-operation delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub list: Duration,
    pub impact: Duration,
    pub create: Duration,
    pub assist: Duration,
}

impl Latency {
    pub const INSTANT: Latency = Latency {
        list: Duration::ZERO,
        impact: Duration::ZERO,
        create: Duration::ZERO,
        assist: Duration::ZERO,
    };

    pub fn simulated() -> Self {
        Self {
            list: Duration::from_millis(LIST_LATENCY_MS),
            impact: Duration::from_millis(IMPACT_LATENCY_MS),
            create: Duration::from_millis(CREATE_LATENCY_MS),
            assist: Duration::from_millis(ASSIST_LATENCY_MS),
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::simulated()
    }
}

#[derive(Debug, Clone)]
pub struct MockProjectSource {
    projects: Arc<Mutex<Vec<Project>>>,
    latency: Latency,
}

impl MockProjectSource {
    pub fn new(latency: Latency) -> Self {
        Self {
            projects: Arc::new(Mutex::new(seed_projects())),
            latency,
        }
    }
}

impl Default for MockProjectSource {
    fn default() -> Self {
        Self::new(Latency::simulated())
    }
}

async fn delay(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

impl ProjectSource for MockProjectSource {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        delay(self.latency.list).await;
        Ok(self.projects.lock().await.clone())
    }

    async fn get_impact(&self, project_id: &str) -> Result<ProjectImpact> {
        delay(self.latency.impact).await;
        let multiplier = impact_multiplier(project_id)?;
        let scaled = |series: &[(&str, f32)]| -> Vec<ChartPoint> {
            series
                .iter()
                .map(|(name, value)| ChartPoint::new(*name, value * multiplier))
                .collect()
        };
        Ok(ProjectImpact {
            efficiency: scaled(&EFFICIENCY_BASELINE),
            carbon: scaled(&CARBON_BASELINE),
        })
    }

    async fn create_project(&self, request: NewProject) -> Result<Project> {
        delay(self.latency.create).await;
        let title = request.title.trim();
        if title.is_empty() {
            bail!("project title must not be empty");
        }

        let (id, picture) = {
            let mut rng = rand::rng();
            (generate_id(&mut rng), rng.random_range(0..100))
        };
        let project = Project {
            id,
            title: title.to_string(),
            location: "New Site (Pending)".to_string(),
            status: ProjectStatus::Concept,
            progress: 5,
            thumbnail: format!("https://picsum.photos/600/800?random={picture}"),
            stats: ProjectStats {
                carbon: 0.0,
                efficiency: 0.0,
                timeline: "TBD".to_string(),
            },
            collaborators: Vec::new(),
        };

        debug!(id = %project.id, title = %project.title, "Created project");
        self.projects.lock().await.push(project.clone());
        Ok(project)
    }

    async fn ai_assist(&self, request: AssistRequest) -> Result<Vec<String>> {
        delay(self.latency.assist).await;
        debug!(project = ?request.project_id, prompt = %request.prompt, "Assist requested");
        let scope = if request.project_id.is_some() { "this site" } else { "new projects" };
        Ok(vec![
            format!("Optimize glazing ratios for {scope} to reduce thermal gain."),
            "Consider hempcrete blocks for non-load bearing partitions.".to_string(),
            "Integrate passive ventilation stacks in the north quadrant.".to_string(),
        ])
    }
}

/// Scales the baseline series so each project gets its own curve
pub fn impact_multiplier(project_id: &str) -> Result<f32> {
    let Some(first) = project_id.chars().next() else {
        bail!("project id must not be empty");
    };
    Ok((first as u32 % 10) as f32 * 0.1 + 0.5)
}

fn generate_id(rng: &mut impl Rng) -> String {
    (0..GENERATED_ID_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

fn seed_projects() -> Vec<Project> {
    let project = |id: &str,
                   title: &str,
                   location: &str,
                   status: ProjectStatus,
                   progress: u8,
                   stats: (f32, f32, &str),
                   people: &[u32]| {
        Project {
            id: id.to_string(),
            title: title.to_string(),
            location: location.to_string(),
            status,
            progress,
            thumbnail: format!("https://picsum.photos/600/800?random={id}"),
            stats: ProjectStats {
                carbon: stats.0,
                efficiency: stats.1,
                timeline: stats.2.to_string(),
            },
            collaborators: people
                .iter()
                .map(|n| format!("https://picsum.photos/50/50?random={n}"))
                .collect(),
        }
    };

    vec![
        project(
            "1",
            "Neo-Tokyo Vertical Forest",
            "Shibuya, Tokyo",
            ProjectStatus::InProgress,
            75,
            (450.0, 92.0, "2025"),
            &[10, 11],
        ),
        project(
            "2",
            "Nordic Sea Museum",
            "Oslo, Norway",
            ProjectStatus::Concept,
            30,
            (120.0, 88.0, "2026"),
            &[12],
        ),
        project(
            "3",
            "Desert Bloom Pavilion",
            "Dubai, UAE",
            ProjectStatus::Review,
            90,
            (850.0, 95.0, "2024"),
            &[13, 14, 15],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_list_returns_seeded_projects_after_latency() {
        let source = MockProjectSource::default();
        let started = Instant::now();

        let projects = source.list_projects().await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(LIST_LATENCY_MS));
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Neo-Tokyo Vertical Forest", "Nordic Sea Museum", "Desert Bloom Pavilion"]);
        assert_eq!(projects[0].status, ProjectStatus::InProgress);
        assert_eq!(projects[2].collaborators.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_impact_scales_by_first_character() {
        let source = MockProjectSource::default();
        let started = Instant::now();

        // '1' is code 49: 9 * 0.1 + 0.5
        let impact = source.get_impact("1").await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(IMPACT_LATENCY_MS));
        assert_eq!(impact.efficiency.len(), 6);
        assert_eq!(impact.carbon.len(), 5);
        assert_eq!(impact.efficiency[0].name, "Jan");
        assert!((impact.efficiency[0].value - 65.0 * 1.4).abs() < 1e-3);
        assert_eq!(impact.carbon[4].name, "Ph5");
        assert!((impact.carbon[4].value - 30.0 * 1.4).abs() < 1e-3);
    }

    #[test]
    fn test_impact_multiplier() {
        assert!((impact_multiplier("2").unwrap() - 0.5).abs() < 1e-6);
        assert!((impact_multiplier("abc").unwrap() - 1.2).abs() < 1e-6);
        assert!(impact_multiplier("").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_created_project_is_listed() {
        let source = MockProjectSource::new(Latency::INSTANT);

        let created = source
            .create_project(NewProject { title: "  Harbor Library ".to_string() })
            .await
            .unwrap();

        assert_eq!(created.title, "Harbor Library");
        assert_eq!(created.id.len(), GENERATED_ID_LEN);
        assert!(created.id.bytes().all(|b| ID_ALPHABET.contains(&b)));
        assert_eq!(created.status, ProjectStatus::Concept);
        assert_eq!(created.progress, 5);
        assert_eq!(created.stats.timeline, "TBD");

        let projects = source.clone().list_projects().await.unwrap();
        assert_eq!(projects.len(), 4);
        assert_eq!(projects.last(), Some(&created));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_rejects_blank_title() {
        let source = MockProjectSource::new(Latency::INSTANT);
        assert!(source.create_project(NewProject { title: "   ".to_string() }).await.is_err());
        assert_eq!(source.list_projects().await.unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_assist_mentions_scope() {
        let source = MockProjectSource::default();
        let started = Instant::now();

        let for_project = source
            .ai_assist(AssistRequest { project_id: Some("1".to_string()), prompt: "shade".to_string() })
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(ASSIST_LATENCY_MS));
        assert_eq!(for_project.len(), 3);
        assert!(for_project[0].contains("this site"));

        let general = source
            .ai_assist(AssistRequest { project_id: None, prompt: String::new() })
            .await
            .unwrap();
        assert!(general[0].contains("new projects"));
    }
}
