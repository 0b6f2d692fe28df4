//! Project dashboard: cards, impact charts, assistant and the new-project dialog
//!
//! All data comes back asynchronously as [`Reply`]s; this state only ever
//! moves forward from them. Failed requests keep whatever was shown before.

use eframe::egui;
use tracing::{error, info};

use crate::api::{AssistRequest, ChartPoint, NewProject, Project, ProjectImpact, Reply, Request};
use crate::gui::constants::*;

#[derive(Debug, Default)]
pub struct ProjectBoard {
    projects: Vec<Project>,
    loading: bool,
    selected: Option<String>,
    impact: Option<ProjectImpact>,
    impact_loading: bool,

    show_assistant: bool,
    prompt: String,
    suggestions: Vec<String>,
    assist_loading: bool,

    show_new_project: bool,
    new_title: String,
    creating: bool,

    last_error: Option<String>,
}

impl ProjectBoard {
    /// Board waiting for its first project list; send the returned request
    pub fn new() -> (Self, Request) {
        let board = Self {
            loading: true,
            ..Default::default()
        };
        (board, Request::ListProjects)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The background is focused whenever a project is selected
    pub fn is_focused(&self) -> bool {
        self.selected.is_some()
    }

    /// Change the selection; returns the impact request for the new project
    pub fn select(&mut self, project_id: Option<String>) -> Option<Request> {
        if project_id == self.selected {
            return None;
        }
        self.impact = None;
        self.selected = project_id.clone();
        self.impact_loading = project_id.is_some();
        project_id.map(|project_id| Request::Impact { project_id })
    }

    /// Fold one reply into the board; may return a follow-up request
    pub fn apply(&mut self, reply: Reply) -> Option<Request> {
        match reply {
            Reply::Projects(result) => {
                self.loading = false;
                match result {
                    Ok(projects) => {
                        info!(count = projects.len(), "Loaded projects");
                        self.projects = projects;
                    }
                    Err(err) => self.fail("Failed to fetch projects", &err),
                }
                None
            }
            Reply::Impact { project_id, result } => {
                // Impact for a project that is no longer selected is stale
                if self.selected.as_deref() != Some(project_id.as_str()) {
                    return None;
                }
                self.impact_loading = false;
                match result {
                    Ok(impact) => self.impact = Some(impact),
                    Err(err) => self.fail("Failed to fetch impact data", &err),
                }
                None
            }
            Reply::Created(result) => {
                self.creating = false;
                match result {
                    Ok(project) => {
                        let id = project.id.clone();
                        self.projects.push(project);
                        self.show_new_project = false;
                        self.new_title.clear();
                        self.select(Some(id))
                    }
                    Err(err) => {
                        self.fail("Failed to create project", &err);
                        None
                    }
                }
            }
            Reply::Suggestions(result) => {
                self.assist_loading = false;
                match result {
                    Ok(suggestions) => self.suggestions = suggestions,
                    Err(err) => self.fail("Assistant request failed", &err),
                }
                None
            }
        }
    }

    fn fail(&mut self, what: &str, err: &anyhow::Error) {
        error!(error = ?err, "{what}");
        self.last_error = Some(format!("{what}: {err}"));
    }

    /// Submit the new-project form; `None` while a title is missing or a create is in flight
    fn submit_new_project(&mut self) -> Option<Request> {
        let title = self.new_title.trim();
        if title.is_empty() || self.creating {
            return None;
        }
        self.creating = true;
        Some(Request::CreateProject(NewProject { title: title.to_string() }))
    }

    fn submit_prompt(&mut self) -> Option<Request> {
        if self.prompt.trim().is_empty() || self.assist_loading {
            return None;
        }
        self.assist_loading = true;
        Some(Request::Assist(AssistRequest {
            project_id: self.selected.clone(),
            prompt: self.prompt.clone(),
        }))
    }

    /// Draw the board; returns requests for the data source
    pub fn ui(&mut self, ui: &mut egui::Ui) -> Vec<Request> {
        let mut requests = Vec::new();

        ui.horizontal(|ui| {
            ui.heading("Projects");
            ui.add_space(SECTION_SPACING);
            if ui.button("+ New Project").clicked() {
                self.show_new_project = true;
            }
            if ui.selectable_label(self.show_assistant, "Assistant").clicked() {
                self.show_assistant = !self.show_assistant;
            }
            if self.selected.is_some() && ui.button("Clear selection").clicked() {
                requests.extend(self.select(None));
            }
        });

        if let Some(message) = &self.last_error {
            ui.colored_label(STATUS_ERROR, message);
        }
        ui.add_space(ITEM_SPACING);

        if self.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.colored_label(STATUS_PENDING, "Loading projects...");
            });
        } else {
            let mut clicked = None;
            ui.horizontal_wrapped(|ui| {
                for project in self.projects.iter() {
                    let selected = self.selected.as_deref() == Some(project.id.as_str());
                    if project_card(ui, project, selected).clicked() {
                        clicked = Some(if selected { None } else { Some(project.id.clone()) });
                    }
                }
            });
            if let Some(selection) = clicked {
                requests.extend(self.select(selection));
            }
        }

        if self.selected.is_some() {
            ui.add_space(SECTION_SPACING);
            self.impact_ui(ui);
        }

        if self.show_assistant {
            ui.add_space(SECTION_SPACING);
            requests.extend(self.assistant_ui(ui));
        }

        requests.extend(self.new_project_dialog(ui.ctx()));
        requests
    }

    fn impact_ui(&self, ui: &mut egui::Ui) {
        glass_frame().show(ui, |ui| {
            ui.label(egui::RichText::new("Impact Analysis").strong());
            ui.add_space(ITEM_SPACING);
            match (&self.impact, self.impact_loading) {
                (_, true) => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading impact data...");
                    });
                }
                (Some(impact), false) => {
                    ui.columns(2, |columns| {
                        columns[0].label("Efficiency (%)");
                        bar_chart(&mut columns[0], &impact.efficiency, EFFICIENCY_BAR);
                        columns[1].label("Carbon (kgCO2e)");
                        bar_chart(&mut columns[1], &impact.carbon, CARBON_BAR);
                    });
                }
                (None, false) => {
                    ui.label("No impact data");
                }
            }
        });
    }

    fn assistant_ui(&mut self, ui: &mut egui::Ui) -> Option<Request> {
        let mut request = None;
        glass_frame().show(ui, |ui| {
            ui.label(egui::RichText::new("Design Assistant").strong());
            ui.add_space(ITEM_SPACING);
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.prompt)
                        .hint_text("Ask for sustainable design ideas...")
                        .desired_width(ui.available_width() - 80.0),
                );
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if (submitted || ui.button("Ask").clicked()) && request.is_none() {
                    request = self.submit_prompt();
                }
            });
            if self.assist_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Thinking...");
                });
            }
            for suggestion in self.suggestions.iter() {
                ui.label(format!("\u{2022} {suggestion}"));
            }
        });
        request
    }

    fn new_project_dialog(&mut self, ctx: &egui::Context) -> Option<Request> {
        if !self.show_new_project {
            return None;
        }

        let mut open = true;
        let mut request = None;
        egui::Window::new("New Project")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Project title");
                ui.add(egui::TextEdit::singleline(&mut self.new_title).hint_text("e.g. Harbor Library"));
                ui.add_space(ITEM_SPACING);
                ui.horizontal(|ui| {
                    let label = if self.creating { "Creating..." } else { "Create" };
                    if ui.add_enabled(!self.creating, egui::Button::new(label)).clicked() {
                        request = self.submit_new_project();
                    }
                });
            });
        if !open {
            self.show_new_project = false;
        }
        request
    }
}

fn glass_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(GLASS_FILL)
        .corner_radius(CARD_ROUNDING)
        .inner_margin(PADDING)
}

fn project_card(ui: &mut egui::Ui, project: &Project, selected: bool) -> egui::Response {
    let stroke = if selected {
        egui::Stroke::new(2.0, CARD_SELECTED_STROKE)
    } else {
        egui::Stroke::NONE
    };

    let inner = egui::Frame::new()
        .fill(CARD_FILL)
        .stroke(stroke)
        .corner_radius(CARD_ROUNDING)
        .inner_margin(PADDING)
        .show(ui, |ui| {
            ui.set_min_size(egui::vec2(CARD_WIDTH, CARD_HEIGHT));
            ui.set_max_width(CARD_WIDTH);
            ui.label(egui::RichText::new(&project.title).strong().size(16.0));
            ui.label(&project.location);
            ui.label(project.status.to_string());
            ui.add(egui::ProgressBar::new(project.progress as f32 / 100.0).show_percentage());
            ui.label(format!(
                "{:.0} kgCO2e  \u{2022}  {:.0}% efficient  \u{2022}  {}",
                project.stats.carbon, project.stats.efficiency, project.stats.timeline
            ));
        });

    inner.response.interact(egui::Sense::click())
}

/// Minimal bar chart painted straight into the layout
fn bar_chart(ui: &mut egui::Ui, points: &[ChartPoint], color: egui::Color32) {
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, CHART_HEIGHT), egui::Sense::hover());
    if points.is_empty() {
        return;
    }

    let painter = ui.painter_at(rect);
    let peak = points.iter().map(|p| p.value).fold(f32::EPSILON, f32::max);
    let slot = rect.width() / points.len() as f32;
    let label_height = 14.0;
    let usable = rect.height() - label_height;

    for (i, point) in points.iter().enumerate() {
        let height = (point.value / peak).clamp(0.0, 1.0) * usable;
        let left = rect.left() + slot * i as f32 + slot * 0.2;
        let bar = egui::Rect::from_min_max(
            egui::pos2(left, rect.top() + usable - height),
            egui::pos2(left + slot * 0.6, rect.top() + usable),
        );
        painter.rect_filled(bar, 3.0, color);
        painter.text(
            egui::pos2(left + slot * 0.3, rect.bottom()),
            egui::Align2::CENTER_BOTTOM,
            &point.name,
            egui::FontId::proportional(11.0),
            ui.visuals().text_color(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ProjectStats, ProjectStatus};
    use anyhow::anyhow;

    fn project(id: &str) -> Project {
        Project {
            id: id.to_string(),
            title: format!("Project {id}"),
            location: "Somewhere".to_string(),
            status: ProjectStatus::Concept,
            progress: 10,
            thumbnail: String::new(),
            stats: ProjectStats { carbon: 1.0, efficiency: 2.0, timeline: "TBD".to_string() },
            collaborators: Vec::new(),
        }
    }

    fn impact(value: f32) -> ProjectImpact {
        ProjectImpact {
            efficiency: vec![ChartPoint::new("Jan", value)],
            carbon: vec![ChartPoint::new("Ph1", value)],
        }
    }

    fn loaded_board() -> ProjectBoard {
        let (mut board, request) = ProjectBoard::new();
        assert_eq!(request, Request::ListProjects);
        board.apply(Reply::Projects(Ok(vec![project("1"), project("2")])));
        board
    }

    #[test]
    fn test_selection_drives_focus_and_impact_requests() {
        let mut board = loaded_board();
        assert!(!board.is_focused());

        let request = board.select(Some("1".to_string()));
        assert_eq!(request, Some(Request::Impact { project_id: "1".to_string() }));
        assert!(board.is_focused());

        assert_eq!(board.select(Some("1".to_string())), None);
        assert_eq!(board.select(None), None);
        assert!(!board.is_focused());
    }

    #[test]
    fn test_stale_impact_is_ignored() {
        let mut board = loaded_board();
        board.select(Some("1".to_string()));
        board.select(Some("2".to_string()));

        board.apply(Reply::Impact { project_id: "1".to_string(), result: Ok(impact(1.0)) });
        assert!(board.impact.is_none());

        board.apply(Reply::Impact { project_id: "2".to_string(), result: Ok(impact(2.0)) });
        assert_eq!(board.impact, Some(impact(2.0)));
    }

    #[test]
    fn test_failed_refresh_keeps_prior_projects() {
        let mut board = loaded_board();

        board.apply(Reply::Projects(Err(anyhow!("network down"))));

        assert_eq!(board.projects().len(), 2);
        assert!(board.last_error.as_deref().is_some_and(|e| e.contains("network down")));
    }

    #[test]
    fn test_created_project_is_appended_and_selected() {
        let mut board = loaded_board();
        board.show_new_project = true;
        board.new_title = "Harbor".to_string();
        assert!(matches!(board.submit_new_project(), Some(Request::CreateProject(_))));
        assert_eq!(board.submit_new_project(), None);

        let follow_up = board.apply(Reply::Created(Ok(project("abc123xyz"))));

        assert_eq!(follow_up, Some(Request::Impact { project_id: "abc123xyz".to_string() }));
        assert_eq!(board.projects().len(), 3);
        assert_eq!(board.selected(), Some("abc123xyz"));
        assert!(!board.show_new_project);
        assert!(board.new_title.is_empty());
    }

    #[test]
    fn test_blank_inputs_are_not_submitted() {
        let mut board = loaded_board();
        board.new_title = "   ".to_string();
        assert_eq!(board.submit_new_project(), None);
        assert_eq!(board.submit_prompt(), None);
    }

    #[test]
    fn test_prompt_carries_selected_project() {
        let mut board = loaded_board();
        board.select(Some("2".to_string()));
        board.prompt = "rainwater".to_string();

        match board.submit_prompt() {
            Some(Request::Assist(request)) => {
                assert_eq!(request.project_id.as_deref(), Some("2"));
                assert_eq!(request.prompt, "rainwater");
            }
            other => panic!("unexpected request: {other:?}"),
        }

        board.apply(Reply::Suggestions(Ok(vec!["a".to_string()])));
        assert_eq!(board.suggestions, vec!["a".to_string()]);
        assert!(!board.assist_loading);
    }
}
