use eframe::egui;
use serde_json::Value;
use tracing::warn;

use crate::color::Rgb;
use crate::gui::constants::*;
use crate::settings::schema::fields_in;
use crate::settings::{FieldKind, FieldSpec, Section, SettingsStore, Storage};

const NOISE_TOGGLE_KEY: &str = "noiseEnabled";

/// Settings side panel, one control per schema field. Every edit goes through
/// [`SettingsStore::set`]; returns whether the configuration changed.
pub fn ui<S: Storage>(ui: &mut egui::Ui, store: &mut SettingsStore<S>) -> bool {
    let record = match serde_json::to_value(store.settings()) {
        Ok(record) => record,
        Err(err) => {
            warn!(error = %err, "Failed to read settings for the panel");
            return false;
        }
    };
    let noise_enabled = store.settings().noise_enabled;

    let mut edits: Vec<(&'static str, Value)> = Vec::new();
    let mut reset = false;

    ui.heading("Background");
    ui.add_space(ITEM_SPACING);

    egui::ScrollArea::vertical().show(ui, |ui| {
        for section in Section::ALL {
            egui::CollapsingHeader::new(section.title())
                .default_open(true)
                .show(ui, |ui| {
                    for spec in fields_in(section) {
                        if is_hidden(spec, noise_enabled) {
                            continue;
                        }
                        let Some(current) = record.get(spec.key) else {
                            continue;
                        };
                        if let Some(value) = field_ui(ui, spec, current) {
                            edits.push((spec.key, value));
                        }
                    }
                });
            ui.add_space(ITEM_SPACING);
        }

        ui.add_space(SECTION_SPACING);
        if ui.button("Reset to Defaults").clicked() {
            reset = true;
        }
    });

    let mut changed = false;
    for (key, value) in edits {
        match store.set(key, value) {
            Ok(()) => changed = true,
            Err(err) => warn!(key, error = %err, "Rejected settings edit"),
        }
    }
    if reset {
        store.reset();
        changed = true;
    }

    if !store.last_write_succeeded() {
        ui.colored_label(STATUS_ERROR, "Settings could not be saved; changes apply to this session only");
    }

    changed
}

/// Texture controls other than the toggle only show while noise is on
fn is_hidden(spec: &FieldSpec, noise_enabled: bool) -> bool {
    spec.section == Section::Texture && spec.key != NOISE_TOGGLE_KEY && !noise_enabled
}

/// Draw one control; returns the new value when the user changed it
fn field_ui(ui: &mut egui::Ui, spec: &FieldSpec, current: &Value) -> Option<Value> {
    match spec.kind {
        FieldKind::Color => color_ui(ui, spec, current.as_str().unwrap_or_default()),
        FieldKind::Range { min, max, step } => {
            let mut value = current.as_f64().unwrap_or(min);
            let response = ui.add(egui::Slider::new(&mut value, min..=max).step_by(step).text(spec.label));
            response.changed().then(|| Value::from(spec.kind.clamp(value)))
        }
        FieldKind::Choice { options } => {
            let selected = current.as_str().unwrap_or_default();
            if options.len() == 2 {
                // Two-state choices render as a single toggle button
                let mut picked = None;
                ui.horizontal(|ui| {
                    ui.label(spec.label);
                    if ui.button(choice_label(options, selected)).clicked() {
                        picked = Some(Value::from(next_choice(options, selected)));
                    }
                });
                picked
            } else {
                let mut picked = None;
                ui.horizontal(|ui| {
                    ui.label(spec.label);
                    egui::ComboBox::from_id_salt(spec.key)
                        .selected_text(choice_label(options, selected))
                        .show_ui(ui, |ui| {
                            for (value, label) in options.iter() {
                                if ui.selectable_label(*value == selected, *label).clicked() && *value != selected {
                                    picked = Some(Value::from(*value));
                                }
                            }
                        });
                });
                picked
            }
        }
        FieldKind::Toggle => {
            let mut enabled = current.as_bool().unwrap_or_default();
            ui.checkbox(&mut enabled, spec.label)
                .changed()
                .then(|| Value::Bool(enabled))
        }
    }
}

/// Hex text box plus picker. The text box keeps a draft in egui's temp data
/// so half-typed colors survive between frames; only valid colors are emitted.
fn color_ui(ui: &mut egui::Ui, spec: &FieldSpec, current: &str) -> Option<Value> {
    let mut picked = None;
    ui.horizontal(|ui| {
        let draft_id = ui.make_persistent_id(("color_draft", spec.key));
        let mut draft = ui.data_mut(|d| d.get_temp::<String>(draft_id).unwrap_or_else(|| current.to_string()));

        let response = ui.add(egui::TextEdit::singleline(&mut draft).desired_width(HEX_FIELD_WIDTH));
        if response.changed() {
            if Rgb::parse_hex(&draft).is_some() {
                picked = Some(Value::from(draft.trim()));
            }
            ui.data_mut(|d| d.insert_temp(draft_id, draft.clone()));
        }
        if response.lost_focus() {
            ui.data_mut(|d| d.remove::<String>(draft_id));
        }

        let mut rgb = Rgb::parse_or(current, Rgb::BLACK).to_array();
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            picked = Some(Value::from(Rgb::from_array(rgb).to_hex()));
        }

        ui.label(spec.label);
    });
    picked
}

fn choice_label(options: &[(&'static str, &'static str)], selected: &str) -> &'static str {
    options
        .iter()
        .find(|(value, _)| *value == selected)
        .map(|(_, label)| *label)
        .unwrap_or("-")
}

/// The option after `selected`, wrapping around
fn next_choice(options: &[(&'static str, &'static str)], selected: &str) -> &'static str {
    let index = options.iter().position(|(value, _)| *value == selected);
    let next = index.map_or(0, |i| (i + 1) % options.len());
    options[next].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemoryStorage;
    use crate::settings::schema::{FIELDS, describe};

    #[test]
    fn test_texture_controls_hidden_when_noise_off() {
        let toggle = describe("noiseEnabled").unwrap();
        let opacity = describe("noiseOpacityIdle").unwrap();
        let scale = describe("noiseSize").unwrap();

        assert!(!is_hidden(toggle, false));
        assert!(is_hidden(opacity, false));
        assert!(is_hidden(scale, false));
        assert!(!is_hidden(opacity, true));
        assert!(!is_hidden(describe("accentColor").unwrap(), false));
    }

    #[test]
    fn test_corner_toggle_alternates() {
        let FieldKind::Choice { options } = describe("borderRadius").unwrap().kind else {
            panic!("borderRadius should be a choice");
        };
        assert_eq!(next_choice(options, "9999px"), "40px");
        assert_eq!(next_choice(options, "40px"), "9999px");
        assert_eq!(next_choice(options, "13px"), "9999px");
        assert_eq!(choice_label(options, "9999px"), "Circle");
        assert_eq!(choice_label(options, "40px"), "Rounded Box");
    }

    #[test]
    fn test_panel_renders_every_section_without_edits() {
        let mut store = SettingsStore::load(MemoryStorage::new());
        let ctx = egui::Context::default();

        let mut changed = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |panel| {
                changed = super::ui(panel, &mut store);
            });
        });

        assert!(!changed);
        assert!(store.storage().raw(crate::constants::storage::SETTINGS_KEY).is_none());
        assert_eq!(FIELDS.len(), 31);
    }
}
