/// A change requested through the control panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    SelectDataset(String),
    ToggleRegression(bool),
}

/// Dataset selector and regression toggle.
///
/// Returns `Some(ControlEvent)` on the frame where the user changed either
/// control, `None` otherwise. The controls are drawn from the given values;
/// they only change once the event has been applied.
pub fn show_controls<'a>(
    ui: &mut egui::Ui,
    names: impl Iterator<Item = &'a str>,
    active: Option<&str>,
    show_regression: bool,
) -> Option<ControlEvent> {
    let mut event = None;

    ui.label(egui::RichText::new("Dataset").strong());
    ui.add_space(2.0);
    egui::ComboBox::from_id_salt("dataset_selector")
        .selected_text(active.unwrap_or("\u{2014}"))
        .width(220.0)
        .show_ui(ui, |ui| {
            for name in names {
                if ui.selectable_label(active == Some(name), name).clicked() && active != Some(name) {
                    event = Some(ControlEvent::SelectDataset(name.to_string()));
                }
            }
        });

    ui.add_space(8.0);

    let mut checked = show_regression;
    if ui.checkbox(&mut checked, "Show regression line").changed() {
        event = Some(ControlEvent::ToggleRegression(checked));
    }

    event
}
