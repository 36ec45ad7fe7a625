use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

/// Window theme. Also picks the plot and error colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn point_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(100, 170, 255),
            Theme::Light => Color32::from_rgb(30, 90, 200),
        }
    }

    pub fn line_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(255, 165, 0),
            Theme::Light => Color32::from_rgb(200, 60, 40),
        }
    }

    pub fn error_color(&self) -> Color32 {
        Color32::from_rgb(220, 60, 60)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::default().label(), "Dark");
    }

    #[test]
    fn toggle_alternates() {
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Dark.toggle().toggle(), Theme::Dark);
    }

    #[test]
    fn regression_line_stands_out_from_points() {
        for theme in [Theme::Dark, Theme::Light] {
            assert_ne!(theme.point_color(), theme.line_color(), "{}", theme.label());
        }
    }

    #[test]
    fn deserializes_from_variant_name() {
        let theme: Theme = serde_json::from_str("\"Light\"").unwrap();
        assert_eq!(theme, Theme::Light);
        assert!(!theme.visuals().dark_mode);
    }
}
