//! UI theme definition.

use ratatui::style::{Color, Modifier, Style};

pub const NEON_GREEN: Color = Color::Rgb(0x00, 0xFF, 0x00);
pub const NEON_BLUE: Color = Color::Rgb(0x00, 0xFF, 0xFF);
pub const NEON_PURPLE: Color = Color::Rgb(0xFF, 0x00, 0xFF);
pub const NEON_PINK: Color = Color::Rgb(0xFF, 0x14, 0x93);
pub const YELLOW: Color = Color::Rgb(0xFF, 0xFF, 0x00);
pub const ORANGE: Color = Color::Rgb(0xFF, 0x88, 0x00);
pub const RED: Color = Color::Rgb(0xFF, 0x00, 0x00);
pub const DIM_GRAY: Color = Color::Rgb(0x40, 0x40, 0x40);

/// Severity band of a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Low,
    Light,
    Moderate,
    High,
    Critical,
}

/// `(exclusive upper bound, tier)`, in ascending order.
pub const TIER_BOUNDS: [(f64, Tier); 5] = [
    (30.0, Tier::Low),
    (50.0, Tier::Light),
    (70.0, Tier::Moderate),
    (90.0, Tier::High),
    (f64::INFINITY, Tier::Critical),
];

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::Low, Tier::Light, Tier::Moderate, Tier::High, Tier::Critical];

    pub fn for_percentage(percentage: f64) -> Self {
        TIER_BOUNDS
            .iter()
            .find(|(upper, _)| percentage < *upper)
            .map_or(Tier::Critical, |(_, tier)| *tier)
    }

    pub fn color(self) -> Color {
        match self {
            Tier::Low => NEON_GREEN,
            Tier::Light => NEON_BLUE,
            Tier::Moderate => YELLOW,
            Tier::High => ORANGE,
            Tier::Critical => RED,
        }
    }

    pub fn style(self) -> Style {
        Style::default().fg(self.color())
    }

    /// Range text shown in the help legend.
    pub fn range_label(self) -> &'static str {
        match self {
            Tier::Low => "0-30%",
            Tier::Light => "30-50%",
            Tier::Moderate => "50-70%",
            Tier::High => "70-90%",
            Tier::Critical => "90-100%",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tier::Low => "Low usage",
            Tier::Light => "Light usage",
            Tier::Moderate => "Moderate usage",
            Tier::High => "High usage",
            Tier::Critical => "Critical usage",
        }
    }
}

/// Coarse three-band colour for usage readouts (labels, percentages).
pub fn usage_color(percentage: f64) -> Color {
    if percentage < 30.0 {
        NEON_GREEN
    } else if percentage < 70.0 {
        YELLOW
    } else {
        RED
    }
}

/// Theme for the application UI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title_style: Style,
    pub key_style: Style,
    pub help_style: Style,
    pub border_style: Style,
    pub spinner_style: Style,
    pub paused_style: Style,
    pub time_style: Style,
    pub error_style: Style,
    pub cpu_label_style: Style,
    pub memory_label_style: Style,
    pub scale_style: Style,
    pub graph_border_style: Style,
    pub graph_title_style: Style,
    pub load_style: Style,
    pub process_style: Style,
    pub uptime_style: Style,
    pub section_style: Style,
    pub normal_text: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title_style: Style::default().fg(NEON_GREEN).add_modifier(Modifier::BOLD),
            key_style: Style::default().fg(NEON_BLUE),
            help_style: Style::default().fg(DIM_GRAY),
            border_style: Style::default().fg(NEON_PURPLE),
            spinner_style: Style::default().fg(NEON_PURPLE),
            paused_style: Style::default()
                .fg(YELLOW)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
            time_style: Style::default().fg(NEON_PINK),
            error_style: Style::default().fg(RED).add_modifier(Modifier::BOLD),
            cpu_label_style: Style::default().fg(NEON_BLUE),
            memory_label_style: Style::default().fg(NEON_PURPLE),
            scale_style: Style::default().fg(DIM_GRAY),
            graph_border_style: Style::default().fg(NEON_BLUE),
            graph_title_style: Style::default().fg(NEON_PURPLE).add_modifier(Modifier::BOLD),
            load_style: Style::default().fg(NEON_GREEN),
            process_style: Style::default().fg(NEON_PINK),
            uptime_style: Style::default().fg(YELLOW),
            section_style: Style::default()
                .fg(NEON_PURPLE)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            normal_text: Style::default().fg(Color::White),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-5.0, Tier::Low)]
    #[case(0.0, Tier::Low)]
    #[case(29.9, Tier::Low)]
    #[case(30.0, Tier::Light)]
    #[case(49.9, Tier::Light)]
    #[case(50.0, Tier::Moderate)]
    #[case(70.0, Tier::High)]
    #[case(89.99, Tier::High)]
    #[case(90.0, Tier::Critical)]
    #[case(250.0, Tier::Critical)]
    fn tier_boundaries(#[case] percentage: f64, #[case] expected: Tier) {
        assert_eq!(Tier::for_percentage(percentage), expected);
    }

    #[test]
    fn nan_falls_through_to_critical() {
        assert_eq!(Tier::for_percentage(f64::NAN), Tier::Critical);
    }

    #[test]
    fn bounds_are_ascending() {
        assert!(TIER_BOUNDS.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1));
    }

    #[rstest]
    #[case(10.0, NEON_GREEN)]
    #[case(30.0, YELLOW)]
    #[case(69.9, YELLOW)]
    #[case(70.0, RED)]
    fn usage_colors(#[case] percentage: f64, #[case] expected: Color) {
        assert_eq!(usage_color(percentage), expected);
    }
}
