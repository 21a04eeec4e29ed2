//! TUI theme and styling

use ratatui::style::Color;

use crate::task::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    // Background and borders
    pub background: Color,
    pub border: Color,
    pub selection: Color,
    pub bar: Color,

    // Text colors
    pub title: Color,
    pub text: Color,
    pub dimmed: Color,
    pub hint: Color,

    // Countdown state
    pub running: Color,
    pub finished: Color,
    pub error: Color,
    pub accent: Color,

    // Category badges
    pub work: Color,
    pub personal: Color,
    pub study: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 248, 242),
            border: Color::Rgb(190, 185, 170),
            selection: Color::Rgb(228, 224, 210),
            bar: Color::Rgb(238, 234, 222),

            title: Color::Rgb(40, 60, 120),
            text: Color::Rgb(40, 40, 40),
            dimmed: Color::Rgb(130, 125, 115),
            hint: Color::Rgb(90, 110, 150),

            running: Color::Rgb(20, 130, 80),
            finished: Color::Rgb(150, 150, 150),
            error: Color::Rgb(190, 50, 40),
            accent: Color::Rgb(30, 90, 200),

            work: Color::Rgb(30, 90, 200),
            personal: Color::Rgb(170, 60, 140),
            study: Color::Rgb(200, 120, 0),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(22, 24, 30),
            border: Color::Rgb(60, 66, 80),
            selection: Color::Rgb(45, 50, 62),
            bar: Color::Rgb(32, 35, 44),

            title: Color::Rgb(140, 180, 255),
            text: Color::Rgb(215, 218, 225),
            dimmed: Color::Rgb(110, 116, 130),
            hint: Color::Rgb(130, 160, 210),

            running: Color::Rgb(80, 220, 150),
            finished: Color::Rgb(100, 100, 110),
            error: Color::Rgb(255, 110, 95),
            accent: Color::Rgb(120, 170, 255),

            work: Color::Rgb(120, 170, 255),
            personal: Color::Rgb(230, 130, 210),
            study: Color::Rgb(255, 190, 80),
        }
    }

    pub fn category(&self, category: Category) -> Color {
        match category {
            Category::Work => self.work,
            Category::Personal => self.personal,
            Category::Study => self.study,
        }
    }
}
