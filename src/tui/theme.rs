use ratatui::style::Color;

use crate::model::board::ThemeChoice;
use crate::model::task::{Priority, Status};

/// Color palette for the TUI, switchable between light and dark
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub highlight: Color,
    pub selection_bg: Color,
    pub error: Color,
    pub todo: Color,
    pub in_progress: Color,
    pub completed: Color,
    pub low: Color,
    pub medium: Color,
    pub high: Color,
    pub urgent: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x14, 0x1C),
            text: Color::Rgb(0xC8, 0xCC, 0xD4),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x6C, 0x75, 0x86),
            highlight: Color::Rgb(0x52, 0x9C, 0xFF),
            selection_bg: Color::Rgb(0x24, 0x30, 0x45),
            error: Color::Rgb(0xFF, 0x55, 0x55),
            todo: Color::Rgb(0x52, 0x9C, 0xFF),
            in_progress: Color::Rgb(0xE8, 0xC0, 0x3A),
            completed: Color::Rgb(0x4C, 0xC9, 0x6C),
            low: Color::Rgb(0x6C, 0x75, 0x86),
            medium: Color::Rgb(0x52, 0x9C, 0xFF),
            high: Color::Rgb(0xE8, 0x9C, 0x3A),
            urgent: Color::Rgb(0xFF, 0x55, 0x55),
        }
    }

    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xFA, 0xFA, 0xF7),
            text: Color::Rgb(0x2A, 0x2E, 0x36),
            text_bright: Color::Rgb(0x00, 0x00, 0x00),
            dim: Color::Rgb(0x8A, 0x90, 0x9C),
            highlight: Color::Rgb(0x1A, 0x5C, 0xD6),
            selection_bg: Color::Rgb(0xDC, 0xE6, 0xF7),
            error: Color::Rgb(0xC3, 0x1D, 0x1D),
            todo: Color::Rgb(0x1A, 0x5C, 0xD6),
            in_progress: Color::Rgb(0xA8, 0x74, 0x00),
            completed: Color::Rgb(0x1E, 0x7E, 0x3C),
            low: Color::Rgb(0x8A, 0x90, 0x9C),
            medium: Color::Rgb(0x1A, 0x5C, 0xD6),
            high: Color::Rgb(0xA8, 0x74, 0x00),
            urgent: Color::Rgb(0xC3, 0x1D, 0x1D),
        }
    }

    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Light => Theme::light(),
            ThemeChoice::Dark => Theme::dark(),
        }
    }

    pub fn status_color(&self, status: Status) -> Color {
        match status {
            Status::Todo => self.todo,
            Status::InProgress => self.in_progress,
            Status::Completed => self.completed,
        }
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
            Priority::Urgent => self.urgent,
        }
    }
}
