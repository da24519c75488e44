//! Settings screen - persisted user preferences

use crate::action::Action;
use crate::component::Component;
use crate::model::settings::{SettingsPatch, Theme, UserSettings};
use crate::model::{AspectRatio, GenerationStyle};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Theme,
    AspectRatio,
    Style,
    AutoSave,
    AdvancedControls,
    Reset,
}

const ROWS: [Row; 6] = [
    Row::Theme,
    Row::AspectRatio,
    Row::Style,
    Row::AutoSave,
    Row::AdvancedControls,
    Row::Reset,
];

impl Row {
    fn label(&self) -> &'static str {
        match self {
            Row::Theme => "Theme",
            Row::AspectRatio => "Default aspect ratio",
            Row::Style => "Default style",
            Row::AutoSave => "Auto-save images",
            Row::AdvancedControls => "Advanced controls",
            Row::Reset => "Reset to defaults",
        }
    }
}

/// Settings screen component
pub struct SettingsComponent {
    pub selected_index: usize,
}

impl SettingsComponent {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next_row(&mut self) {
        self.selected_index = (self.selected_index + 1) % ROWS.len();
    }

    pub fn prev_row(&mut self) {
        self.selected_index = (self.selected_index + ROWS.len() - 1) % ROWS.len();
    }

    fn selected_row(&self) -> Row {
        ROWS[self.selected_index.min(ROWS.len() - 1)]
    }

    /// Patch for cycling the selected row's value. The reset row has no
    /// cycle; it acts on Enter instead.
    pub fn cycle(&self, settings: &UserSettings, forward: bool) -> Option<SettingsPatch> {
        let patch = match self.selected_row() {
            Row::Theme => SettingsPatch {
                theme: Some(cycle_slice(&Theme::all(), settings.theme, forward)),
                ..Default::default()
            },
            Row::AspectRatio => SettingsPatch {
                default_aspect_ratio: Some(if forward {
                    settings.default_aspect_ratio.next()
                } else {
                    settings.default_aspect_ratio.previous()
                }),
                ..Default::default()
            },
            Row::Style => SettingsPatch {
                default_style: Some(cycle_slice(
                    &GenerationStyle::all(),
                    settings.default_style,
                    forward,
                )),
                ..Default::default()
            },
            Row::AutoSave => SettingsPatch {
                auto_save: Some(!settings.auto_save),
                ..Default::default()
            },
            Row::AdvancedControls => SettingsPatch {
                show_advanced_controls: Some(!settings.show_advanced_controls),
                ..Default::default()
            },
            Row::Reset => return None,
        };
        Some(patch)
    }

    pub fn draw_with_settings(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        settings: &UserSettings,
    ) -> Result<()> {
        let lines: Vec<Line> = ROWS
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let value = match row {
                    Row::Theme => settings.theme.label().to_string(),
                    Row::AspectRatio => settings.default_aspect_ratio.label().to_string(),
                    Row::Style => settings.default_style.label().to_string(),
                    Row::AutoSave => on_off(settings.auto_save),
                    Row::AdvancedControls => on_off(settings.show_advanced_controls),
                    Row::Reset => "Enter".to_string(),
                };

                let style = if i == self.selected_index {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let rendered = if *row == Row::Reset {
                    format!(" {:22}   [{}]", row.label(), value)
                } else {
                    format!(" {:22} ◂ {} ▸", row.label(), value)
                };
                Line::from(Span::styled(rendered, style))
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Settings "),
        );
        frame.render_widget(paragraph, area);
        Ok(())
    }
}

impl Default for SettingsComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SettingsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::PrevItem),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::NextItem),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::CycleBackward),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::CycleForward),
            KeyCode::Enter => {
                if self.selected_row() == Row::Reset {
                    Some(Action::ResetSettings)
                } else {
                    Some(Action::CycleForward)
                }
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_with_settings(frame, area, &UserSettings::default())
    }
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

fn cycle_slice<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    let idx = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % options.len()
    } else {
        (idx + options.len() - 1) % options.len()
    };
    options[next]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_produces_single_field_patch() {
        let screen = SettingsComponent::new();
        let settings = UserSettings::default();

        let patch = screen.cycle(&settings, true).unwrap();
        assert_eq!(patch.theme, Some(Theme::Light));
        assert!(patch.auto_save.is_none());
        assert!(patch.default_style.is_none());
    }

    #[test]
    fn test_cycle_toggles_booleans() {
        let mut screen = SettingsComponent::new();
        let settings = UserSettings::default();

        // AutoSave row
        screen.selected_index = 3;
        let patch = screen.cycle(&settings, true).unwrap();
        assert_eq!(patch.auto_save, Some(false));

        // Direction is irrelevant for toggles
        let patch = screen.cycle(&settings, false).unwrap();
        assert_eq!(patch.auto_save, Some(false));
    }

    #[test]
    fn test_reset_row_has_no_cycle() {
        let mut screen = SettingsComponent::new();
        screen.selected_index = ROWS.len() - 1;
        assert!(screen.cycle(&UserSettings::default(), true).is_none());
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut screen = SettingsComponent::new();
        screen.prev_row();
        assert_eq!(screen.selected_index, ROWS.len() - 1);
        screen.next_row();
        assert_eq!(screen.selected_index, 0);
    }
}
