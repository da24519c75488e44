//! Generate screen - prompt entry, generation options, and progress

use crate::action::Action;
use crate::component::Component;
use crate::model::{
    AppState, AspectRatio, GenerationRequest, GenerationSettings, GenerationStyle, MAX_PROMPT_LEN,
};
use crate::model::settings::UserSettings;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Selectable steps presets; `None` lets the service pick
const STEP_OPTIONS: [Option<u32>; 4] = [None, Some(20), Some(30), Some(50)];
/// Selectable guidance scale presets, spanning the service's 1-20 range
const GUIDANCE_OPTIONS: [Option<u32>; 6] =
    [None, Some(5), Some(7), Some(10), Some(15), Some(20)];

/// Form fields, in display order. The advanced fields are only reachable
/// when advanced controls are enabled in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AspectRatio,
    Style,
    Steps,
    GuidanceScale,
    Seed,
}

impl Field {
    fn all(advanced: bool) -> &'static [Field] {
        if advanced {
            &[
                Field::AspectRatio,
                Field::Style,
                Field::Steps,
                Field::GuidanceScale,
                Field::Seed,
            ]
        } else {
            &[Field::AspectRatio, Field::Style]
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Field::AspectRatio => "Aspect ratio",
            Field::Style => "Style",
            Field::Steps => "Steps",
            Field::GuidanceScale => "Guidance scale",
            Field::Seed => "Seed",
        }
    }
}

/// Generate screen component
pub struct GenerateComponent {
    pub prompt: String,
    /// Whether keystrokes currently edit the prompt
    pub editing: bool,
    selected_field: usize,
    pub aspect_ratio: AspectRatio,
    pub style: Option<GenerationStyle>,
    pub steps: Option<u32>,
    pub guidance_scale: Option<u32>,
    /// Unset means the service picks a random seed per request
    pub seed: Option<u64>,
}

impl GenerateComponent {
    pub fn new() -> Self {
        Self {
            prompt: String::new(),
            editing: false,
            selected_field: 0,
            aspect_ratio: AspectRatio::default(),
            style: Some(GenerationStyle::default()),
            steps: None,
            guidance_scale: None,
            seed: None,
        }
    }

    /// Seed the option fields from the configured defaults, keeping the prompt
    pub fn apply_defaults(&mut self, settings: &UserSettings) {
        self.aspect_ratio = settings.default_aspect_ratio;
        self.style = Some(settings.default_style);
    }

    /// Clear the form back to the configured defaults
    pub fn reset(&mut self, settings: &UserSettings) {
        self.prompt.clear();
        self.editing = false;
        self.selected_field = 0;
        self.steps = None;
        self.guidance_scale = None;
        self.seed = None;
        self.apply_defaults(settings);
    }

    /// Build the request the form currently describes
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt.trim().to_string(),
            settings: GenerationSettings {
                aspect_ratio: self.aspect_ratio,
                style: self.style,
                steps: self.steps,
                guidance_scale: self.guidance_scale,
                seed: self.seed,
            },
        }
    }

    pub fn next_field(&mut self, advanced: bool) {
        let count = Field::all(advanced).len();
        self.selected_field = (self.selected_field + 1) % count;
    }

    pub fn prev_field(&mut self, advanced: bool) {
        let count = Field::all(advanced).len();
        self.selected_field = (self.selected_field + count - 1) % count;
    }

    /// Cycle the selected field's value
    pub fn cycle(&mut self, forward: bool, advanced: bool) {
        let fields = Field::all(advanced);
        let field = fields[self.selected_field.min(fields.len() - 1)];
        match field {
            Field::AspectRatio => {
                self.aspect_ratio = if forward {
                    self.aspect_ratio.next()
                } else {
                    self.aspect_ratio.previous()
                };
            }
            Field::Style => {
                self.style = cycle_style(self.style, forward);
            }
            Field::Steps => {
                self.steps = cycle_option(&STEP_OPTIONS, self.steps, forward);
            }
            Field::GuidanceScale => {
                self.guidance_scale = cycle_option(&GUIDANCE_OPTIONS, self.guidance_scale, forward);
            }
            // Forward rolls a fresh random seed, backward clears it
            Field::Seed => {
                self.seed = if forward { Some(random_seed()) } else { None };
            }
        }
    }

    /// Render the screen: prompt box, option fields, and generation progress
    pub fn draw_with_state(&mut self, frame: &mut Frame, area: Rect, state: &AppState) -> Result<()> {
        let advanced = state.settings.show_advanced_controls;
        let options_height = Field::all(advanced).len() as u16 + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(options_height),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        self.draw_prompt(frame, chunks[0]);
        self.draw_options(frame, chunks[1], advanced);
        self.draw_progress(frame, chunks[2], state);

        let hint = if self.editing {
            " Esc or Enter to stop editing"
        } else {
            " i edit prompt · j/k field · h/l value · Enter generate"
        };
        let line = Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )))
        .wrap(Wrap { trim: true });
        frame.render_widget(line, chunks[3]);

        Ok(())
    }

    fn draw_prompt(&self, frame: &mut Frame, area: Rect) {
        let border_color = if self.editing {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let title = format!(" Prompt ({}/{}) ", self.prompt.chars().count(), MAX_PROMPT_LEN);
        let paragraph = Paragraph::new(self.prompt.as_str())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            );
        frame.render_widget(paragraph, area);

        if self.editing {
            // Cursor sits after the last character, wrapped to the inner width
            let inner_width = area.width.saturating_sub(2).max(1);
            let prompt_width = self.prompt.width() as u16;
            let x = area.x + 1 + prompt_width % inner_width;
            let y = area.y + 1 + (prompt_width / inner_width).min(area.height.saturating_sub(3));
            frame.set_cursor_position((x, y));
        }
    }

    fn draw_options(&self, frame: &mut Frame, area: Rect, advanced: bool) {
        let fields = Field::all(advanced);
        let lines: Vec<Line> = fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let value = match field {
                    Field::AspectRatio => self.aspect_ratio.label().to_string(),
                    Field::Style => option_label(self.style.map(|s| s.label())),
                    Field::Steps => option_label(self.steps.map(|v| v.to_string()).as_deref()),
                    Field::GuidanceScale => {
                        option_label(self.guidance_scale.map(|v| v.to_string()).as_deref())
                    }
                    Field::Seed => self
                        .seed
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "random".to_string()),
                };

                let style = if i == self.selected_field.min(fields.len() - 1) && !self.editing {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                Line::from(Span::styled(
                    format!(" {:16} ◂ {} ▸", field.label(), value),
                    style,
                ))
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Options "),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_progress(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        match &state.current_generation {
            Some(progress) => {
                let failed = progress.status.starts_with("Error");
                let color = if failed { Color::Red } else { Color::Green };
                let gauge = Gauge::default()
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(" Progress "),
                    )
                    .gauge_style(Style::default().fg(color))
                    .percent(progress.progress.min(100) as u16)
                    .label(progress.status.clone());
                frame.render_widget(gauge, area);
            }
            None => {
                let hint = Paragraph::new(" Press Enter to generate")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Left)
                    .block(Block::default().borders(Borders::ALL).title(" Progress "));
                frame.render_widget(hint, area);
            }
        }
    }
}

impl Default for GenerateComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for GenerateComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('i') | KeyCode::Char('e') => Some(Action::EnterPromptMode),
            KeyCode::Enter => Some(Action::StartGeneration),
            KeyCode::Char('c') => Some(Action::CancelGeneration),
            KeyCode::Char('r') => Some(Action::ResetForm),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::PrevField),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::NextField),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::CycleBackward),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::CycleForward),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_with_state(frame, area, &AppState::new())
    }
}

fn option_label(value: Option<impl AsRef<str>>) -> String {
    match value {
        Some(v) => v.as_ref().to_string(),
        None => "auto".to_string(),
    }
}

fn cycle_style(current: Option<GenerationStyle>, forward: bool) -> Option<GenerationStyle> {
    // Styles cycle through None (no modifier) and each named style
    let mut options: Vec<Option<GenerationStyle>> = vec![None];
    options.extend(GenerationStyle::all().into_iter().map(Some));
    cycle_option(&options, current, forward)
}

/// Roll a seed for reproducible generations. v4 uuids carry 122 random
/// bits; the first 64 are enough here.
fn random_seed() -> u64 {
    let b = uuid::Uuid::new_v4().into_bytes();
    u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}

fn cycle_option<T: Copy + PartialEq>(options: &[Option<T>], current: Option<T>, forward: bool) -> Option<T> {
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
    fn test_field_cycling_respects_advanced_flag() {
        let mut form = GenerateComponent::new();

        // Basic mode wraps after two fields
        form.next_field(false);
        form.next_field(false);
        assert_eq!(form.selected_field, 0);

        // Advanced mode exposes all five
        for _ in 0..4 {
            form.next_field(true);
        }
        assert_eq!(form.selected_field, 4);
        form.next_field(true);
        assert_eq!(form.selected_field, 0);
    }

    #[test]
    fn test_seed_rolls_forward_and_clears_backward() {
        let mut form = GenerateComponent::new();
        form.selected_field = Field::all(true)
            .iter()
            .position(|f| *f == Field::Seed)
            .unwrap();

        form.cycle(true, true);
        let rolled = form.seed;
        assert!(rolled.is_some());
        assert_eq!(form.request().settings.seed, rolled);

        form.cycle(false, true);
        assert!(form.seed.is_none());
    }

    #[test]
    fn test_guidance_presets_span_service_range() {
        let mut form = GenerateComponent::new();
        form.selected_field = Field::all(true)
            .iter()
            .position(|f| *f == Field::GuidanceScale)
            .unwrap();

        let mut seen = Vec::new();
        for _ in 0..GUIDANCE_OPTIONS.len() {
            form.cycle(true, true);
            seen.push(form.guidance_scale);
        }
        assert!(seen.contains(&Some(20)));
        // Full cycle lands back on the unset default
        assert!(form.guidance_scale.is_none());
    }

    #[test]
    fn test_cycle_changes_selected_field_value() {
        let mut form = GenerateComponent::new();
        form.cycle(true, false);
        assert_eq!(form.aspect_ratio, AspectRatio::Widescreen);

        form.next_field(false);
        // Photorealistic sits right after None in the style cycle
        form.cycle(false, false);
        assert!(form.style.is_none());
    }

    #[test]
    fn test_request_trims_prompt_and_carries_options() {
        let mut form = GenerateComponent::new();
        form.prompt = "  a red circle  ".to_string();
        form.aspect_ratio = AspectRatio::Vertical;
        form.style = Some(GenerationStyle::Anime);
        form.steps = Some(30);

        let request = form.request();
        assert_eq!(request.prompt, "a red circle");
        assert_eq!(request.settings.aspect_ratio, AspectRatio::Vertical);
        assert_eq!(request.settings.style, Some(GenerationStyle::Anime));
        assert_eq!(request.settings.steps, Some(30));
        assert!(request.settings.seed.is_none());
    }

    #[test]
    fn test_reset_restores_configured_defaults() {
        let settings = UserSettings {
            default_aspect_ratio: AspectRatio::Landscape,
            default_style: GenerationStyle::Abstract,
            ..Default::default()
        };

        let mut form = GenerateComponent::new();
        form.prompt = "something".to_string();
        form.steps = Some(50);
        form.reset(&settings);

        assert!(form.prompt.is_empty());
        assert!(form.steps.is_none());
        assert_eq!(form.aspect_ratio, AspectRatio::Landscape);
        assert_eq!(form.style, Some(GenerationStyle::Abstract));
    }
}
