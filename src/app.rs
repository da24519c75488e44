//! Root application component
//!
//! The App struct implements the Component trait, acting as the root
//! component that delegates event handling and rendering to the screen
//! components. State transitions go through the store; generation goes
//! through the orchestrator. App itself only routes and validates.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, ClearAllDialog, GalleryComponent, GenerateComponent, HelpDialog,
    QuitDialog, SettingsComponent, StatsDialog,
};
use crate::generation::{ImageService, Orchestrator, Timings};
use crate::model::modal::{Modal, ModalStack};
use crate::model::ui::Screen;
use crate::model::MAX_PROMPT_LEN;
use crate::storage::ImageStore;
use crate::store::{Store, StoreAction};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

const BACKUP_FILE: &str = "pixgen-export.json";

/// Main application state - coordinates between components
pub struct App {
    /// Active top-level screen
    pub screen: Screen,

    /// Authoritative state, synchronized to the repository
    pub store: Store,

    /// Background generation driver
    pub orchestrator: Orchestrator,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,

    /// Where export/import reads and writes its backup
    pub backup_path: PathBuf,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub generate: GenerateComponent,
    pub gallery: GalleryComponent,
    pub settings_screen: SettingsComponent,
    pub quit_dialog: QuitDialog,
    pub clear_all_dialog: ClearAllDialog,
    pub stats_dialog: StatsDialog,
    pub help_dialog: HelpDialog,
}

impl App {
    /// Create a new App backed by the default repository location
    pub fn new(client: Arc<dyn ImageService>) -> App {
        Self::with_parts(
            Store::new(ImageStore::new()),
            Orchestrator::new(client, Timings::default()),
        )
    }

    /// Create an App from explicit parts (tests use a stub service and a
    /// temporary repository)
    pub fn with_parts(mut store: Store, orchestrator: Orchestrator) -> App {
        store.hydrate();

        let mut generate = GenerateComponent::new();
        generate.apply_defaults(&store.state().settings);

        App {
            screen: Screen::Generate,
            store,
            orchestrator,
            modals: ModalStack::new(),
            should_quit: false,
            error: None,
            status_message: None,
            backup_path: PathBuf::from(BACKUP_FILE),
            generate,
            gallery: GalleryComponent::new(),
            settings_screen: SettingsComponent::new(),
            quit_dialog: QuitDialog,
            clear_all_dialog: ClearAllDialog,
            stats_dialog: StatsDialog,
            help_dialog: HelpDialog::default(),
        }
    }

    fn visible_image_count(&self) -> usize {
        self.gallery.visible(&self.store.state().images).len()
    }

    fn start_generation(&mut self) {
        let prompt = self.generate.prompt.trim();
        if prompt.is_empty() {
            self.error = Some("Enter a prompt before generating".to_string());
            return;
        }
        if prompt.chars().count() > MAX_PROMPT_LEN {
            self.error = Some(format!("Prompt is too long (max {} characters)", MAX_PROMPT_LEN));
            return;
        }

        self.error = None;
        self.status_message = None;
        let request = self.generate.request();
        // A request while one is in flight is dropped without comment
        self.orchestrator.start(request, &mut self.store);
    }

    fn export_gallery(&mut self) {
        let json = self.store.repo().export_data();
        match fs::write(&self.backup_path, json) {
            Ok(()) => {
                self.status_message =
                    Some(format!("Exported to {}", self.backup_path.display()));
                self.error = None;
            }
            Err(e) => {
                self.error = Some(format!(
                    "Export failed ({}): {}",
                    self.backup_path.display(),
                    e
                ));
            }
        }
    }

    fn import_gallery(&mut self) {
        let contents = match fs::read_to_string(&self.backup_path) {
            Ok(c) => c,
            Err(e) => {
                self.error = Some(format!(
                    "Could not read {}: {}",
                    self.backup_path.display(),
                    e
                ));
                return;
            }
        };

        if self.store.repo().import_data(&contents) {
            self.store.hydrate();
            self.gallery.select_first();
            let settings = self.store.state().settings.clone();
            self.generate.apply_defaults(&settings);
            self.status_message = Some(format!("Imported {}", self.backup_path.display()));
            self.error = None;
        } else {
            self.error = Some("Import rejected: not a valid backup file".to_string());
        }
    }
}

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ctrl+C always quits, whatever else is on screen
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        if self.screen == Screen::Generate && self.generate.editing {
            return self.handle_prompt_key_event(key);
        }

        // Global keys, then the active screen
        match key.code {
            KeyCode::Tab => Ok(Some(Action::NextScreen)),
            KeyCode::BackTab => Ok(Some(Action::PrevScreen)),
            KeyCode::Char('?') => Ok(Some(Action::OpenHelp)),
            KeyCode::Char('q') => Ok(Some(Action::OpenQuitDialog)),
            _ => match self.screen {
                Screen::Generate => self.generate.handle_key_event(key),
                Screen::Gallery => self.gallery.handle_key_event(key),
                Screen::Settings => self.settings_screen.handle_key_event(key),
            },
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.orchestrator.poll(&mut self.store);
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::NextScreen => {
                self.screen = self.screen.next();
                self.status_message = None;
                self.error = None;
            }
            Action::PrevScreen => {
                self.screen = self.screen.previous();
                self.status_message = None;
                self.error = None;
            }
            Action::NextItem => match self.screen {
                Screen::Gallery => {
                    let count = self.visible_image_count();
                    self.gallery.next(count);
                }
                Screen::Settings => self.settings_screen.next_row(),
                Screen::Generate => {}
            },
            Action::PrevItem => match self.screen {
                Screen::Gallery => self.gallery.previous(),
                Screen::Settings => self.settings_screen.prev_row(),
                Screen::Generate => {}
            },
            Action::FirstItem => self.gallery.select_first(),
            Action::LastItem => {
                let count = self.visible_image_count();
                self.gallery.select_last(count);
            }

            // ─────────────────────────────────────────────────────────────────
            // Prompt Editing
            // ─────────────────────────────────────────────────────────────────
            Action::EnterPromptMode => {
                self.generate.editing = true;
                self.error = None;
            }
            Action::ExitPromptMode => self.generate.editing = false,
            Action::PromptInput(c) => {
                if self.generate.prompt.chars().count() < MAX_PROMPT_LEN {
                    self.generate.prompt.push(c);
                }
            }
            Action::PromptBackspace => {
                self.generate.prompt.pop();
            }

            // ─────────────────────────────────────────────────────────────────
            // Generation
            // ─────────────────────────────────────────────────────────────────
            Action::StartGeneration => self.start_generation(),
            Action::CancelGeneration => {
                if self.store.state().is_generating {
                    self.orchestrator.cancel(&mut self.store);
                    self.status_message = Some("Generation cancelled".to_string());
                }
            }
            Action::ResetForm => {
                let settings = self.store.state().settings.clone();
                self.generate.reset(&settings);
            }
            Action::NextField => {
                let advanced = self.store.state().settings.show_advanced_controls;
                self.generate.next_field(advanced);
            }
            Action::PrevField => {
                let advanced = self.store.state().settings.show_advanced_controls;
                self.generate.prev_field(advanced);
            }
            Action::CycleForward | Action::CycleBackward => {
                let forward = action == Action::CycleForward;
                match self.screen {
                    Screen::Generate => {
                        let advanced = self.store.state().settings.show_advanced_controls;
                        self.generate.cycle(forward, advanced);
                    }
                    Screen::Settings => {
                        let settings = self.store.state().settings.clone();
                        if let Some(patch) = self.settings_screen.cycle(&settings, forward) {
                            self.store.dispatch(StoreAction::UpdateSettings(patch));
                        }
                    }
                    Screen::Gallery => {}
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Gallery
            // ─────────────────────────────────────────────────────────────────
            Action::ToggleFavorite => {
                if let Some(id) = self.gallery.selected_id(&self.store.state().images) {
                    self.store.dispatch(StoreAction::ToggleFavorite(id));
                }
            }
            Action::DeleteImage => {
                if let Some(id) = self.gallery.selected_id(&self.store.state().images) {
                    self.store.dispatch(StoreAction::DeleteImage(id));
                    let count = self.visible_image_count();
                    self.gallery.clamp_selection(count);
                }
            }
            Action::ToggleFavoritesFilter => self.gallery.toggle_filter(),
            Action::ExportGallery => self.export_gallery(),
            Action::ImportGallery => self.import_gallery(),

            // ─────────────────────────────────────────────────────────────────
            // Settings
            // ─────────────────────────────────────────────────────────────────
            Action::ResetSettings => {
                self.store.dispatch(StoreAction::ResetSettings);
                let settings = self.store.state().settings.clone();
                self.generate.apply_defaults(&settings);
                self.status_message = Some("Settings reset to defaults".to_string());
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenClearAllDialog => {
                if !self.store.state().images.is_empty() {
                    self.modals.push(Modal::ClearAllConfirm);
                }
            }
            Action::OpenStats => self.modals.push(Modal::Stats),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if let Some(modal) = self.modals.top().cloned() {
                    match modal {
                        Modal::QuitConfirm => self.should_quit = true,
                        Modal::ClearAllConfirm => {
                            self.store.clear_all_images();
                            self.gallery.select_first();
                            self.status_message = Some("Gallery cleared".to_string());
                            self.modals.pop();
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let has_status = self.error.is_some() || self.status_message.is_some();
        let layout = calculate_main_layout(area, has_status);

        self.draw_tabs(frame, layout.tabs);

        match self.screen {
            Screen::Generate => {
                self.generate
                    .draw_with_state(frame, layout.body, self.store.state())?;
            }
            Screen::Gallery => {
                self.gallery
                    .draw_with_images(frame, layout.body, &self.store.state().images)?;
            }
            Screen::Settings => {
                self.settings_screen.draw_with_settings(
                    frame,
                    layout.body,
                    &self.store.state().settings,
                )?;
            }
        }

        if let Some(status_area) = layout.status {
            self.draw_status(frame, status_area);
        }
        self.draw_help_bar(frame, layout.help);

        // Draw modal overlay if active
        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }

        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::ClearAllConfirm => self.clear_all_dialog.handle_key_event(key),
            Modal::Stats => self.stats_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn handle_prompt_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::ExitPromptMode),
            KeyCode::Backspace => Some(Action::PromptBackspace),
            KeyCode::Char(c) => Some(Action::PromptInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::ClearAllConfirm => {
                let count = self.store.state().images.len();
                self.clear_all_dialog.draw_with_count(frame, area, count)?;
            }
            Modal::Stats => {
                let stats = self.store.repo().generation_stats();
                self.stats_dialog.draw_with_stats(frame, area, &stats)?;
            }
            Modal::Help => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Screen::all()
            .iter()
            .map(|s| Line::from(s.title()))
            .collect();
        let selected = Screen::all()
            .iter()
            .position(|s| *s == self.screen)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" pixgen "),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(ref error) = self.error {
            Line::from(Span::styled(
                format!(" {}", error),
                Style::default().fg(Color::Red),
            ))
        } else if let Some(ref status) = self.status_message {
            Line::from(Span::styled(
                format!(" {}", status),
                Style::default().fg(Color::Green),
            ))
        } else {
            Line::from("")
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let hint = match self.screen {
            Screen::Generate => "Enter generate · c cancel · r reset · Tab switch · ? help · q quit",
            Screen::Gallery => {
                "f favorite · d delete · F filter · x export · i import · s stats · ? help"
            }
            Screen::Settings => "h/l change · Enter reset row · Tab switch · ? help · q quit",
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!(" {}", hint),
            Style::default().fg(Color::DarkGray),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeneratedImage, GenerationRequest, GenerationResponse, GenerationSettings};
    use tempfile::TempDir;

    /// Service stub for routing tests; generation outcomes are covered by
    /// the orchestrator's own tests
    struct NullService;

    impl ImageService for NullService {
        fn generate(&self, _request: &GenerationRequest) -> GenerationResponse {
            GenerationResponse::ok("http://x/img.png".to_string(), 1)
        }

        fn health_check(&self) -> bool {
            true
        }
    }

    fn test_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(ImageStore::with_dir(dir.path().join("data")));
        let orchestrator = Orchestrator::new(Arc::new(NullService), Timings::instant());
        let mut app = App::with_parts(store, orchestrator);
        app.backup_path = dir.path().join("backup.json");
        (dir, app)
    }

    fn seed_image(app: &mut App, prompt: &str) -> String {
        let image = GeneratedImage::new(
            prompt.to_string(),
            format!("http://x/{}.png", prompt),
            GenerationSettings::default(),
        );
        let id = image.id.clone();
        app.store.dispatch(StoreAction::AddImage(image));
        id
    }

    #[test]
    fn test_screen_cycling_wraps() {
        let (_dir, mut app) = test_app();
        assert_eq!(app.screen, Screen::Generate);

        app.update(Action::NextScreen).unwrap();
        assert_eq!(app.screen, Screen::Gallery);
        app.update(Action::NextScreen).unwrap();
        app.update(Action::NextScreen).unwrap();
        assert_eq!(app.screen, Screen::Generate);

        app.update(Action::PrevScreen).unwrap();
        assert_eq!(app.screen, Screen::Settings);
    }

    #[test]
    fn test_empty_prompt_is_rejected_with_error() {
        let (_dir, mut app) = test_app();
        app.update(Action::StartGeneration).unwrap();

        assert!(app.error.is_some());
        assert!(!app.store.state().is_generating);
    }

    #[test]
    fn test_prompt_input_stops_at_limit() {
        let (_dir, mut app) = test_app();
        for _ in 0..MAX_PROMPT_LEN + 25 {
            app.update(Action::PromptInput('x')).unwrap();
        }
        assert_eq!(app.generate.prompt.chars().count(), MAX_PROMPT_LEN);
    }

    #[test]
    fn test_reopening_help_resets_scroll() {
        let (_dir, mut app) = test_app();

        app.update(Action::OpenHelp).unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::Help));
        app.help_dialog.scroll_offset = 7;

        app.update(Action::CloseModal).unwrap();
        app.update(Action::OpenHelp).unwrap();
        assert_eq!(app.help_dialog.scroll_offset, 0);
    }

    #[test]
    fn test_delete_image_clamps_gallery_selection() {
        let (_dir, mut app) = test_app();
        seed_image(&mut app, "a");
        seed_image(&mut app, "b");
        app.screen = Screen::Gallery;

        app.update(Action::LastItem).unwrap();
        assert_eq!(app.gallery.selected_index, 1);

        app.update(Action::DeleteImage).unwrap();
        assert_eq!(app.store.state().images.len(), 1);
        assert_eq!(app.gallery.selected_index, 0);
    }

    #[test]
    fn test_toggle_favorite_acts_on_selected() {
        let (_dir, mut app) = test_app();
        seed_image(&mut app, "a");
        let newest = seed_image(&mut app, "b");
        app.screen = Screen::Gallery;

        app.update(Action::ToggleFavorite).unwrap();

        let images = &app.store.state().images;
        assert!(images.iter().find(|i| i.id == newest).unwrap().favorite);
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let (_dir, mut app) = test_app();
        seed_image(&mut app, "keep me");

        app.update(Action::ExportGallery).unwrap();
        assert!(app.backup_path.exists());

        app.update(Action::OpenClearAllDialog).unwrap();
        app.update(Action::ConfirmModal).unwrap();
        assert!(app.store.state().images.is_empty());

        app.update(Action::ImportGallery).unwrap();
        assert_eq!(app.store.state().images.len(), 1);
        assert_eq!(app.store.state().images[0].prompt, "keep me");
    }

    #[test]
    fn test_import_of_garbage_leaves_state_alone() {
        let (_dir, mut app) = test_app();
        seed_image(&mut app, "survivor");
        fs::write(&app.backup_path, "definitely not json").unwrap();

        app.update(Action::ImportGallery).unwrap();

        assert!(app.error.is_some());
        assert_eq!(app.store.state().images.len(), 1);
    }

    #[test]
    fn test_clear_all_requires_confirmation() {
        let (_dir, mut app) = test_app();
        seed_image(&mut app, "a");

        app.update(Action::OpenClearAllDialog).unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::ClearAllConfirm));

        // Declining leaves the gallery alone
        app.update(Action::CloseModal).unwrap();
        assert_eq!(app.store.state().images.len(), 1);
    }

    #[test]
    fn test_clear_all_dialog_skipped_when_empty() {
        let (_dir, mut app) = test_app();
        app.update(Action::OpenClearAllDialog).unwrap();
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_settings_cycle_persists_through_store() {
        let (dir, mut app) = test_app();
        app.screen = Screen::Settings;

        // First row is the theme
        app.update(Action::CycleForward).unwrap();
        let theme = app.store.state().settings.theme;
        assert_ne!(theme, crate::model::Theme::System);

        // A fresh store sees the persisted value
        let mut fresh = Store::new(ImageStore::with_dir(dir.path().join("data")));
        fresh.hydrate();
        assert_eq!(fresh.state().settings.theme, theme);
    }

    #[test]
    fn test_prompt_mode_routes_keys_to_input() {
        let (_dir, mut app) = test_app();
        app.update(Action::EnterPromptMode).unwrap();
        assert!(app.generate.editing);

        let action = app
            .handle_key_event(KeyEvent::from(KeyCode::Char('q')))
            .unwrap();
        // 'q' types into the prompt instead of opening the quit dialog
        assert_eq!(action, Some(Action::PromptInput('q')));

        let action = app.handle_key_event(KeyEvent::from(KeyCode::Esc)).unwrap();
        assert_eq!(action, Some(Action::ExitPromptMode));
    }
}
