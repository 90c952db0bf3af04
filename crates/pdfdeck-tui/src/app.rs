use std::path::PathBuf;

use pdfdeck_core::{Applied, Stage, Topic, Workflow};

use crate::action::Action;
use crate::backend::Effect;
use crate::input::InputMode;
use crate::model::form::{FormKind, Prompt, TopicForm};
use crate::theme::Theme;
use crate::tui_event::BackendEvent;

/// Which screen is currently displayed. Derived from the workflow stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Upload,
    Outline,
    Deck,
}

/// Preferred view while a deck is being presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Outline,
    Deck,
}

/// Main application state.
pub struct App {
    pub workflow: Workflow,
    /// Base URL used to resolve server-relative image paths.
    pub backend_url: String,
    pub pane: Pane,
    pub outline_cursor: usize,
    pub prompt: Option<Prompt>,
    pub show_help: bool,
    /// One-line message for the status bar (validation failures, unreadable files).
    pub notice: Option<String>,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
    /// Height of the visible list area (set on resize).
    pub visible_rows: usize,
    /// Sequence number of the most recent file read; older reads are ignored.
    load_seq: u64,
    effects: Vec<Effect>,
}

impl App {
    pub fn new(backend_url: String) -> Self {
        Self {
            workflow: Workflow::new(),
            backend_url,
            pane: Pane::Outline,
            outline_cursor: 0,
            prompt: None,
            show_help: false,
            notice: None,
            tick: 0,
            theme: Theme::hacker(),
            should_quit: false,
            visible_rows: 20,
            load_seq: 0,
            effects: Vec::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        match self.workflow.stage() {
            Stage::Idle | Stage::Uploading | Stage::UploadFailed => Screen::Upload,
            Stage::OutlineReady | Stage::Generating | Stage::GenerateFailed => Screen::Outline,
            Stage::Presenting => match self.pane {
                Pane::Deck => Screen::Deck,
                Pane::Outline => Screen::Outline,
            },
        }
    }

    pub fn input_mode(&self) -> InputMode {
        if self.prompt.is_some() {
            InputMode::Text
        } else {
            InputMode::Normal
        }
    }

    /// Effects queued since the last call, in request order.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Queue reading `path` from disk; the document is selected once loaded.
    /// Any read still in progress is superseded.
    pub fn open_path(&mut self, path: PathBuf) {
        self.load_seq += 1;
        self.notice = Some(format!("Reading {}...", path.display()));
        self.effects.push(Effect::LoadDocument {
            seq: self.load_seq,
            path,
        });
    }

    pub fn selected_topic(&self) -> Option<&Topic> {
        self.workflow.state().topics().get(self.outline_cursor)
    }

    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(_w, h) => {
                // Header, footer and borders
                self.visible_rows = (h as usize).saturating_sub(6);
                return false;
            }
            _ => {}
        }

        if self.prompt.is_some() {
            self.update_prompt(action);
            return false;
        }

        // When help overlay is shown, only allow a few actions through
        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::NavigateBack) {
                self.show_help = false;
            }
            return false;
        }

        let screen = self.screen();
        match action {
            Action::ToggleHelp => self.show_help = true,
            Action::NavigateBack => {
                if screen == Screen::Deck {
                    self.pane = Pane::Outline;
                }
                self.notice = None;
            }
            Action::MoveDown => match screen {
                Screen::Outline => {
                    let max = self.workflow.state().topics().len().saturating_sub(1);
                    if self.outline_cursor < max {
                        self.outline_cursor += 1;
                    }
                }
                Screen::Deck => self.workflow.next_slide(),
                Screen::Upload => {}
            },
            Action::MoveUp => match screen {
                Screen::Outline => {
                    self.outline_cursor = self.outline_cursor.saturating_sub(1);
                }
                Screen::Deck => self.workflow.prev_slide(),
                Screen::Upload => {}
            },
            Action::GoTop => match screen {
                Screen::Outline => self.outline_cursor = 0,
                Screen::Deck => self.workflow.first_slide(),
                Screen::Upload => {}
            },
            Action::GoBottom => match screen {
                Screen::Outline => {
                    self.outline_cursor =
                        self.workflow.state().topics().len().saturating_sub(1);
                }
                Screen::Deck => self.workflow.last_slide(),
                Screen::Upload => {}
            },
            Action::NextSlide => {
                if screen == Screen::Deck {
                    self.workflow.next_slide();
                }
            }
            Action::PrevSlide => {
                if screen == Screen::Deck {
                    self.workflow.prev_slide();
                }
            }
            Action::OpenFile => {
                self.prompt = Some(Prompt::OpenFile(String::new()));
            }
            Action::AddTopic => {
                if self.edit_allowed() {
                    self.prompt = Some(Prompt::Topic(TopicForm::add()));
                }
            }
            Action::EditTopic => {
                if screen == Screen::Upload {
                    self.prompt = Some(Prompt::OpenFile(String::new()));
                } else if self.edit_allowed() {
                    if let Some(topic) = self.selected_topic() {
                        self.prompt = Some(Prompt::Topic(TopicForm::edit(topic)));
                    }
                }
            }
            Action::RemoveTopic => {
                if screen == Screen::Outline {
                    self.remove_selected();
                }
            }
            Action::Generate => match self.workflow.generate() {
                Ok(command) => {
                    self.notice = None;
                    self.pane = Pane::Deck;
                    self.effects.push(Effect::Dispatch(command));
                }
                Err(e) => self.notice = Some(capitalize(&e.to_string())),
            },
            Action::TogglePane => {
                if self.workflow.stage() == Stage::Presenting {
                    self.pane = match self.pane {
                        Pane::Outline => Pane::Deck,
                        Pane::Deck => Pane::Outline,
                    };
                }
            }
            Action::Input(_)
            | Action::Backspace
            | Action::NextField
            | Action::Submit
            | Action::Cancel
            | Action::Quit
            | Action::Tick
            | Action::Resize(..)
            | Action::None => {}
        }
        false
    }

    fn update_prompt(&mut self, action: Action) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match action {
            Action::Input(c) => prompt.push(c),
            Action::Backspace => prompt.backspace(),
            Action::NextField => prompt.next_field(),
            Action::Cancel => self.prompt = None,
            Action::Submit => self.submit_prompt(),
            _ => {}
        }
    }

    fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        match prompt {
            Prompt::OpenFile(path) => {
                let path = path.trim();
                if path.is_empty() {
                    self.notice = Some("Enter a path to a PDF file".to_string());
                    self.prompt = Some(Prompt::OpenFile(String::new()));
                    return;
                }
                self.open_path(PathBuf::from(path));
            }
            Prompt::Topic(form) => {
                let result = match &form.kind {
                    FormKind::Add => self.workflow.add_topic(&form.title, &form.description),
                    FormKind::Edit { id } => {
                        self.workflow
                            .update_topic(id, &form.title, &form.description)
                    }
                };
                match result {
                    Ok(topic) => {
                        self.notice = None;
                        if let Some(pos) = self.workflow.state().outline().position(&topic.id) {
                            self.outline_cursor = pos;
                        }
                    }
                    Err(e) => {
                        // Keep the form open so the input is not lost
                        self.notice = Some(capitalize(&e.to_string()));
                        self.prompt = Some(Prompt::Topic(form));
                    }
                }
            }
        }
    }

    fn edit_allowed(&mut self) -> bool {
        let stage = self.workflow.stage();
        if stage.accepts_edits() {
            return true;
        }
        self.notice = Some(format!("The outline cannot be edited while {stage}"));
        false
    }

    fn remove_selected(&mut self) {
        let Some(id) = self.selected_topic().map(|t| t.id.clone()) else {
            return;
        };
        match self.workflow.remove_topic(&id) {
            Ok(_) => {
                self.notice = None;
                self.clamp_cursor();
            }
            Err(e) => self.notice = Some(capitalize(&e.to_string())),
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.workflow.state().topics().len();
        self.outline_cursor = self.outline_cursor.min(len.saturating_sub(1));
    }

    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::DocumentLoaded { seq, .. } | BackendEvent::DocumentUnreadable { seq, .. }
                if seq != self.load_seq =>
            {
                log::debug!("ignoring superseded file read (seq {seq}, current {})", self.load_seq);
            }
            BackendEvent::DocumentLoaded { document, .. } => {
                let command = self.workflow.select_file(document);
                self.outline_cursor = 0;
                self.pane = Pane::Outline;
                self.notice = None;
                self.effects.push(Effect::Dispatch(command));
            }
            BackendEvent::DocumentUnreadable { path, error, .. } => {
                self.notice = Some(format!("Could not read {}: {error}", path.display()));
            }
            BackendEvent::Completed(completion) => match self.workflow.apply(completion) {
                Applied::Transitioned(Stage::Presenting) => {
                    self.pane = Pane::Deck;
                }
                Applied::Transitioned(_) => self.clamp_cursor(),
                Applied::Stale => {}
            },
        }
    }

    /// Render the current screen.
    pub fn view(&self, f: &mut ratatui::Frame) {
        match self.screen() {
            Screen::Upload => crate::view::upload::render(f, self),
            Screen::Outline => crate::view::outline::render(f, self),
            Screen::Deck => crate::view::deck::render(f, self),
        }

        if let Some(prompt) = &self.prompt {
            crate::view::prompt::render(f, prompt, &self.theme);
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfdeck_core::{Completion, Document, Extraction, GatewayError, Operation, Slide, SlideBody};

    fn topic(id: &str, title: &str) -> Topic {
        Topic {
            id: id.into(),
            title: title.into(),
            description: format!("{title} details"),
        }
    }

    fn slide(id: &str) -> Slide {
        Slide {
            id: id.into(),
            title: id.to_uppercase(),
            body: SlideBody::TextOnly {
                content: "body".into(),
            },
        }
    }

    /// Open `name` and return the sequence number of the queued read.
    fn request_load(app: &mut App, name: &str) -> u64 {
        app.open_path(PathBuf::from(name));
        match app.take_effects().pop() {
            Some(Effect::LoadDocument { seq, .. }) => seq,
            other => panic!("expected a file read, got {other:?}"),
        }
    }

    /// Open and finish reading `name`, as the backend would.
    fn load(app: &mut App, name: &str) {
        let seq = request_load(app, name);
        app.handle_backend_event(BackendEvent::DocumentLoaded {
            seq,
            document: Document::new(name, b"%PDF".to_vec()),
        });
    }

    /// Drive the app to OutlineReady with two topics.
    fn app_with_outline() -> App {
        let mut app = App::new("http://localhost:3001".into());
        load(&mut app, "paper.pdf");
        let effects = app.take_effects();
        assert_eq!(effects.len(), 1);
        let epoch = app.workflow.state().epoch();
        app.handle_backend_event(BackendEvent::Completed(Completion::Extracted {
            epoch,
            result: Ok(Extraction {
                topics: vec![topic("t1", "Intro"), topic("t2", "Methods")],
                ..Extraction::default()
            }),
        }));
        assert_eq!(app.screen(), Screen::Outline);
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.update(Action::Input(c));
        }
    }

    #[test]
    fn starts_on_upload_screen() {
        let app = App::new("http://localhost:3001".into());
        assert_eq!(app.screen(), Screen::Upload);
        assert_eq!(app.input_mode(), InputMode::Normal);
    }

    #[test]
    fn open_prompt_queues_document_load() {
        let mut app = App::new("http://localhost:3001".into());
        app.update(Action::OpenFile);
        assert_eq!(app.input_mode(), InputMode::Text);
        type_text(&mut app, "slides.pdf");
        app.update(Action::Submit);
        assert!(app.prompt.is_none());
        let effects = app.take_effects();
        assert!(matches!(
            effects.as_slice(),
            [Effect::LoadDocument { seq: 1, path }] if path == &PathBuf::from("slides.pdf")
        ));
    }

    #[test]
    fn letters_in_prompt_do_not_trigger_commands() {
        let mut app = App::new("http://localhost:3001".into());
        app.update(Action::OpenFile);
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.prompt, Some(Prompt::OpenFile("q".into())));
    }

    #[test]
    fn unreadable_file_sets_notice() {
        let mut app = App::new("http://localhost:3001".into());
        let seq = request_load(&mut app, "missing.pdf");
        app.handle_backend_event(BackendEvent::DocumentUnreadable {
            seq,
            path: PathBuf::from("missing.pdf"),
            error: "No such file".into(),
        });
        assert_eq!(app.workflow.stage(), Stage::Idle);
        assert!(app.notice.as_deref().unwrap_or("").contains("missing.pdf"));
    }

    #[test]
    fn add_topic_through_form() {
        let mut app = app_with_outline();
        app.update(Action::AddTopic);
        type_text(&mut app, "Results");
        app.update(Action::NextField);
        type_text(&mut app, "What we found");
        app.update(Action::Submit);

        assert!(app.prompt.is_none());
        let topics = app.workflow.state().topics();
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[2].title, "Results");
        assert_eq!(app.outline_cursor, 2);
    }

    #[test]
    fn invalid_form_stays_open_with_notice() {
        let mut app = app_with_outline();
        app.update(Action::AddTopic);
        type_text(&mut app, "Only a title");
        app.update(Action::Submit);

        assert!(matches!(app.prompt, Some(Prompt::Topic(_))));
        assert_eq!(app.workflow.state().topics().len(), 2);
        assert_eq!(
            app.notice.as_deref(),
            Some("Topic description must not be empty")
        );
    }

    #[test]
    fn edit_prefills_selected_topic() {
        let mut app = app_with_outline();
        app.update(Action::MoveDown);
        app.update(Action::EditTopic);
        match &app.prompt {
            Some(Prompt::Topic(form)) => {
                assert_eq!(form.kind, FormKind::Edit { id: "t2".into() });
                assert_eq!(form.title, "Methods");
            }
            other => panic!("unexpected prompt: {other:?}"),
        }
        app.update(Action::Cancel);
        assert!(app.prompt.is_none());
    }

    #[test]
    fn remove_clamps_cursor() {
        let mut app = app_with_outline();
        app.update(Action::GoBottom);
        assert_eq!(app.outline_cursor, 1);
        app.update(Action::RemoveTopic);
        assert_eq!(app.workflow.state().topics().len(), 1);
        assert_eq!(app.outline_cursor, 0);
    }

    #[test]
    fn generate_then_present() {
        let mut app = app_with_outline();
        app.update(Action::Generate);
        assert_eq!(app.workflow.stage(), Stage::Generating);
        assert_eq!(app.take_effects().len(), 1);

        let epoch = app.workflow.state().epoch();
        app.handle_backend_event(BackendEvent::Completed(Completion::Generated {
            epoch,
            result: Ok(vec![slide("s1"), slide("s2")]),
        }));
        assert_eq!(app.screen(), Screen::Deck);

        app.update(Action::NextSlide);
        assert_eq!(app.workflow.state().deck().position(), Some(1));
        app.update(Action::NextSlide);
        assert_eq!(app.workflow.state().deck().position(), Some(1));

        app.update(Action::TogglePane);
        assert_eq!(app.screen(), Screen::Outline);
        app.update(Action::TogglePane);
        assert_eq!(app.screen(), Screen::Deck);
    }

    #[test]
    fn generate_while_busy_is_reported() {
        let mut app = app_with_outline();
        app.update(Action::Generate);
        app.take_effects();
        app.update(Action::Generate);
        assert!(app.take_effects().is_empty());
        assert!(app.notice.is_some());
    }

    #[test]
    fn failed_generation_stays_on_outline() {
        let mut app = app_with_outline();
        app.update(Action::Generate);
        let epoch = app.workflow.state().epoch();
        app.handle_backend_event(BackendEvent::Completed(Completion::Generated {
            epoch,
            result: Err(GatewayError::Rejected {
                operation: Operation::Generate,
                status: 500,
                message: "model overloaded".into(),
            }),
        }));
        assert_eq!(app.screen(), Screen::Outline);
        assert_eq!(app.workflow.state().generate_error(), Some("model overloaded"));
    }

    #[test]
    fn edits_refused_while_uploading() {
        let mut app = App::new("http://localhost:3001".into());
        load(&mut app, "a.pdf");
        app.update(Action::AddTopic);
        assert!(app.prompt.is_none());
        assert!(app.notice.is_some());
    }

    #[test]
    fn earlier_file_read_finishing_late_is_ignored() {
        let mut app = App::new("http://localhost:3001".into());
        let first = request_load(&mut app, "a.pdf");
        let second = request_load(&mut app, "b.pdf");

        app.handle_backend_event(BackendEvent::DocumentLoaded {
            seq: second,
            document: Document::new("b.pdf", vec![2]),
        });
        assert_eq!(app.take_effects().len(), 1);
        app.handle_backend_event(BackendEvent::DocumentLoaded {
            seq: first,
            document: Document::new("a.pdf", vec![1]),
        });

        assert_eq!(app.workflow.state().document_name(), Some("b.pdf"));
        assert!(app.take_effects().is_empty());
    }

    #[test]
    fn late_file_read_keeps_curated_outline() {
        let mut app = app_with_outline();
        let stale = request_load(&mut app, "slow.pdf");
        // User picks something else before the slow read finishes
        let current = request_load(&mut app, "missing.pdf");
        app.handle_backend_event(BackendEvent::DocumentUnreadable {
            seq: current,
            path: PathBuf::from("missing.pdf"),
            error: "No such file".into(),
        });
        app.handle_backend_event(BackendEvent::DocumentLoaded {
            seq: stale,
            document: Document::new("slow.pdf", vec![1]),
        });

        assert_eq!(app.workflow.stage(), Stage::OutlineReady);
        assert_eq!(app.workflow.state().document_name(), Some("paper.pdf"));
        assert_eq!(app.workflow.state().topics().len(), 2);
        assert!(app.notice.as_deref().unwrap_or("").contains("missing.pdf"));
    }

    #[test]
    fn stale_unreadable_report_is_ignored() {
        let mut app = App::new("http://localhost:3001".into());
        let first = request_load(&mut app, "gone.pdf");
        request_load(&mut app, "b.pdf");
        app.notice = None;
        app.handle_backend_event(BackendEvent::DocumentUnreadable {
            seq: first,
            path: PathBuf::from("gone.pdf"),
            error: "No such file".into(),
        });
        assert!(app.notice.is_none());
    }
}
