//! Main application orchestrator.

use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEvent, MouseEventKind};
use futures_util::StreamExt;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Span,
    widgets::Paragraph,
};
use tokio::time::interval;
use tracing::{debug, info, warn};

use super::gallery_screen::{GalleryScreen, content_container};
use super::host::{AppDelegate, UrlListSource};
use crate::application::{DismissOutcome, DismissSender, Gallery, LinkExtractor, PresentationState};
use crate::domain::entities::{ContentData, Displayed, MovieSource};
use crate::domain::ports::{ContentLoaderPort, GalleryDataSource, GalleryDelegate};
use crate::infrastructure::{AppConfig, CliArgs, ContentLoader, MainQueue};
use crate::presentation::events::{Command, EventHandler, EventResult, KeyContext};
use crate::presentation::widgets::{MediaView, UrlList};

const ANIMATION_TICK_RATE: Duration = Duration::from_millis(33);
/// Fraction of the container one drag key press moves the content.
const DRAG_STEP: f64 = 0.1;
const ZOOM_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppState {
    Running,
    Exiting,
}

/// A keyboard-driven swipe.
#[derive(Debug, Clone, Copy)]
struct Drag {
    y: f64,
}

/// The terminal host: a URL list that presents the gallery.
pub struct App {
    state: AppState,
    gallery: Gallery,
    source: Rc<UrlListSource>,
    delegate: Rc<AppDelegate>,
    loader: Arc<ContentLoader>,
    queue: MainQueue,
    screen: Option<GalleryScreen>,
    drag: Option<Drag>,
    mouse: bool,
}

impl App {
    /// Builds the gallery over the URLs in `args`.
    ///
    /// # Errors
    /// Returns error if the content loader cannot be created.
    pub fn new(config: &AppConfig, args: &CliArgs) -> color_eyre::Result<Self> {
        let queue = MainQueue::new();
        let loader = Arc::new(ContentLoader::new(
            config.loader_config(),
            Arc::new(queue.handle()),
        )?);
        let port: Arc<dyn ContentLoaderPort> = loader.clone();
        let mut gallery = Gallery::new(port, config.gallery_settings());

        let source = Rc::new(UrlListSource::new(&args.urls, args.content_type));
        let delegate = Rc::new(AppDelegate::new(Rc::clone(&source)));

        let data_source: Rc<dyn GalleryDataSource> = source.clone();
        let gallery_delegate: Rc<dyn GalleryDelegate> = delegate.clone();
        gallery.set_data_source(Rc::downgrade(&data_source));
        gallery.set_delegate(Rc::downgrade(&gallery_delegate));
        gallery.reload_data();

        delegate.select(args.start_index);
        if let Some(item) = source.item_at(delegate.selected()) {
            gallery.set_current_item(&item);
        }

        info!(items = source.number_of_items(), "Gallery host ready");

        Ok(Self {
            state: AppState::Running,
            gallery,
            source,
            delegate,
            loader,
            queue,
            screen: None,
            drag: None,
            mouse: config.ui.mouse,
        })
    }

    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        if self.mouse {
            crossterm::execute!(std::io::stdout(), crossterm::event::EnableMouseCapture)?;
        }
        self.screen = Some(GalleryScreen::new(MediaView::new()));

        let result = self.run_event_loop(terminal).await;

        if self.mouse {
            crossterm::execute!(std::io::stdout(), crossterm::event::DisableMouseCapture)?;
        }
        self.loader.cancel_all();
        info!("Application exiting normally");
        result
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut animation_interval = interval(ANIMATION_TICK_RATE);

        terminal.draw(|frame| self.render(frame))?;

        while self.state != AppState::Exiting {
            let terminal_event = terminal_events.next();

            tokio::select! {
                biased;

                _ = self.queue.run_next() => {
                    self.gallery.pump();
                    terminal.draw(|frame| self.render(frame))?;
                }

                _ = animation_interval.tick() => {
                    self.queue.run_pending();
                    self.gallery.pump();
                    self.tick(ANIMATION_TICK_RATE);
                    terminal.draw(|frame| self.render(frame))?;
                }

                Some(Ok(event)) = terminal_event => {
                    if self.handle_terminal_event(event) == EventResult::Exit {
                        self.state = AppState::Exiting;
                    }
                    terminal.draw(|frame| self.render(frame))?;
                }
            }
        }

        Ok(())
    }

    fn tick(&mut self, dt: Duration) {
        if let Some(ended) = self.gallery.tick(dt) {
            debug!(kind = ?ended.kind, completed = ended.completed, "Transition ended");
        }
        if let Some(screen) = &mut self.screen {
            screen.tick(dt, &self.gallery);
        }
    }

    fn key_context(&self) -> KeyContext {
        if self.drag.is_some() {
            KeyContext::Dragging
        } else if self.gallery.state().is_on_screen() {
            KeyContext::Gallery
        } else {
            KeyContext::List
        }
    }

    fn handle_terminal_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key(key) => self.handle_key(&key),
            Event::Mouse(mouse) if self.gallery.state() == PresentationState::Presented => {
                match mouse.kind {
                    MouseEventKind::ScrollDown => self.execute(Command::Page(1)),
                    MouseEventKind::ScrollUp => self.execute(Command::Page(-1)),
                    MouseEventKind::Down(_) => self.execute(Command::ToggleSecondaryViews),
                    _ => EventResult::Continue,
                }
            }
            _ => EventResult::Continue,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> EventResult {
        EventHandler::command_for(key, self.key_context())
            .map_or(EventResult::Continue, |command| self.execute(command))
    }

    fn execute(&mut self, command: Command) -> EventResult {
        match command {
            Command::Quit => return EventResult::Exit,
            Command::Select(delta) => self.delegate.select_by(delta),
            Command::Present => self.present(),
            Command::Page(delta) => {
                self.gallery.page_by(delta);
            }
            Command::ToggleSecondaryViews => self.gallery.toggle_secondary_views(),
            Command::ZoomIn | Command::ZoomOut => self.zoom(command == Command::ZoomIn),
            Command::DragDown | Command::DragUp => self.drag(command == Command::DragDown),
            Command::Release => self.release_drag(),
            Command::Dismiss => self.dismiss(),
            Command::Retry => {
                self.delegate.take_status();
                self.gallery.retry_current();
            }
            Command::OpenLink => self.open_caption_link(),
            Command::Play => self.play_movie(),
        }
        EventResult::Consumed
    }

    fn present(&mut self) {
        let Some(item) = self.source.item_at(self.delegate.selected()) else {
            return;
        };
        self.gallery.set_current_item(&item);
        if let Err(error) = self.gallery.present(None) {
            warn!(error = %error, "Could not present gallery");
        }
    }

    fn dismiss(&mut self) {
        match self.gallery.dismiss(DismissSender::Keyboard) {
            DismissOutcome::Delegate | DismissOutcome::CustomContent => {
                if let Err(error) = self.gallery.start_dismissal(None) {
                    warn!(error = %error, "Could not dismiss gallery");
                }
            }
            DismissOutcome::Animated | DismissOutcome::Ignored => {}
        }
    }

    fn zoom(&mut self, zoom_in: bool) {
        let Some(scale) = self
            .gallery
            .paging()
            .current_provider()
            .map(|provider| provider.content_view().zoom().scale())
        else {
            return;
        };
        let step = if zoom_in { ZOOM_STEP } else { -ZOOM_STEP };
        self.gallery.set_zoom_scale(scale + step);
    }

    fn drag(&mut self, down: bool) {
        let step = self.gallery.container().height() * DRAG_STEP;
        let now = Instant::now();
        match self.drag {
            None if down => {
                if self.gallery.begin_dismiss_gesture(now, 0.0) {
                    self.gallery.update_dismiss_gesture(now, step);
                    self.drag = Some(Drag { y: step });
                }
            }
            None => {}
            Some(Drag { y }) => {
                let y = if down { y + step } else { (y - step).max(0.0) };
                self.gallery.update_dismiss_gesture(now, y);
                self.drag = Some(Drag { y });
            }
        }
    }

    fn release_drag(&mut self) {
        if self.drag.take().is_some()
            && let Some(completes) = self.gallery.end_dismiss_gesture()
        {
            debug!(completes, "Drag released");
        }
    }

    fn open_caption_link(&self) {
        let (title, subtitle) = self.gallery.caption();
        let Some(url) = [subtitle, title]
            .iter()
            .flatten()
            .find_map(|text| LinkExtractor::first_link(text).map(str::to_string))
        else {
            return;
        };
        if !self.gallery.interact_with_url(&url) {
            debug!(url = %url, "Delegate declined link");
            return;
        }
        if let Err(error) = opener::open(&url) {
            warn!(url = %url, error = %error, "Failed to open link");
        }
    }

    fn play_movie(&self) {
        let Some(provider) = self.gallery.paging().current_provider() else {
            return;
        };
        let Displayed::Content(ContentData::Movie(clip)) = provider.content_view().displayed()
        else {
            return;
        };
        let result = match &clip.source {
            MovieSource::Remote(url) => opener::open(url),
            MovieSource::Downloaded(path) => opener::open(&**path),
            MovieSource::File(path) => opener::open(path),
        };
        if let Err(error) = result {
            warn!(error = %error, "Failed to hand movie to player");
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [list_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.gallery.set_container(content_container(area));

        let on_screen = self.gallery.state().is_on_screen();
        frame.render_widget(
            UrlList::new(self.source.items(), self.delegate.rows(), self.delegate.selected())
                .dimmed(on_screen),
            list_area,
        );

        let status = self.delegate.status().unwrap_or_else(|| {
            "enter open · ←/→ page · space bars · +/- zoom · j drag · r retry · o link · q quit"
                .to_string()
        });
        frame.render_widget(
            Paragraph::new(Span::styled(status, Style::default().fg(Color::DarkGray))),
            status_area,
        );

        if on_screen && let Some(screen) = &mut self.screen {
            screen.render(frame, area, &self.gallery);
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("gallery", &self.gallery.state())
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}
