use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use tracing::debug;

use slideline_core::{Carousel, CarouselConfig};

use crate::stage::{Stage, StagePanel};

/// Application state: the carousel plus render handles to its slides
pub struct App {
    carousel: Carousel<Stage>,
    panels: Vec<StagePanel>,
    stage_width: f64,
    hidden: bool,
    should_quit: bool,
}

impl App {
    pub fn new(config: CarouselConfig, panel_count: usize, stage_width: f64) -> Result<Self> {
        let stage = Stage::new(panel_count, stage_width);
        let panels = stage.handles();
        let mut carousel = Carousel::new(stage, config);
        carousel.start()?;
        Ok(Self {
            carousel,
            panels,
            stage_width,
            hidden: false,
            should_quit: false,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Advance the carousel; called once per poll-loop iteration
    pub fn on_tick(&mut self) -> Result<()> {
        self.carousel.on_frame()?;
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => self.carousel.next()?,
            KeyCode::Char('h') | KeyCode::Char('p') | KeyCode::Left => self.carousel.prev()?,
            KeyCode::Char(' ') => {
                if self.carousel.is_paused() {
                    self.carousel.resume()?;
                } else {
                    self.carousel.pause()?;
                }
            }
            KeyCode::Char('v') => {
                // Simulate the host going hidden/visible
                self.hidden = !self.hidden;
                debug!(hidden = self.hidden, "toggling visibility");
                self.carousel.set_hidden(self.hidden)?;
            }
            KeyCode::Char('r') => self.carousel.reset()?,
            _ => {}
        }
        Ok(())
    }

    pub fn draw(&self, frame: &mut Frame) {
        let [stage_area, status_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

        let viewport = Block::bordered().title("slideline");
        let inner = viewport.inner(stage_area);
        frame.render_widget(viewport, stage_area);

        if !self.hidden {
            // Low stack orders first so higher ones land on top
            let mut order: Vec<&StagePanel> = self.panels.iter().collect();
            order.sort_by_key(|panel| panel.0.borrow().stack_order);
            for panel in order {
                let cell = panel.0.borrow();
                if let Some(area) = self.panel_rect(cell.offset, inner) {
                    let slide = Paragraph::new(Line::from(cell.label.clone()).centered())
                        .style(Style::default().bg(cell.color).fg(Color::Black));
                    frame.render_widget(slide, area);
                }
            }
        }

        frame.render_widget(self.status_line(), status_area);
    }

    fn status_line(&self) -> Paragraph<'static> {
        let position = if self.carousel.panel_count() == 0 {
            "-/-".to_string()
        } else {
            format!(
                "{}/{}",
                self.carousel.current_index() + 1,
                self.carousel.panel_count()
            )
        };
        Paragraph::new(format!(
            " slide {}  autoplay:{}{}{}  |  l/h next/prev  space pause  v hide  r reset  q quit",
            position,
            if self.carousel.is_autoplay() { "on" } else { "off" },
            if self.carousel.is_paused() { " [paused]" } else { "" },
            if self.hidden { " [hidden]" } else { "" },
        ))
    }

    /// Map a stage offset onto viewport columns, clipping panels that are
    /// partially or fully off stage. Returns `None` when nothing of the
    /// panel is visible.
    fn panel_rect(&self, offset: f64, viewport: Rect) -> Option<Rect> {
        if self.stage_width <= 0.0 || viewport.width == 0 {
            return None;
        }
        let cols = i32::from(viewport.width);
        let x = (offset / self.stage_width * f64::from(viewport.width)).round() as i32;
        let left = x.max(0);
        let right = (x + cols).min(cols);
        if left >= right {
            return None;
        }
        Some(Rect {
            x: viewport.x + left as u16,
            y: viewport.y,
            width: (right - left) as u16,
            height: viewport.height,
        })
    }
}
