//! Terminal implementation of the carousel's panel abstraction.
//!
//! Each slide is a shared cell: the carousel writes offsets and stack
//! orders through the [`Panel`] trait, and the renderer reads the same
//! cells every frame.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::style::Color;
use slideline_core::{Container, Panel};

const PALETTE: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

/// Render state of one slide
#[derive(Debug, Clone)]
pub struct PanelCell {
    pub label: String,
    pub color: Color,
    pub offset: f64,
    pub stack_order: u8,
    pub pinned: bool,
}

/// Shared handle to a slide's render state
#[derive(Debug, Clone)]
pub struct StagePanel(pub Rc<RefCell<PanelCell>>);

impl Panel for StagePanel {
    fn pin(&mut self) {
        let mut cell = self.0.borrow_mut();
        cell.pinned = true;
        cell.stack_order = 0;
    }

    fn set_offset(&mut self, _property: &str, value: f64, _unit: &str) {
        self.0.borrow_mut().offset = value;
    }

    fn set_stack_order(&mut self, order: u8) {
        self.0.borrow_mut().stack_order = order;
    }
}

/// The terminal "container": a fixed strip of colored slides
pub struct Stage {
    width: f64,
    panels: Vec<StagePanel>,
}

impl Stage {
    pub fn new(count: usize, width: f64) -> Self {
        let panels = (0..count)
            .map(|i| {
                StagePanel(Rc::new(RefCell::new(PanelCell {
                    label: format!("Slide {}", i + 1),
                    color: PALETTE[i % PALETTE.len()],
                    offset: 0.0,
                    stack_order: 0,
                    pinned: false,
                })))
            })
            .collect();
        Self { width, panels }
    }

    /// Handles the renderer keeps alongside the carousel's own copies
    pub fn handles(&self) -> Vec<StagePanel> {
        self.panels.clone()
    }
}

impl Container for Stage {
    type Panel = StagePanel;

    fn panels(&mut self) -> Vec<StagePanel> {
        self.panels.clone()
    }

    fn width(&self) -> f64 {
        self.width
    }
}
