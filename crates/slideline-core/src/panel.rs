//! The positionable panel abstraction and panel set bootstrapping.
//!
//! The carousel does not know what a panel looks like; it only pushes
//! position-style mutations through these traits. Hosts implement them
//! over whatever they render (DOM nodes, terminal cells, scene layers).

/// One slide managed by the carousel.
pub trait Panel {
    /// Pin the panel for positioned animation: absolute placement with
    /// zeroed top/left and resting stack order.
    fn pin(&mut self);

    /// Set the panel's offset along the transition axis.
    fn set_offset(&mut self, property: &str, value: f64, unit: &str);

    /// Set the panel's stacking order.
    fn set_stack_order(&mut self, order: u8);
}

/// A container exposing its child panels in fixed display order.
pub trait Container {
    type Panel: Panel;

    /// Snapshot of the container's children. The order is fixed for the
    /// carousel's lifetime; panels are not added or removed afterward.
    fn panels(&mut self) -> Vec<Self::Panel>;

    /// Width used to derive default offsets.
    fn width(&self) -> f64;
}

/// Extract the slide panels from a container and put them in the resting
/// layout: every panel pinned at the start offset, the first panel at the
/// visible offset with stack order 1.
///
/// Returns an empty vec for an empty container; the caller must check
/// before establishing slide state.
pub(crate) fn init_panels<C: Container>(
    container: &mut C,
    property: &str,
    unit: &str,
    start: f64,
    visible: f64,
) -> Vec<C::Panel> {
    let mut panels = container.panels();

    // Iteration order does not affect the final state; reverse matches the
    // resting layout being applied before the first panel is promoted.
    for panel in panels.iter_mut().rev() {
        panel.pin();
        panel.set_offset(property, start, unit);
    }

    if let Some(first) = panels.first_mut() {
        first.set_offset(property, visible, unit);
        first.set_stack_order(1);
    }

    panels
}

/// Stack-order shuffle for a starting transition: `target` takes `order`,
/// and the counterpart panel from the previous transition (if any) is
/// demoted to `prev_order`.
pub(crate) fn restack<P: Panel>(
    panels: &mut [P],
    prev: Option<usize>,
    prev_order: u8,
    target: usize,
    order: u8,
) {
    panels[target].set_stack_order(order);
    if let Some(i) = prev {
        panels[i].set_stack_order(prev_order);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeContainer;
    use super::*;

    #[test]
    fn test_init_panels_resting_layout() {
        let mut container = FakeContainer::with_panels(3);
        let cells = container.children.clone();

        let panels = init_panels(&mut container, "left", "px", -100.0, 0.0);
        assert_eq!(panels.len(), 3);

        // First panel on stage, the rest parked at the start offset
        assert_eq!(cells[0].offset(), 0.0);
        assert_eq!(cells[0].stack_order(), 1);
        for cell in &cells[1..] {
            assert_eq!(cell.offset(), -100.0);
            assert_eq!(cell.stack_order(), 0);
            assert!(cell.0.borrow().pinned);
        }
        assert_eq!(cells[1].0.borrow().property, "left");
        assert_eq!(cells[1].0.borrow().unit, "px");
    }

    #[test]
    fn test_init_panels_empty_container() {
        let mut container = FakeContainer::with_panels(0);
        let panels = init_panels(&mut container, "left", "px", -100.0, 0.0);
        assert!(panels.is_empty());
    }

    #[test]
    fn test_restack_promotes_and_demotes() {
        let mut container = FakeContainer::with_panels(3);
        let cells = container.children.clone();
        let mut panels = init_panels(&mut container, "left", "px", -100.0, 0.0);

        restack(&mut panels, None, 1, 0, 3);
        assert_eq!(cells[0].stack_order(), 3);

        restack(&mut panels, Some(0), 1, 1, 4);
        assert_eq!(cells[1].stack_order(), 4);
        assert_eq!(cells[0].stack_order(), 1);
    }
}
