//! Real-time driver for the carousel: a tokio task that supplies the frame
//! callbacks, forwards visibility changes, and reports carousel activity
//! to the host UI over a channel.
//!
//! Synchronous hosts can skip this and call [`Carousel::on_frame`] from
//! their own loop; the driver exists for hosts that already run a tokio
//! runtime and want the carousel to advance in the background.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info, warn};

use crate::carousel::{Carousel, FrameOutcome};
use crate::error::Error;
use crate::panel::Container;
use crate::timing::Clock;

/// Events emitted by the driver to notify the host UI of carousel activity
#[derive(Debug, Clone)]
pub enum CarouselEvent {
    /// The current slide index changed (a transition started)
    Changed { previous: usize, current: usize },
    /// A transition finished; offsets are at their final values
    Settled { index: usize, upcoming: usize },
}

/// Background driver that advances a shared carousel in real time
pub struct CarouselDriver<C: Container, K: Clock> {
    carousel: Arc<Mutex<Carousel<C, K>>>,
    event_tx: Option<mpsc::UnboundedSender<CarouselEvent>>,
}

impl<C: Container, K: Clock> CarouselDriver<C, K> {
    /// Create a driver over a shared carousel
    pub fn new(carousel: Arc<Mutex<Carousel<C, K>>>) -> Self {
        Self {
            carousel,
            event_tx: None,
        }
    }

    /// Set the event sender for UI notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<CarouselEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Send an event to the UI (if event channel is configured)
    fn send_event(&self, event: CarouselEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send carousel event: receiver dropped");
            }
        }
    }

    /// Start the carousel and drive it until shutdown, disposal, or a
    /// failed start. `visibility` carries the host's hidden flag.
    pub async fn run(
        self,
        mut shutdown: watch::Receiver<bool>,
        mut visibility: watch::Receiver<bool>,
    ) {
        let (frame_interval, mut last_index) = {
            let mut carousel = self.carousel.lock().await;
            if let Err(e) = carousel.start() {
                warn!("Carousel failed to start: {}", e);
                return;
            }
            (carousel.config().frame_interval(), carousel.current_index())
        };

        info!(
            "Carousel driver started: frame interval {}ms",
            frame_interval.as_millis()
        );

        let mut frames = tokio::time::interval(frame_interval);
        let mut visibility_alive = true;

        loop {
            tokio::select! {
                // Handle shutdown signal
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Carousel driver received shutdown signal");
                        break;
                    }
                }

                // Forward visibility changes to the carousel
                result = visibility.changed(), if visibility_alive => {
                    match result {
                        Ok(()) => {
                            let hidden = *visibility.borrow();
                            debug!(hidden, "visibility changed");
                            let mut carousel = self.carousel.lock().await;
                            if let Err(e) = carousel.set_hidden(hidden) {
                                warn!("Visibility update failed: {}", e);
                                break;
                            }
                        }
                        // Notifier gone; keep driving without visibility handling
                        Err(_) => visibility_alive = false,
                    }
                }

                // Advance the carousel by one frame
                _ = frames.tick() => {
                    let mut carousel = self.carousel.lock().await;
                    let outcome = match carousel.on_frame() {
                        Ok(outcome) => outcome,
                        Err(Error::Disposed) => {
                            info!("Carousel disposed, driver stopping");
                            break;
                        }
                        Err(e) => {
                            warn!("Frame step failed: {}", e);
                            continue;
                        }
                    };

                    let current = carousel.current_index();
                    if current != last_index {
                        self.send_event(CarouselEvent::Changed {
                            previous: last_index,
                            current,
                        });
                        last_index = current;
                    }
                    if outcome == FrameOutcome::Settled {
                        self.send_event(CarouselEvent::Settled {
                            index: current,
                            upcoming: carousel.next_index(),
                        });
                    }
                }
            }
        }

        info!("Carousel driver stopped");
    }
}
