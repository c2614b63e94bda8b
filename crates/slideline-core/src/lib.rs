pub mod carousel;
pub mod config;
pub mod driver;
pub mod easing;
mod engine;
pub mod error;
pub mod panel;
pub mod timing;

pub use carousel::{Carousel, FrameOutcome};
pub use config::{CarouselConfig, SlideOffsets};
pub use driver::{CarouselDriver, CarouselEvent};
pub use easing::Easing;
pub use error::{Error, Result};
pub use panel::{Container, Panel};
pub use timing::{Clock, ManualClock, SystemClock};
