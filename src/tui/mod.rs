mod app;
mod event;
pub mod ui;

pub use app::{surface_origin, surface_width, Action, PointerAction, TuiApp};
pub use event::{Event, EventHandler};
