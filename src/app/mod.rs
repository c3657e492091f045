// app/mod.rs - Application Context
//
// Platform-independent state shared by the ruler windows and the magnifier.
// Windows hold a reference to the context and react to its events.

mod events;
mod state;

pub use events::{EventBus, MeasureEvent};
pub use state::*;
