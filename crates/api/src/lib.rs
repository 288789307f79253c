//! Drawing API - the manager handle plus its command and query interface.
//!
//! [`DrawManager`] attaches to a host map through [`MapSurface`], tracks the
//! shapes the user draws and persists them through a save handler on every
//! change. Commands describe the same operations in serializable form so a
//! session can be recorded and replayed:
//!
//! # Example
//! ```ignore
//! use api::{execute_command, Command, Console, DrawManager, DrawOptions, HeadlessMap};
//! use storage::{LoadHandler, SaveHandler};
//!
//! let mut manager = DrawManager::new(
//!     HeadlessMap::new(),
//!     DrawOptions::default(),
//!     SaveHandler::callback(|json| println!("{}", json)),
//!     LoadHandler::None,
//!     Console::Log,
//! );
//! let cmd: Command = serde_json::from_str(r#"{"type":"click_map"}"#)?;
//! let result = execute_command(&mut manager, cmd);
//! ```

mod command;
mod console;
mod event;
mod executor;
mod manager;
mod map;
mod options;
mod query;

pub use command::*;
pub use console::Console;
pub use event::MapEvent;
pub use executor::{execute_command, execute_query};
pub use manager::{mode_name, DrawManager};
pub use map::{DrawingControls, HeadlessMap, MapSurface};
pub use options::{ControlPosition, DrawOptions, ModeChangedCallback};
pub use query::*;
