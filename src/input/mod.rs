pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::PickerEvent;
pub use handler::EventManager;
