/// Themed widgets
///
/// Thin wrappers over egui widgets that only add the stylesheet classes.

pub mod command_item;
pub mod piano_key;
pub mod popover;
pub mod select;

pub use command_item::CommandItem;
pub use popover::Popover;
pub use select::Select;
