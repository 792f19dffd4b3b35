pub mod directory;
pub mod drives;
pub mod handlers;
pub mod roster;
