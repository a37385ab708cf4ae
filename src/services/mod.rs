pub mod selection;
pub mod source;
