pub mod detector;
pub mod locator;
pub mod selector;
