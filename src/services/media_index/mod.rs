//! MediaIndex service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for answering the
//! question "what is the most recently added media record of a feed".
//! They MUST NOT contain any classification logic: the screenshot decision
//! is made exclusively by ShotDetector, using Config::is_screenshot_path().

mod dry_media_index;
mod fs_index;
mod r#trait;

pub use self::r#trait::{create_media_index, MediaIndexTrait};
