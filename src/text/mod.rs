//! Formatted text and templates.

pub mod element;
pub mod receiver;
pub mod template;
pub mod template_set;
