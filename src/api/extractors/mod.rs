/*
 * Responsibility
 * - Request extractors whose rejections render as the error envelope
 */
mod json;
mod session;

pub use json::JsonBody;
pub use session::{CurrentSession, OptionalSession};
