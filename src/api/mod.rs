/*
 * Responsibility
 * - HTTP surface: /api/auth routes, /api/me, /health, fallbacks
 * - Response envelope and envelope-aware extractors
 */
pub mod auth;
pub mod envelope;
pub mod extractors;
pub mod handlers;
