/*
 * Responsibility
 * - Router-level layers (request id, tracing, limits, timeout, CORS)
 * - Session guards applied per route group
 */
pub mod cors;
pub mod http;
pub mod session;
