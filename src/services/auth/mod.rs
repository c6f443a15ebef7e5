/*
 * Responsibility
 * - The auth provider seam (trait + wire types) and its HTTP adapter
 * - The email capability the adapter is handed at construction
 */
pub mod error;
pub mod mailer;
pub mod provider;
pub mod remote;

pub use error::{ProviderError, ProviderErrorKind, ProviderFailure, ProviderResult};
pub use mailer::{AuthMailer, Recipient};
pub use provider::{AuthProvider, ProviderReply, Session, SessionUser};
pub use remote::RemoteAuthProvider;
