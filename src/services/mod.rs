pub mod checkout;
pub mod email_templates;
pub mod expiration;
pub mod notifier;
pub mod reconciliation;

pub use checkout::Checkout;
pub use email_templates::EmailTemplates;
pub use expiration::ExpirationSweeper;
pub use notifier::Notifier;
pub use reconciliation::{ReconcileOutcome, Reconciler};
