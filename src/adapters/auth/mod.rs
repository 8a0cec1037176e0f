//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `firebase` - Firebase ID token verification
//! - `mock` - Fixed token map for tests and local development

mod firebase;
mod mock;

pub use firebase::{FirebaseConfig, FirebaseSessionValidator, FIREBASE_JWKS_URL};
pub use mock::MockSessionValidator;
