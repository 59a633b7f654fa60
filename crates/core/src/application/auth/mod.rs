// Authentication Use Cases - magic-link login over SMS

pub mod magic_link;
pub mod token;

pub use magic_link::{RegisterRequest, RequestLinkOutcome, VerifiedSession};
pub use token::{MagicLinkClaims, SessionClaims, TokenService};
