//! Credential token claims and codec.

mod claims;
mod codec;

pub use claims::{Claims, TokenKind};
pub use codec::TokenCodec;
