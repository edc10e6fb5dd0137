//! Domain entities representing core business objects.

pub mod subject;
pub mod token;

// Re-export commonly used types
pub use subject::Subject;
pub use token::{
    mask_token, Claims, TokenPair, TokenType, BEARER, DEFAULT_ACCESS_TOKEN_LIFETIME,
    DEFAULT_REFRESH_TOKEN_LIFETIME,
};
