pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
#[cfg(test)]
pub mod mock;

pub use r#trait::IdentityLookup;
#[cfg(test)]
pub use mock::MockIdentityLookup;
