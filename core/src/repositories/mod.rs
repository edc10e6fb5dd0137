pub mod identity;

pub use identity::IdentityLookup;

#[cfg(test)]
pub use identity::MockIdentityLookup;
