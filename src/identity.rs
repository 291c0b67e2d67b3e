//! Who the client acts as.

use std::fmt;

/// Username the surrounding desktop uses for signed-out users.
pub const GUEST_NAME: &str = "Guest";

/// The participant a client acts for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Actor {
    /// A signed-in user with a stable username.
    User(String),
    /// Not signed in. Guests may play locally but cannot create or join sessions.
    Guest,
}

impl Actor {
    /// Maps a username to an actor; blank names and the guest name map to [`Actor::Guest`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name == GUEST_NAME {
            Actor::Guest
        } else {
            Actor::User(name.to_string())
        }
    }

    /// Username, unless this is a guest.
    pub fn name(&self) -> Option<&str> {
        match self {
            Actor::User(name) => Some(name),
            Actor::Guest => None,
        }
    }

    /// True for the guest sentinel.
    pub fn is_guest(&self) -> bool {
        matches!(self, Actor::Guest)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or(GUEST_NAME))
    }
}

/// Supplies the current actor.
pub trait IdentityProvider: Send + Sync {
    /// Returns who is acting right now.
    fn actor(&self) -> Actor;
}

/// Identity fixed at startup.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    actor: Actor,
}

impl StaticIdentity {
    /// Creates a provider that always answers `actor`.
    pub fn new(actor: Actor) -> Self {
        Self { actor }
    }
}

impl IdentityProvider for StaticIdentity {
    fn actor(&self) -> Actor {
        self.actor.clone()
    }
}
