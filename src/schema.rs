//! Action schema resolution.
//!
//! Mapping an action name (or explicit type identifier) to a concrete
//! schema belongs to the middleware side; the dispatcher only needs the
//! resolved channel set. Resolution failures are fatal and happen before
//! any subscription is created.

use crate::error::ResolveError;
use crate::interface::ActionInterface;

/// A resolved action: its name plus its type identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSchema {
    /// The action name, e.g. `/fibonacci`.
    pub action_name: String,
    /// The action type identifier, e.g. `example_interfaces/action/Fibonacci`.
    pub type_name: String,
}

impl ActionSchema {
    /// Creates a schema from a name and type identifier.
    #[must_use]
    pub fn new(action_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            action_name: action_name.into(),
            type_name: type_name.into(),
        }
    }

    /// The concrete channel backing one interface of this action.
    #[must_use]
    pub fn channel(&self, interface: ActionInterface) -> ChannelSpec {
        ChannelSpec {
            interface,
            name: interface.channel_name(&self.action_name),
            type_name: self.type_name.clone(),
        }
    }
}

/// One subscribable channel of a resolved action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    /// Which of the five interfaces this channel carries.
    pub interface: ActionInterface,
    /// The middleware channel name.
    pub name: String,
    /// The action type identifier the payload schema derives from.
    pub type_name: String,
}

/// Resolves an action name to its schema.
///
/// With an explicit type the name is taken as-is and only the type is
/// checked; without one the middleware's discovery answers for the name.
pub trait ResolveAction {
    /// Resolves `action_name`, optionally forced to `explicit_type`.
    ///
    /// # Errors
    ///
    /// [`ResolveError::UnknownAction`] when the name cannot be discovered,
    /// [`ResolveError::UnknownType`] when the explicit type is invalid.
    fn resolve(
        &self,
        action_name: &str,
        explicit_type: Option<&str>,
    ) -> Result<ActionSchema, ResolveError>;
}
