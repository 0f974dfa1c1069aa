//! Runtime identity of a command type.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The exact runtime type of a command, used as the dispatch key.
///
/// Two `CommandType`s are equal when their `TypeId`s are equal. The name
/// is kept for diagnostics only and never takes part in comparisons.
#[derive(Clone, Copy)]
pub struct CommandType {
    id: TypeId,
    name: &'static str,
}

impl CommandType {
    /// The command type of `C`.
    pub fn of<C: Any>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: type_name::<C>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, e.g. `alloc::string::String`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this is the command type of `C`.
    pub fn is<C: Any>(&self) -> bool {
        self.id == TypeId::of::<C>()
    }
}

impl PartialEq for CommandType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CommandType {}

impl Hash for CommandType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandType({})", self.name)
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
