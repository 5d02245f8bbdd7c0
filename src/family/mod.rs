mod backend;
mod infer;
mod member;
pub mod wire;

pub use backend::{BackendCall, BackendClient};
pub use member::{FamilyMember, FamilyTree, Position, RelationKind, Role};
