//! Domain entities - the core business objects.

mod comment;
mod listing;
mod policy;
mod post;
mod publish;
mod user;

pub use comment::Comment;
pub use listing::{Page, PageRequest, PostFilter};
pub use policy::{Access, can_modify};
pub use post::{Post, PostChanges};
pub use publish::{PublishState, Transition};
pub use user::{ProfileChanges, User};
