//! Domain models shared by the store, services, and clients.

pub mod event;
pub mod notification;
pub mod post;
pub mod session;
pub mod user;

pub use event::{Event, EventId, EventPatch, EventStatus, NewEvent};
pub use notification::{Notification, NotificationId, NotificationKey, NotificationKind};
pub use post::{Author, Comment, CommentId, NewPost, Post, PostId, PostPatch};
pub use session::{AuthPayload, AuthUser, Credentials, Registration, Role, StoredCredentials};
pub use user::{Contributions, NewUser, User, UserId, UserPatch};
