pub mod folder;
pub mod note;
pub mod tag;
pub mod user;

pub use folder::{Folder, FolderIcon, FolderUpdate, NewFolder};
pub use note::{Note, NoteUpdate, NoteVersion, UNTITLED};
pub use tag::Tag;
pub use user::User;
