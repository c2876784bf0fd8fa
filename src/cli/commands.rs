use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "nf", about = concat!("[~] noteflow v", env!("CARGO_PKG_VERSION"), " - your notes, with history"), version, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in (namespaces your data per user)
    Login(LoginArgs),
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Create a note
    New(NewArgs),
    /// List notes
    List(ListArgs),
    /// Show a note in full
    Show(ShowArgs),
    /// Edit a note's fields
    Edit(EditArgs),
    /// Delete notes
    Rm(RmArgs),
    /// Toggle a note's pin
    Pin(PinArgs),
    /// Set (or clear) the active note
    Open(OpenArgs),
    /// Folder management
    Folder(FolderCmd),
    /// Tag management
    Tag(TagCmd),
    /// Undo the last notes change
    Undo,
    /// Redo an undone notes change
    Redo,
    /// List a note's version history
    Versions(VersionsArgs),
    /// Restore a previous version's content
    Restore(RestoreArgs),
    /// Password-protect a note (or remove protection)
    Protect(ProtectArgs),
    /// Share a note publicly (or make it private again)
    Share(ShareArgs),
    /// Search notes by regex
    Search(SearchArgs),
    /// Export a note
    Export(ExportArgs),
    /// Set a note's background color, or the default
    Bg(BgArgs),
    /// Sync to the configured cloud provider
    Sync(SyncArgs),
}

// ---------------------------------------------------------------------------
// Session args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LoginArgs {
    /// Email address
    pub email: String,
    /// Password (at least 6 characters)
    pub password: String,
}

// ---------------------------------------------------------------------------
// Note args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct NewArgs {
    /// Title for the new note (default: "Untitled Note")
    pub title: Option<String>,
    /// Folder to create the note in (id, unique prefix, or name)
    #[arg(long, conflicts_with = "root")]
    pub folder: Option<String>,
    /// Create at root level even if a folder is active
    #[arg(long)]
    pub root: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only notes in this folder (id, unique prefix, or name)
    #[arg(long, conflicts_with = "root")]
    pub folder: Option<String>,
    /// Only root-level notes
    #[arg(long)]
    pub root: bool,
    /// Only notes carrying this tag (name or id)
    #[arg(long)]
    pub tag: Option<String>,
    /// Only pinned notes
    #[arg(long)]
    pub pinned: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Note id (or unique prefix)
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Note id (or unique prefix)
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New markdown content
    #[arg(long)]
    pub content: Option<String>,
    /// Move to this folder
    #[arg(long, conflicts_with = "root")]
    pub folder: Option<String>,
    /// Move to root level
    #[arg(long)]
    pub root: bool,
}

#[derive(Args)]
pub struct RmArgs {
    /// Note ids (or unique prefixes) to delete
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct PinArgs {
    /// Note id (or unique prefix)
    pub id: String,
}

#[derive(Args)]
pub struct OpenArgs {
    /// Note id (omit with --clear)
    pub id: Option<String>,
    /// Clear the active note
    #[arg(long)]
    pub clear: bool,
}

// ---------------------------------------------------------------------------
// Folder management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct FolderCmd {
    #[command(subcommand)]
    pub action: FolderAction,
}

#[derive(Subcommand)]
pub enum FolderAction {
    /// Create a folder
    New(FolderNewArgs),
    /// List folders
    List,
    /// Edit a folder's fields
    Edit(FolderEditArgs),
    /// Delete a folder (its notes move to root)
    Rm(FolderIdArg),
    /// Set (or clear) the active folder
    Open(FolderOpenArgs),
}

#[derive(Args)]
pub struct FolderNewArgs {
    /// Folder name
    pub name: String,
    /// Folder color (hex)
    #[arg(long)]
    pub color: Option<String>,
    /// Folder icon (e.g. folder-code, folder-star)
    #[arg(long)]
    pub icon: Option<String>,
    /// Parent folder (id, unique prefix, or name)
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Args)]
pub struct FolderEditArgs {
    /// Folder id (or unique prefix, or name)
    pub id: String,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New color (hex)
    #[arg(long)]
    pub color: Option<String>,
    /// New icon
    #[arg(long)]
    pub icon: Option<String>,
    /// New parent folder
    #[arg(long, conflicts_with = "root")]
    pub parent: Option<String>,
    /// Move to root level
    #[arg(long)]
    pub root: bool,
}

#[derive(Args)]
pub struct FolderIdArg {
    /// Folder id (or unique prefix, or name)
    pub id: String,
}

#[derive(Args)]
pub struct FolderOpenArgs {
    /// Folder id (omit with --clear)
    pub id: Option<String>,
    /// Clear the active folder
    #[arg(long)]
    pub clear: bool,
}

// ---------------------------------------------------------------------------
// Tag management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TagCmd {
    #[command(subcommand)]
    pub action: TagAction,
}

#[derive(Subcommand)]
pub enum TagAction {
    /// Create a tag
    New(TagNewArgs),
    /// List tags
    List,
    /// Delete a tag (removes it from every note)
    Rm(TagIdArg),
    /// Add a tag to a note
    Add(TagNoteArgs),
    /// Remove a tag from a note
    Remove(TagNoteArgs),
}

#[derive(Args)]
pub struct TagNewArgs {
    /// Tag name
    pub name: String,
    /// Tag color (hex)
    #[arg(long, default_value = "#6366f1")]
    pub color: String,
}

#[derive(Args)]
pub struct TagIdArg {
    /// Tag id or name
    pub tag: String,
}

#[derive(Args)]
pub struct TagNoteArgs {
    /// Note id (or unique prefix)
    pub note: String,
    /// Tag id or name
    pub tag: String,
}

// ---------------------------------------------------------------------------
// Versions & sharing
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct VersionsArgs {
    /// Note id (or unique prefix)
    pub id: String,
}

#[derive(Args)]
pub struct RestoreArgs {
    /// Note id (or unique prefix)
    pub id: String,
    /// Version number to restore
    pub version: u32,
}

#[derive(Args)]
pub struct ProtectArgs {
    /// Note id (or unique prefix)
    pub id: String,
    /// Password to set
    #[arg(long, conflicts_with = "remove")]
    pub password: Option<String>,
    /// Remove password protection
    #[arg(long)]
    pub remove: bool,
}

#[derive(Args)]
pub struct ShareArgs {
    /// Note id (or unique prefix)
    pub id: String,
    /// Make the note private again
    #[arg(long)]
    pub off: bool,
}

// ---------------------------------------------------------------------------
// Search, export, misc
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern to search for
    pub pattern: String,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Note id (or unique prefix)
    pub id: String,
    /// Output format: markdown, html, json, text
    #[arg(long, default_value = "markdown")]
    pub format: String,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Args)]
pub struct BgArgs {
    /// Background color (hex)
    pub color: String,
    /// Apply to this note instead of the default background
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args)]
pub struct SyncArgs {
    /// Enable cloud sync
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,
    /// Disable cloud sync
    #[arg(long)]
    pub disable: bool,
}
