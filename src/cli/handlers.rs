use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::storage::JsonFileStorage;
use crate::model::{Folder, FolderIcon, FolderUpdate, NewFolder, Note, NoteUpdate};
use crate::ops::export::{self, ExportFormat};
use crate::ops::search;
use crate::session;
use crate::store::NoteStore;
use crate::sync::{self, SyncError, SyncSnapshot};

type Store = NoteStore<JsonFileStorage>;
type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let data_dir = cli
        .data_dir
        .map(PathBuf::from)
        .unwrap_or_else(config_io::default_data_dir);
    let storage = JsonFileStorage::open(data_dir)?;

    // Session commands operate on the raw storage; everything else
    // opens the store under the signed-in user's namespace.
    match cli.command {
        Commands::Login(args) => cmd_login(storage, args, json),
        Commands::Logout => cmd_logout(storage),
        Commands::Whoami => cmd_whoami(storage, json),
        command => {
            let user = session::current_user(&storage)?;
            let store = NoteStore::open(storage, user.as_ref().map(|u| u.id.as_str()))?;
            dispatch_store(command, store, json)
        }
    }
}

fn dispatch_store(command: Commands, store: Store, json: bool) -> CmdResult {
    match command {
        Commands::Login(_) | Commands::Logout | Commands::Whoami => unreachable!(),

        // Read commands
        Commands::List(args) => cmd_list(&store, args, json),
        Commands::Show(args) => cmd_show(&store, args, json),
        Commands::Versions(args) => cmd_versions(&store, args, json),
        Commands::Search(args) => cmd_search(&store, args, json),
        Commands::Export(args) => cmd_export(&store, args),

        // Write commands
        Commands::New(args) => cmd_new(store, args),
        Commands::Edit(args) => cmd_edit(store, args),
        Commands::Rm(args) => cmd_rm(store, args),
        Commands::Pin(args) => cmd_pin(store, args),
        Commands::Open(args) => cmd_open(store, args),
        Commands::Undo => cmd_undo(store),
        Commands::Redo => cmd_redo(store),
        Commands::Restore(args) => cmd_restore(store, args),
        Commands::Protect(args) => cmd_protect(store, args),
        Commands::Share(args) => cmd_share(store, args),
        Commands::Bg(args) => cmd_bg(store, args),

        // Folder & tag management
        Commands::Folder(args) => cmd_folder(store, args, json),
        Commands::Tag(args) => cmd_tag(store, args, json),

        // Sync
        Commands::Sync(args) => cmd_sync(&store, args, json),
    }
}

// ---------------------------------------------------------------------------
// Id resolution
// ---------------------------------------------------------------------------

/// Resolve a note by exact id or unique id prefix.
fn resolve_note(store: &Store, idish: &str) -> Result<String, Box<dyn std::error::Error>> {
    if store.note(idish).is_some() {
        return Ok(idish.to_string());
    }
    let matches: Vec<&str> = store
        .notes()
        .iter()
        .filter(|n| n.id.starts_with(idish))
        .map(|n| n.id.as_str())
        .collect();
    match matches.len() {
        0 => Err(format!("no note matching '{}'", idish).into()),
        1 => Ok(matches[0].to_string()),
        n => Err(format!("ambiguous note id '{}' ({} matches)", idish, n).into()),
    }
}

/// Resolve a folder by exact id, unique id prefix, or exact name.
fn resolve_folder(store: &Store, idish: &str) -> Result<String, Box<dyn std::error::Error>> {
    if store.folder(idish).is_some() {
        return Ok(idish.to_string());
    }
    let by_name: Vec<&str> = store
        .folders()
        .iter()
        .filter(|f| f.name == idish)
        .map(|f| f.id.as_str())
        .collect();
    if by_name.len() == 1 {
        return Ok(by_name[0].to_string());
    }
    let by_prefix: Vec<&str> = store
        .folders()
        .iter()
        .filter(|f| f.id.starts_with(idish))
        .map(|f| f.id.as_str())
        .collect();
    match by_prefix.len() {
        0 if by_name.is_empty() => Err(format!("no folder matching '{}'", idish).into()),
        1 => Ok(by_prefix[0].to_string()),
        _ => Err(format!("ambiguous folder '{}'", idish).into()),
    }
}

/// Resolve a tag by exact id, exact name, or unique id prefix.
fn resolve_tag(store: &Store, idish: &str) -> Result<String, Box<dyn std::error::Error>> {
    if store.tag(idish).is_some() {
        return Ok(idish.to_string());
    }
    if let Some(tag) = store.tag_by_name(idish) {
        return Ok(tag.id.clone());
    }
    let by_prefix: Vec<&str> = store
        .tags()
        .iter()
        .filter(|t| t.id.starts_with(idish))
        .map(|t| t.id.as_str())
        .collect();
    match by_prefix.len() {
        0 => Err(format!("no tag matching '{}'", idish).into()),
        1 => Ok(by_prefix[0].to_string()),
        _ => Err(format!("ambiguous tag '{}'", idish).into()),
    }
}

fn parse_icon(s: &str) -> Result<FolderIcon, Box<dyn std::error::Error>> {
    FolderIcon::parse_icon(s)
        .ok_or_else(|| format!("unknown icon '{}' (try: folder, folder-code, folder-star, ...)", s).into())
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

fn cmd_login(mut storage: JsonFileStorage, args: LoginArgs, json: bool) -> CmdResult {
    let user = session::login(&mut storage, &args.email, &args.password)??;
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!("signed in as {} ({})", user.name, user.email);
    }
    Ok(())
}

fn cmd_logout(mut storage: JsonFileStorage) -> CmdResult {
    session::logout(&mut storage)?;
    println!("signed out");
    Ok(())
}

fn cmd_whoami(storage: JsonFileStorage, json: bool) -> CmdResult {
    match session::current_user(&storage)? {
        Some(user) if json => println!("{}", serde_json::to_string_pretty(&user)?),
        Some(user) => println!("{} ({})", user.name, user.email),
        None => println!("not signed in"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(store: &Store, args: ListArgs, json: bool) -> CmdResult {
    let folder_filter = match (&args.folder, args.root) {
        (Some(folder), _) => Some(Some(resolve_folder(store, folder)?)),
        (None, true) => Some(None),
        (None, false) => None,
    };
    let tag_filter = match &args.tag {
        Some(tag) => Some(resolve_tag(store, tag)?),
        None => None,
    };

    let mut notes: Vec<&Note> = store
        .notes()
        .iter()
        .filter(|n| match &folder_filter {
            Some(want) => n.folder_id == *want,
            None => true,
        })
        .filter(|n| match &tag_filter {
            Some(tag_id) => n.tags.iter().any(|t| t == tag_id),
            None => true,
        })
        .filter(|n| !args.pinned || n.is_pinned)
        .collect();

    // Pinned first, then most recently updated
    notes.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then(b.updated_at.cmp(&a.updated_at))
    });

    if json {
        let out: Vec<NoteJson> = notes
            .iter()
            .map(|n| note_to_json(n, store.tags()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for note in notes {
            println!("{}", format_note_line(note, store.tags()));
        }
    }
    Ok(())
}

fn cmd_show(store: &Store, args: ShowArgs, json: bool) -> CmdResult {
    let id = resolve_note(store, &args.id)?;
    let note = store
        .note(&id)
        .ok_or_else(|| format!("no note matching '{}'", args.id))?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&note_to_detail_json(note, store.tags()))?
        );
    } else {
        let folder = note.folder_id.as_deref().and_then(|f| store.folder(f));
        for line in format_note_detail(note, store.tags(), folder) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_versions(store: &Store, args: VersionsArgs, json: bool) -> CmdResult {
    let id = resolve_note(store, &args.id)?;
    let note = store
        .note(&id)
        .ok_or_else(|| format!("no note matching '{}'", args.id))?;

    if json {
        let out: Vec<VersionJson> = note
            .previous_versions
            .iter()
            .map(|v| VersionJson {
                version: v.version,
                updated_at: v.updated_at,
                preview: preview_line(&v.content),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if note.previous_versions.is_empty() {
        println!("no previous versions (current: v{})", note.version);
        return Ok(());
    }
    for v in &note.previous_versions {
        println!(
            "v{}  {}  {}",
            v.version,
            v.updated_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            preview_line(&v.content)
        );
    }
    println!("current: v{}", note.version);
    Ok(())
}

fn preview_line(content: &str) -> String {
    let line = content.lines().next().unwrap_or("");
    if line.chars().count() > 60 {
        format!("{}...", line.chars().take(60).collect::<String>())
    } else {
        line.to_string()
    }
}

fn cmd_search(store: &Store, args: SearchArgs, json: bool) -> CmdResult {
    let re = Regex::new(&args.pattern)?;
    let hits = search::search_notes(store.notes(), store.tags(), &re);
    if json {
        let out: Vec<SearchHitJson> = hits.iter().map(search_hit_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for hit in &hits {
            println!(
                "{}  {} [{}]: {}",
                short_id(&hit.note_id),
                hit.note_title,
                hit.field.as_str(),
                hit.line
            );
        }
        if hits.is_empty() {
            println!("no matches");
        }
    }
    Ok(())
}

fn cmd_export(store: &Store, args: ExportArgs) -> CmdResult {
    let id = resolve_note(store, &args.id)?;
    let note = store
        .note(&id)
        .ok_or_else(|| format!("no note matching '{}'", args.id))?;
    let format = ExportFormat::parse_format(&args.format)?;
    let content = export::export_note(note, format);
    match args.out {
        Some(path) => {
            fs::write(&path, &content)?;
            println!("exported to {}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_new(mut store: Store, args: NewArgs) -> CmdResult {
    let id = if args.root {
        store.create_note_in(None)?
    } else if let Some(folder) = &args.folder {
        let folder_id = resolve_folder(&store, folder)?;
        store.create_note_in(Some(folder_id))?
    } else {
        store.create_note()?
    };
    if let Some(title) = args.title {
        store.update_note(&id, NoteUpdate::title(title))?;
    }
    println!("created {}", short_id(&id));
    Ok(())
}

fn cmd_edit(mut store: Store, args: EditArgs) -> CmdResult {
    let id = resolve_note(&store, &args.id)?;
    let folder_id = match (&args.folder, args.root) {
        (Some(folder), _) => Some(Some(resolve_folder(&store, folder)?)),
        (None, true) => Some(None),
        (None, false) => None,
    };
    let update = NoteUpdate {
        title: args.title,
        content: args.content,
        folder_id,
        ..Default::default()
    };
    if update.is_empty() {
        return Err("nothing to edit (try --title, --content, --folder or --root)".into());
    }
    store.update_note(&id, update)?;
    println!("updated {}", short_id(&id));
    Ok(())
}

fn cmd_rm(mut store: Store, args: RmArgs) -> CmdResult {
    let mut ids = Vec::new();
    for idish in &args.ids {
        ids.push(resolve_note(&store, idish)?);
    }
    store.delete_notes(&ids)?;
    println!("deleted {} note{}", ids.len(), if ids.len() == 1 { "" } else { "s" });
    Ok(())
}

fn cmd_pin(mut store: Store, args: PinArgs) -> CmdResult {
    let id = resolve_note(&store, &args.id)?;
    store.toggle_pinned(&id)?;
    let pinned = store.note(&id).map(|n| n.is_pinned).unwrap_or(false);
    println!("{} {}", if pinned { "pinned" } else { "unpinned" }, short_id(&id));
    Ok(())
}

fn cmd_open(mut store: Store, args: OpenArgs) -> CmdResult {
    match (args.id, args.clear) {
        (Some(idish), _) => {
            let id = resolve_note(&store, &idish)?;
            store.set_active_note(Some(id.clone()))?;
            println!("active note: {}", short_id(&id));
        }
        (None, true) => {
            store.set_active_note(None)?;
            println!("active note cleared");
        }
        (None, false) => return Err("give a note id, or --clear".into()),
    }
    Ok(())
}

fn cmd_undo(mut store: Store) -> CmdResult {
    if store.undo()? {
        println!("undid last notes change");
    } else {
        println!("nothing to undo");
    }
    Ok(())
}

fn cmd_redo(mut store: Store) -> CmdResult {
    if store.redo()? {
        println!("redid notes change");
    } else {
        println!("nothing to redo");
    }
    Ok(())
}

fn cmd_restore(mut store: Store, args: RestoreArgs) -> CmdResult {
    let id = resolve_note(&store, &args.id)?;
    if store.restore_version(&id, args.version)? {
        println!("restored v{} of {}", args.version, short_id(&id));
        Ok(())
    } else {
        Err(format!("note {} has no version {}", short_id(&id), args.version).into())
    }
}

fn cmd_protect(mut store: Store, args: ProtectArgs) -> CmdResult {
    let id = resolve_note(&store, &args.id)?;
    if args.remove {
        store.protect_note(&id, None)?;
        println!("password protection removed from {}", short_id(&id));
        return Ok(());
    }
    let Some(password) = args.password else {
        return Err("give --password <password>, or --remove".into());
    };
    store.protect_note(&id, Some(password))?;
    println!("password protected {}", short_id(&id));
    Ok(())
}

fn cmd_share(mut store: Store, args: ShareArgs) -> CmdResult {
    let id = resolve_note(&store, &args.id)?;
    let config = config_io::read_config();
    match store.share_note(&id, !args.off, &config.share.base_url)? {
        Some(link) => println!("{}", link),
        None => println!("{} is now private", short_id(&id)),
    }
    Ok(())
}

fn cmd_bg(mut store: Store, args: BgArgs) -> CmdResult {
    match args.note {
        Some(idish) => {
            let id = resolve_note(&store, &idish)?;
            store.update_note(
                &id,
                NoteUpdate {
                    background_color: Some(Some(args.color.clone())),
                    ..Default::default()
                },
            )?;
            println!("background of {} set to {}", short_id(&id), args.color);
        }
        None => {
            store.set_default_background(&args.color)?;
            println!("default background set to {}", args.color);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Folder management
// ---------------------------------------------------------------------------

fn cmd_folder(store: Store, cmd: FolderCmd, json: bool) -> CmdResult {
    match cmd.action {
        FolderAction::New(args) => cmd_folder_new(store, args),
        FolderAction::List => cmd_folder_list(&store, json),
        FolderAction::Edit(args) => cmd_folder_edit(store, args),
        FolderAction::Rm(args) => cmd_folder_rm(store, args),
        FolderAction::Open(args) => cmd_folder_open(store, args),
    }
}

fn cmd_folder_new(mut store: Store, args: FolderNewArgs) -> CmdResult {
    let icon = args.icon.as_deref().map(parse_icon).transpose()?;
    let parent_id = args
        .parent
        .as_deref()
        .map(|p| resolve_folder(&store, p))
        .transpose()?;
    let id = store.create_folder(NewFolder {
        name: args.name,
        color: args.color,
        icon,
        parent_id,
    })?;
    println!("created folder {}", short_id(&id));
    Ok(())
}

fn cmd_folder_list(store: &Store, json: bool) -> CmdResult {
    let note_count = |folder_id: &str| {
        store
            .notes()
            .iter()
            .filter(|n| n.folder_id.as_deref() == Some(folder_id))
            .count()
    };

    if json {
        let out: Vec<FolderJson> = store
            .folders()
            .iter()
            .map(|f| FolderJson {
                id: f.id.clone(),
                name: f.name.clone(),
                color: f.color.clone(),
                icon: f.icon.map(|i| i.as_str().to_string()),
                parent_id: f.parent_id.clone(),
                notes: note_count(&f.id),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    // Depth-first from the roots so nesting reads as indentation
    fn walk(store: &Store, parent: Option<&str>, depth: usize, out: &mut Vec<(usize, Folder)>) {
        for folder in store.folders() {
            if folder.parent_id.as_deref() == parent {
                out.push((depth, folder.clone()));
                walk(store, Some(&folder.id), depth + 1, out);
            }
        }
    }
    let mut rows = Vec::new();
    walk(store, None, 0, &mut rows);
    for (depth, folder) in rows {
        println!("{}", format_folder_line(&folder, note_count(&folder.id), depth));
    }
    let root_notes = store.notes().iter().filter(|n| n.folder_id.is_none()).count();
    println!("(root)  {} notes", root_notes);
    Ok(())
}

fn cmd_folder_edit(mut store: Store, args: FolderEditArgs) -> CmdResult {
    let id = resolve_folder(&store, &args.id)?;
    let icon = args.icon.as_deref().map(parse_icon).transpose()?;
    let parent_id = match (&args.parent, args.root) {
        (Some(parent), _) => Some(Some(resolve_folder(&store, parent)?)),
        (None, true) => Some(None),
        (None, false) => None,
    };
    if args.name.is_none() && args.color.is_none() && icon.is_none() && parent_id.is_none() {
        return Err("nothing to edit (try --name, --color, --icon, --parent or --root)".into());
    }
    store.update_folder(
        &id,
        FolderUpdate {
            name: args.name,
            color: args.color.map(Some),
            icon: icon.map(Some),
            parent_id,
        },
    )?;
    println!("updated folder {}", short_id(&id));
    Ok(())
}

fn cmd_folder_rm(mut store: Store, args: FolderIdArg) -> CmdResult {
    let id = resolve_folder(&store, &args.id)?;
    store.delete_folder(&id)?;
    println!("deleted folder {} (its notes moved to root)", short_id(&id));
    Ok(())
}

fn cmd_folder_open(mut store: Store, args: FolderOpenArgs) -> CmdResult {
    match (args.id, args.clear) {
        (Some(idish), _) => {
            let id = resolve_folder(&store, &idish)?;
            store.set_active_folder(Some(id.clone()))?;
            println!("active folder: {}", short_id(&id));
        }
        (None, true) => {
            store.set_active_folder(None)?;
            println!("active folder cleared");
        }
        (None, false) => return Err("give a folder id, or --clear".into()),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tag management
// ---------------------------------------------------------------------------

fn cmd_tag(store: Store, cmd: TagCmd, json: bool) -> CmdResult {
    match cmd.action {
        TagAction::New(args) => cmd_tag_new(store, args),
        TagAction::List => cmd_tag_list(&store, json),
        TagAction::Rm(args) => cmd_tag_rm(store, args),
        TagAction::Add(args) => cmd_tag_add(store, args),
        TagAction::Remove(args) => cmd_tag_remove(store, args),
    }
}

fn cmd_tag_new(mut store: Store, args: TagNewArgs) -> CmdResult {
    let id = store.create_tag(&args.name, &args.color)?;
    println!("created tag #{} ({})", args.name, short_id(&id));
    Ok(())
}

fn cmd_tag_list(store: &Store, json: bool) -> CmdResult {
    let note_count = |tag_id: &str| {
        store
            .notes()
            .iter()
            .filter(|n| n.tags.iter().any(|t| t == tag_id))
            .count()
    };
    if json {
        let out: Vec<TagJson> = store
            .tags()
            .iter()
            .map(|t| TagJson {
                id: t.id.clone(),
                name: t.name.clone(),
                color: t.color.clone(),
                notes: note_count(&t.id),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    for tag in store.tags() {
        println!("{}", format_tag_line(tag, note_count(&tag.id)));
    }
    Ok(())
}

fn cmd_tag_rm(mut store: Store, args: TagIdArg) -> CmdResult {
    let id = resolve_tag(&store, &args.tag)?;
    store.delete_tag(&id)?;
    println!("deleted tag {} (removed from all notes)", short_id(&id));
    Ok(())
}

fn cmd_tag_add(mut store: Store, args: TagNoteArgs) -> CmdResult {
    let note_id = resolve_note(&store, &args.note)?;
    let tag_id = resolve_tag(&store, &args.tag)?;
    store.add_tag_to_note(&note_id, &tag_id)?;
    println!("tagged {}", short_id(&note_id));
    Ok(())
}

fn cmd_tag_remove(mut store: Store, args: TagNoteArgs) -> CmdResult {
    let note_id = resolve_note(&store, &args.note)?;
    let tag_id = resolve_tag(&store, &args.tag)?;
    store.remove_tag_from_note(&note_id, &tag_id)?;
    println!("untagged {}", short_id(&note_id));
    Ok(())
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

fn cmd_sync(store: &Store, args: SyncArgs, json: bool) -> CmdResult {
    if args.enable || args.disable {
        let mut config = config_io::read_config();
        config.sync.enabled = args.enable;
        config_io::write_config(&config)?;
        println!("cloud sync {}", if args.enable { "enabled" } else { "disabled" });
        return Ok(());
    }

    let config = config_io::read_config();
    if !config.sync.enabled {
        return Err(Box::new(SyncError::Disabled));
    }
    let mut provider = sync::provider_for(
        &config.sync.provider,
        Duration::from_millis(config.sync.latency_ms),
    )?;
    let snapshot = SyncSnapshot {
        notes: store.notes(),
        folders: store.folders(),
        tags: store.tags(),
    };
    let report = provider.sync(&snapshot)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&sync_report_to_json(&report))?);
    } else {
        println!(
            "synced to {}: {} notes, {} folders, {} tags",
            report.provider, report.notes, report.folders, report.tags
        );
    }
    Ok(())
}
