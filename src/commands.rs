// Admin command handlers: validate, mutate optimistically, persist, roll back
use crate::media::{probe, youtube};
use crate::remote::gateway::UploadFile;
use crate::settings::model::{
    creation_id, Photo, YoutubeVideo, MAX_INTERVAL_SECONDS, MIN_INTERVAL_SECONDS,
};
use crate::state::AppState;
use crate::view::{self, SyncStatus};

const SAVE_FAILED: &str = "Save failed. Please try again.";
const DELETE_FAILED: &str = "Delete failed. Please try again.";

/// Why a command did not go through. The display text is the dialog shown
/// to the operator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Input rejected up front: no state change, no remote call.
    #[error("{0}")]
    Invalid(String),
    /// The remote save failed; the optimistic mutation was rolled back.
    #[error("{0}")]
    SaveFailed(String),
    /// No file in the upload batch made it to storage.
    #[error("{0}")]
    UploadFailed(String),
}

/// What the operator sees after a command succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Confirmation dialog text.
    Message(String),
    /// No dialog; the re-rendered view is the feedback.
    Silent,
    /// Playback URL placed on the clipboard.
    Copied { url: String },
    /// No clipboard available; the operator selects the text manually.
    CopyManually { url: String },
}

/// Every operator intent the admin surface can raise, decoupled from any
/// particular UI toolkit.
#[derive(Debug, Clone)]
pub enum AdminCommand {
    SaveInterval { input: String },
    AddPhotoUrl { url: String },
    UploadPhotos { files: Vec<UploadFile> },
    RemovePhoto { id: i64 },
    AddYoutubeVideo { url: String },
    RemoveYoutubeVideo { id: i64 },
    SetBgm { url: String },
    ClearBgm,
    CopyPlaybackUrl { admin_url: String },
}

/// Route a command to its handler.
pub async fn dispatch(
    state: &AppState,
    command: AdminCommand,
) -> Result<CommandOutcome, CommandError> {
    match command {
        AdminCommand::SaveInterval { input } => save_interval(state, &input).await,
        AdminCommand::AddPhotoUrl { url } => add_photo_by_url(state, &url).await,
        AdminCommand::UploadPhotos { files } => upload_photos(state, &files).await,
        AdminCommand::RemovePhoto { id } => remove_photo(state, id).await,
        AdminCommand::AddYoutubeVideo { url } => add_youtube_video(state, &url).await,
        AdminCommand::RemoveYoutubeVideo { id } => remove_youtube_video(state, id).await,
        AdminCommand::SetBgm { url } => set_bgm(state, &url).await,
        AdminCommand::ClearBgm => clear_bgm(state).await,
        AdminCommand::CopyPlaybackUrl { admin_url } => Ok(copy_playback_url(state, &admin_url)),
    }
}

/// Persist the whole current snapshot, driving the sync indicator.
async fn save_all(state: &AppState) -> bool {
    state.set_status(SyncStatus::loading("Saving..."));

    let snapshot = state.with_store(|store| store.snapshot());
    let success = state.gateway.save_settings(&snapshot).await;

    if success {
        state.set_transient_status(SyncStatus::connected("Saved!"));
    } else {
        state.set_status(SyncStatus::error("Save failed"));
    }
    success
}

/// Startup flow: fetch the remote record, or persist defaults on first run.
pub async fn load_settings(state: &AppState) -> CommandOutcome {
    state.set_status(SyncStatus::loading("Loading..."));

    match state.gateway.load_settings().await {
        Some(record) => {
            state.with_store(|store| store.load(record));
            state.set_status(SyncStatus::connected("Connected"));
        }
        None => {
            // First run: persist the defaults so the TV has a row to read.
            let _ = save_all(state).await;
            state.set_status(SyncStatus::connected("Connected (new)"));
        }
    }
    CommandOutcome::Silent
}

// ===== Interval =====

pub async fn save_interval(state: &AppState, input: &str) -> Result<CommandOutcome, CommandError> {
    let invalid = || {
        CommandError::Invalid(format!(
            "Enter a value between {} and {} seconds.",
            MIN_INTERVAL_SECONDS, MAX_INTERVAL_SECONDS
        ))
    };

    let value: u32 = input.trim().parse().map_err(|_| invalid())?;
    if !(MIN_INTERVAL_SECONDS..=MAX_INTERVAL_SECONDS).contains(&value) {
        return Err(invalid());
    }

    let previous = state.with_store(|store| {
        let previous = store.interval_seconds();
        store.set_interval(value);
        previous
    });

    if save_all(state).await {
        Ok(CommandOutcome::Message(format!(
            "Display interval saved: {} seconds. The TV picks it up immediately.",
            value
        )))
    } else {
        state.with_store(|store| store.set_interval(previous));
        Err(CommandError::SaveFailed(SAVE_FAILED.to_string()))
    }
}

// ===== Photos =====

pub async fn add_photo_by_url(state: &AppState, url: &str) -> Result<CommandOutcome, CommandError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(CommandError::Invalid("Enter an image URL.".to_string()));
    }
    if !probe::has_supported_scheme(url) {
        return Err(CommandError::Invalid(
            "Not a valid URL (must start with http:// or https://).".to_string(),
        ));
    }

    state.set_status(SyncStatus::loading("Checking image..."));
    if !probe::check_image_url(&state.http, url).await {
        state.set_status(SyncStatus::connected("Connected"));
        return Err(CommandError::Invalid(
            "The image could not be loaded. Check the URL.".to_string(),
        ));
    }

    persist_new_photo(state, Photo::from_url(creation_id(0), url)).await
}

/// Optimistically append a validated photo and save; undo on failure.
async fn persist_new_photo(
    state: &AppState,
    photo: Photo,
) -> Result<CommandOutcome, CommandError> {
    let id = photo.id;
    state.with_store(|store| store.add_photo(photo));

    if save_all(state).await {
        Ok(CommandOutcome::Silent)
    } else {
        state.with_store(|store| store.remove_photo(id));
        Err(CommandError::SaveFailed(SAVE_FAILED.to_string()))
    }
}

pub async fn upload_photos(
    state: &AppState,
    files: &[UploadFile],
) -> Result<CommandOutcome, CommandError> {
    if files.is_empty() {
        return Err(CommandError::Invalid(
            "Select image files to upload.".to_string(),
        ));
    }

    let total = files.len();
    state.set_status(SyncStatus::loading(format!("Uploading... (0/{})", total)));

    let before = state.with_store(|store| store.snapshot());
    let mut uploaded = 0usize;

    for (index, file) in files.iter().enumerate() {
        // Silently skip anything that is not declared as an image.
        if !file.is_image() {
            continue;
        }

        state.set_status(SyncStatus::loading(format!(
            "Uploading... ({}/{})",
            index + 1,
            total
        )));

        if let Some(stored) = state.gateway.upload_file(file).await {
            let photo = Photo::from_storage(creation_id(index), stored.url, stored.path);
            state.with_store(|store| store.add_photo(photo));
            uploaded += 1;
        }
    }

    if uploaded == 0 {
        state.set_status(SyncStatus::connected("Connected"));
        return Err(CommandError::UploadFailed("Upload failed.".to_string()));
    }

    if save_all(state).await {
        Ok(CommandOutcome::Message(if uploaded == 1 {
            "1 photo uploaded.".to_string()
        } else {
            format!("{} photos uploaded.", uploaded)
        }))
    } else {
        state.with_store(|store| store.load(before));
        Err(CommandError::SaveFailed(SAVE_FAILED.to_string()))
    }
}

pub async fn remove_photo(state: &AppState, id: i64) -> Result<CommandOutcome, CommandError> {
    let target = state.with_store(|store| store.photos().iter().find(|p| p.id == id).cloned());
    let Some(photo) = target else {
        return Ok(CommandOutcome::Silent);
    };

    state.set_status(SyncStatus::loading("Deleting..."));

    // Backend-stored photos also lose their storage object. A failed
    // delete only leaves an orphan; the record removal still proceeds.
    if let Some(path) = photo.storage_path() {
        if !state.gateway.delete_file(path).await {
            tracing::warn!("orphaned storage object left behind: {}", path);
        }
    }

    let Some((index, removed)) = state.with_store(|store| store.remove_photo(id)) else {
        return Ok(CommandOutcome::Silent);
    };

    if save_all(state).await {
        Ok(CommandOutcome::Silent)
    } else {
        state.with_store(|store| store.insert_photo(index, removed));
        Err(CommandError::SaveFailed(DELETE_FAILED.to_string()))
    }
}

// ===== YouTube videos =====

pub async fn add_youtube_video(
    state: &AppState,
    url: &str,
) -> Result<CommandOutcome, CommandError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(CommandError::Invalid("Enter a YouTube URL.".to_string()));
    }
    let Some(video_id) = youtube::extract_video_id(url) else {
        return Err(CommandError::Invalid(
            "Not a valid YouTube URL (use a youtube.com or youtu.be link).".to_string(),
        ));
    };
    if state.with_store(|store| store.has_video(&video_id)) {
        return Err(CommandError::Invalid(
            "That video is already in the list.".to_string(),
        ));
    }

    state.set_status(SyncStatus::loading("Adding..."));

    let video = YoutubeVideo::new(creation_id(0), video_id, url);
    let id = video.id;
    state.with_store(|store| store.add_video(video));

    if save_all(state).await {
        Ok(CommandOutcome::Message("YouTube video added.".to_string()))
    } else {
        state.with_store(|store| store.remove_video(id));
        Err(CommandError::SaveFailed(SAVE_FAILED.to_string()))
    }
}

pub async fn remove_youtube_video(
    state: &AppState,
    id: i64,
) -> Result<CommandOutcome, CommandError> {
    state.set_status(SyncStatus::loading("Deleting..."));

    let Some((index, removed)) = state.with_store(|store| store.remove_video(id)) else {
        return Ok(CommandOutcome::Silent);
    };

    if save_all(state).await {
        Ok(CommandOutcome::Silent)
    } else {
        state.with_store(|store| store.insert_video(index, removed));
        Err(CommandError::SaveFailed(DELETE_FAILED.to_string()))
    }
}

// ===== BGM =====

pub async fn set_bgm(state: &AppState, url: &str) -> Result<CommandOutcome, CommandError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(CommandError::Invalid("Enter a YouTube URL.".to_string()));
    }
    if youtube::extract_video_id(url).is_none() {
        return Err(CommandError::Invalid(
            "Not a valid YouTube URL.".to_string(),
        ));
    }

    state.set_status(SyncStatus::loading("Saving..."));

    let previous = state.with_store(|store| store.set_bgm(url));

    if save_all(state).await {
        Ok(CommandOutcome::Message(
            "Background music set. It will play on the TV.".to_string(),
        ))
    } else {
        state.with_store(|store| store.restore_bgm(previous));
        Err(CommandError::SaveFailed(SAVE_FAILED.to_string()))
    }
}

pub async fn clear_bgm(state: &AppState) -> Result<CommandOutcome, CommandError> {
    if state.with_store(|store| store.bgm_url().is_none()) {
        return Err(CommandError::Invalid(
            "No background music is set.".to_string(),
        ));
    }

    state.set_status(SyncStatus::loading("Deleting..."));

    let previous = state.with_store(|store| store.clear_bgm());

    if save_all(state).await {
        Ok(CommandOutcome::Message("Background music removed.".to_string()))
    } else {
        state.with_store(|store| store.restore_bgm(previous));
        Err(CommandError::SaveFailed(DELETE_FAILED.to_string()))
    }
}

// ===== Playback page URL =====

/// Copy the sibling playback page's address. Tries the clipboard
/// capability first and falls back to handing the text back for manual
/// selection; both paths surface a visible confirmation.
pub fn copy_playback_url(state: &AppState, admin_url: &str) -> CommandOutcome {
    let url = view::playback_page_url(admin_url);

    match &state.clipboard {
        Some(clipboard) => match clipboard.write_text(&url) {
            Ok(()) => CommandOutcome::Copied { url },
            Err(e) => {
                tracing::debug!("clipboard write failed, falling back: {}", e);
                CommandOutcome::CopyManually { url }
            }
        },
        None => CommandOutcome::CopyManually { url },
    }
}
