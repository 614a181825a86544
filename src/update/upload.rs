//! Image upload handlers
//!
//! An upload is validated against the settings, given a ticket and the
//! caret offset at the time, and handed to the runtime. The completion
//! inserts a sanitized image at that offset if it is still a valid
//! insertion point, otherwise at the end of the content.

use crate::commands::Cmd;
use crate::diagnostics::LogEvent;
use crate::editable::markup::is_valid_offset;
use crate::editable::{EditableSurface, Selection};
use crate::messages::UploadMsg;
use crate::model::EditorModel;
use crate::runtime::UploadFile;
use crate::sanitize::{is_safe_url, sanitize};

use super::content::commit;
use super::mutate::{image_markup, insert_fragment};

/// Validate an upload and hand it to the runtime
pub fn begin_upload<S: EditableSurface>(
    model: &mut EditorModel<S>,
    file: UploadFile,
) -> Option<Cmd> {
    let settings = &model.settings;
    if !settings.features.images {
        model.report(LogEvent::FeatureDisabled {
            command: "uploadImage".to_string(),
        });
        return None;
    }
    if !settings.allows_upload_type(&file.mime) || file.size() > settings.max_upload_bytes {
        model.report(LogEvent::DisallowedUpload {
            name: file.name.clone(),
            mime: file.mime.clone(),
            size: file.size(),
        });
        return None;
    }

    let offset = model.surface.selection().head;
    let ticket = model.uploads.begin(offset, file.name.clone());
    model.log.debug(&format!(
        "upload #{} of {:?} started at offset {}",
        ticket, file.name, offset
    ));
    Some(Cmd::UploadImage { ticket, file })
}

/// Handle upload completions
pub fn update_upload<S: EditableSurface>(
    model: &mut EditorModel<S>,
    msg: UploadMsg,
) -> Option<Cmd> {
    match msg {
        UploadMsg::Completed { ticket, result } => {
            let Some(pending) = model.uploads.take(ticket) else {
                tracing::warn!("Upload completion for unknown ticket {}", ticket);
                return None;
            };

            let url = match result {
                Ok(url) => url,
                Err(e) => {
                    model.report(LogEvent::UploadFailed {
                        ticket,
                        reason: e.to_string(),
                    });
                    return None;
                }
            };
            if !is_safe_url(&url) {
                model.report(LogEvent::BlockedUrl { url });
                return None;
            }

            let fragment = sanitize(&image_markup(&url, &pending.name));
            let markup = model.surface.markup();
            let offset = if is_valid_offset(markup, pending.offset) {
                pending.offset
            } else {
                markup.len()
            };
            let edit = insert_fragment(markup, Selection::collapsed(offset), &fragment)?;
            model.surface.set_markup(edit.markup);
            model.surface.set_selection(edit.selection);
            commit(model)
        }
    }
}
