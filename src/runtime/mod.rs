//! Runtime module - drives the model and executes side effects
//!
//! The runtime owns the model and a message channel. [`Runtime::dispatch`]
//! runs one `update` and executes the returned [`Cmd`]; timers and uploads
//! run on worker threads and report back through the channel, so the model
//! itself is only ever touched from the thread that owns the runtime.
//!
//! - `upload` - image upload collaborator
//! - `store` - local fallback store for drafts

pub mod store;
pub mod upload;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use crate::commands::Cmd;
use crate::editable::{EditableSurface, MarkupSurface};
use crate::messages::{AutosaveMsg, FormatMsg, Msg, UploadMsg};
use crate::model::{ContentChange, EditorModel};
use crate::update::update;

pub use store::{FallbackStore, FileFallbackStore, MemoryStore, StoreError};
pub use upload::{ImageUploader, NoUploader, UploadError, UploadFile};

/// Called with every committed change
pub type ChangeObserver = Box<dyn FnMut(&ContentChange)>;

/// Event loop around an [`EditorModel`]
pub struct Runtime<S: EditableSurface = MarkupSurface> {
    model: EditorModel<S>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    uploader: Arc<dyn ImageUploader>,
    store: Box<dyn FallbackStore>,
    observer: Option<ChangeObserver>,
}

impl<S: EditableSurface> Runtime<S> {
    /// Runtime with no uploader and an in-memory store
    pub fn new(model: EditorModel<S>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model,
            msg_tx,
            msg_rx,
            uploader: Arc::new(NoUploader),
            store: Box::new(MemoryStore::new()),
            observer: None,
        }
    }

    pub fn with_uploader(mut self, uploader: impl ImageUploader + 'static) -> Self {
        self.uploader = Arc::new(uploader);
        self
    }

    pub fn with_store(mut self, store: impl FallbackStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Register the change observer, replacing any previous one
    pub fn on_change(mut self, observer: impl FnMut(&ContentChange) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn model(&self) -> &EditorModel<S> {
        &self.model
    }

    /// Direct model access, e.g. for typing into the surface before an
    /// `InternalEdit`
    pub fn model_mut(&mut self) -> &mut EditorModel<S> {
        &mut self.model
    }

    pub fn into_model(self) -> EditorModel<S> {
        self.model
    }

    /// Handle for posting messages from other threads
    pub fn sender(&self) -> Sender<Msg> {
        self.msg_tx.clone()
    }

    /// Run one message through `update` and execute the resulting command
    pub fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    /// Handle every message already queued. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
            handled += 1;
        }
        handled
    }

    /// Handle messages until none arrives within `idle`.
    /// Returns how many were handled.
    pub fn run_until_idle(&mut self, idle: Duration) -> usize {
        let mut handled = 0;
        loop {
            match self.msg_rx.recv_timeout(idle) {
                Ok(msg) => {
                    self.dispatch(msg);
                    handled += 1;
                }
                Err(_) => return handled,
            }
        }
    }

    /// Load a draft from the fallback store and feed it through the
    /// synchronizer. Returns whether a draft was found.
    pub fn restore_draft(&mut self) -> bool {
        match self.store.load() {
            Ok(Some(draft)) => {
                tracing::info!("Restoring draft ({} bytes)", draft.len());
                self.dispatch(Msg::external(draft));
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Failed to load draft: {}", e);
                false
            }
        }
    }

    /// Drop the stored draft, e.g. after the host saved the content
    pub fn clear_draft(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear draft: {}", e);
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::NotifyChange(change) => {
                if let Some(observer) = self.observer.as_mut() {
                    observer(&change);
                }
            }
            Cmd::RefreshFormats => {
                // Next turn of the loop
                let _ = self.msg_tx.send(Msg::Format(FormatMsg::Refresh));
            }
            Cmd::DebouncedAutosave { revision, delay_ms } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_millis(delay_ms));
                    let _ = tx.send(Msg::Autosave(AutosaveMsg::Ready { revision }));
                });
            }
            Cmd::PersistFallback { markup } => match self.store.save(&markup) {
                Ok(()) => tracing::debug!("Persisted draft ({} bytes)", markup.len()),
                Err(e) => tracing::warn!("Failed to persist draft: {}", e),
            },
            Cmd::UploadImage { ticket, file } => {
                let tx = self.msg_tx.clone();
                let uploader = Arc::clone(&self.uploader);
                std::thread::spawn(move || {
                    let result = uploader.upload(&file);
                    let _ = tx.send(Msg::Upload(UploadMsg::Completed { ticket, result }));
                });
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorSettings;
    use crate::editable::Selection;
    use crate::messages::ContentMsg;
    use std::cell::RefCell;
    use std::rc::Rc;

    const IDLE: Duration = Duration::from_millis(200);

    fn settings(autosave_ms: u64) -> EditorSettings {
        EditorSettings {
            autosave_interval_ms: autosave_ms,
            ..EditorSettings::default()
        }
    }

    #[test]
    fn test_observer_sees_internal_edits() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut runtime = Runtime::new(EditorModel::new(settings(0)))
            .on_change(move |change| sink.borrow_mut().push(change.clone()));

        runtime.model_mut().surface.type_text("hello world");
        runtime.dispatch(Msg::Content(ContentMsg::InternalEdit));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].plain_text, "hello world");
        assert_eq!(seen[0].word_count, 2);
    }

    #[test]
    fn test_format_refresh_is_deferred() {
        let mut runtime = Runtime::new(EditorModel::new(settings(0)));
        runtime.dispatch(Msg::external("<p>x</p>"));
        runtime.dispatch(Msg::Selection(crate::messages::SelectionMsg::Set(
            Selection::new(3, 4),
        )));
        runtime.dispatch(Msg::execute("bold", None));
        assert!(runtime.model().formats.inline.is_empty());

        assert!(runtime.pump() >= 1);
        assert!(runtime
            .model()
            .formats
            .contains(crate::model::InlineFormat::Bold));
    }

    #[test]
    fn test_debounced_autosave_persists_last_edit() {
        let store = Arc::new(MemoryStore::new());
        let mut runtime =
            Runtime::new(EditorModel::new(settings(20))).with_store(Arc::clone(&store));

        for text in ["a", "b", "c"] {
            runtime.model_mut().surface.type_text(text);
            runtime.dispatch(Msg::Content(ContentMsg::InternalEdit));
        }
        runtime.run_until_idle(IDLE);

        assert_eq!(store.draft().as_deref(), Some("abc"));
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn test_store_failure_is_swallowed() {
        let mut runtime =
            Runtime::new(EditorModel::new(settings(1))).with_store(MemoryStore::with_limit(2));
        runtime.model_mut().surface.type_text("too long");
        runtime.dispatch(Msg::Content(ContentMsg::InternalEdit));
        runtime.run_until_idle(IDLE);
        assert_eq!(runtime.model().markup(), "too long");
    }

    #[test]
    fn test_restore_draft_goes_through_sanitizer() {
        let mut runtime = Runtime::new(EditorModel::new(settings(0)))
            .with_store(MemoryStore::with_draft("<p>hi<script>x</script></p>"));
        assert!(runtime.restore_draft());
        assert_eq!(runtime.model().markup(), "<p>hi</p>");
        assert_eq!(runtime.model().history.len(), 1);
    }

    #[test]
    fn test_upload_round_trip() {
        let uploader =
            |file: &UploadFile| Ok::<_, UploadError>(format!("https://cdn.example/{}", file.name));
        let mut runtime = Runtime::new(EditorModel::new(settings(0))).with_uploader(uploader);
        runtime.dispatch(Msg::external("<p>ab</p>"));
        runtime.dispatch(Msg::Selection(crate::messages::SelectionMsg::Set(
            Selection::collapsed(4),
        )));

        let file = UploadFile::new("cat.png", "image/png", vec![1, 2, 3]);
        runtime.dispatch(Msg::Command(crate::commands::EditorCommand::UploadImage(file)));
        runtime.run_until_idle(IDLE);

        assert_eq!(
            runtime.model().markup(),
            r#"<p>a<img src="https://cdn.example/cat.png" alt="cat.png">b</p>"#
        );
        assert!(runtime.model().uploads.is_empty());
    }

    #[test]
    fn test_default_uploader_fails_without_touching_surface() {
        let mut runtime = Runtime::new(EditorModel::new(settings(0)));
        runtime.dispatch(Msg::external("<p>ab</p>"));
        let file = UploadFile::new("cat.png", "image/png", vec![1]);
        runtime.dispatch(Msg::Command(crate::commands::EditorCommand::UploadImage(file)));
        runtime.run_until_idle(IDLE);
        assert_eq!(runtime.model().markup(), "<p>ab</p>");
    }
}
