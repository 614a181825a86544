//! Debounced fallback autosave
//!
//! Every committed change schedules a timer tagged with the model revision.
//! When the timer fires, the draft is persisted only if no newer change has
//! landed, so only the last edit within the window is written.

use crate::commands::Cmd;
use crate::editable::EditableSurface;
use crate::messages::AutosaveMsg;
use crate::model::EditorModel;

/// Schedule a debounced autosave for the current revision
pub fn schedule_autosave<S: EditableSurface>(model: &EditorModel<S>) -> Option<Cmd> {
    let settings = &model.settings;
    if !settings.features.autosave || settings.autosave_interval_ms == 0 {
        return None;
    }
    Some(Cmd::DebouncedAutosave {
        revision: model.revision,
        delay_ms: settings.autosave_interval_ms,
    })
}

/// Handle autosave messages
pub fn update_autosave<S: EditableSurface>(
    model: &mut EditorModel<S>,
    msg: AutosaveMsg,
) -> Option<Cmd> {
    match msg {
        AutosaveMsg::Ready { revision } => {
            if revision != model.revision {
                tracing::trace!(
                    "Skipping stale autosave: revision {} != current {}",
                    revision,
                    model.revision
                );
                return None;
            }
            model
                .log
                .debug(&format!("autosave window elapsed at revision {}", revision));
            Some(Cmd::PersistFallback {
                markup: model.surface.markup().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorSettings;

    #[test]
    fn test_stale_revision_is_skipped() {
        let mut model = EditorModel::new(EditorSettings::default());
        model.revision = 3;
        assert_eq!(
            update_autosave(&mut model, AutosaveMsg::Ready { revision: 2 }),
            None
        );
        assert_eq!(
            update_autosave(&mut model, AutosaveMsg::Ready { revision: 3 }),
            Some(Cmd::PersistFallback {
                markup: String::new()
            })
        );
    }

    #[test]
    fn test_disabled_autosave_schedules_nothing() {
        let mut settings = EditorSettings::default();
        settings.autosave_interval_ms = 0;
        assert!(schedule_autosave(&EditorModel::new(settings.clone())).is_none());

        settings.autosave_interval_ms = 500;
        settings.features.autosave = false;
        assert!(schedule_autosave(&EditorModel::new(settings)).is_none());
    }

    #[test]
    fn test_schedule_uses_interval() {
        let model = EditorModel::new(EditorSettings::default());
        assert_eq!(
            schedule_autosave(&model),
            Some(Cmd::DebouncedAutosave {
                revision: 0,
                delay_ms: 1000
            })
        );
    }
}
