use crate::metadata::truncate_chars;
use crate::view_model::STATUS_TITLE_CHARS;
use crate::{Effect, ImportSession, Msg, Phase, ResolveStrategy, StatusMessage, WriteRequest};

/// Pure update function: applies a message to the session and returns the effects to run.
///
/// Messages that do not match the current phase (for example a late write
/// result for another index) are ignored.
pub fn update(mut state: ImportSession, msg: Msg) -> (ImportSession, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => {
            if state.phase() != Phase::Idle {
                return (state, Vec::new());
            }
            if state.targets().is_empty() {
                finish(&mut state)
            } else {
                begin_target(&mut state, 0)
            }
        }
        Msg::Resolved { index, metadata } => {
            if state.phase() != (Phase::Resolving { index }) {
                return (state, Vec::new());
            }
            let Some(url) = state.target(index).map(ToOwned::to_owned) else {
                return (state, Vec::new());
            };
            let total = state.targets().len();
            state.set_status(StatusMessage::Writing {
                position: index + 1,
                total,
                title: truncate_chars(metadata.display_title(&url), STATUS_TITLE_CHARS),
            });
            state.set_phase(Phase::Writing { index });

            let cover_image = if state.import_cover() {
                metadata.cover.clone()
            } else {
                None
            };
            vec![Effect::Write {
                index,
                request: WriteRequest {
                    url,
                    metadata,
                    caption: state.caption().map(ToOwned::to_owned),
                    cover_image,
                },
            }]
        }
        Msg::WriteSucceeded { index } => {
            if state.phase() != (Phase::Writing { index }) {
                return (state, Vec::new());
            }
            state.record_success();
            advance(&mut state, index)
        }
        Msg::WriteFailed { index, .. } => {
            if state.phase() != (Phase::Writing { index }) {
                return (state, Vec::new());
            }
            let Some(url) = state.target(index).map(ToOwned::to_owned) else {
                return (state, Vec::new());
            };
            state.record_failure(url);
            let total = state.targets().len();
            state.set_status(StatusMessage::WriteFailedKept {
                position: index + 1,
                total,
            });
            advance(&mut state, index)
        }
        Msg::PauseElapsed => match state.phase() {
            Phase::Advancing { .. } => {
                let next = state.advance_cursor();
                if next < state.targets().len() {
                    begin_target(&mut state, next)
                } else {
                    finish(&mut state)
                }
            }
            _ => Vec::new(),
        },
    };

    (state, effects)
}

fn begin_target(state: &mut ImportSession, index: usize) -> Vec<Effect> {
    let Some(url) = state.target(index).map(ToOwned::to_owned) else {
        return finish(state);
    };
    let strategy = state.strategy_for(&url);
    let position = index + 1;
    let total = state.targets().len();
    state.set_status(match strategy {
        ResolveStrategy::InPage { .. } => StatusMessage::ReadingScreen { position, total },
        ResolveStrategy::Remote => StatusMessage::Analysing { position, total },
    });
    state.set_phase(Phase::Resolving { index });
    vec![Effect::Resolve {
        index,
        url,
        strategy,
    }]
}

// Every Writing -> Advancing edge re-publishes the remaining list, whatever the outcome.
fn advance(state: &mut ImportSession, index: usize) -> Vec<Effect> {
    state.set_phase(Phase::Advancing { index });
    vec![
        Effect::UpdateRemaining {
            text: state.remaining_text(),
            persist: state.persist_pending(),
        },
        Effect::Pause,
    ]
}

fn finish(state: &mut ImportSession) -> Vec<Effect> {
    state.set_phase(Phase::Finished);
    state.set_status(StatusMessage::Done {
        imported: state.success_count(),
    });
    let mut effects = Vec::with_capacity(2);
    if state.failed_targets().is_empty() {
        effects.push(Effect::ClearPending);
    }
    effects.push(Effect::Finished {
        summary: state.summary(),
    });
    effects
}
