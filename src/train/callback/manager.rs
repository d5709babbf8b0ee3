//! Callback manager for dispatching events to multiple callbacks

use tracing::debug;

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

/// Manages multiple callbacks and dispatches events
///
/// Dispatch stops at the first callback that asks to stop.
#[derive(Default)]
pub struct CallbackManager {
    callbacks: Vec<Box<dyn TrainerCallback>>,
}

impl CallbackManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback
    pub fn add<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Fire train begin event
    pub fn on_train_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.dispatch(ctx, "on_train_begin", |cb, ctx| cb.on_train_begin(ctx))
    }

    /// Fire train end event
    pub fn on_train_end(&mut self, ctx: &CallbackContext) {
        for cb in &mut self.callbacks {
            cb.on_train_end(ctx);
        }
    }

    /// Fire step end event
    pub fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.dispatch(ctx, "on_step_end", |cb, ctx| cb.on_step_end(ctx))
    }

    /// Fire evaluation event
    pub fn on_evaluate(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.dispatch(ctx, "on_evaluate", |cb, ctx| cb.on_evaluate(ctx))
    }

    fn dispatch<F>(&mut self, ctx: &CallbackContext, event: &'static str, mut fire: F) -> CallbackAction
    where
        F: FnMut(&mut dyn TrainerCallback, &CallbackContext) -> CallbackAction,
    {
        for cb in &mut self.callbacks {
            if fire(cb.as_mut(), ctx) == CallbackAction::Stop {
                debug!(callback = cb.name(), event, step = ctx.step, "callback requested stop");
                return CallbackAction::Stop;
            }
        }
        CallbackAction::Continue
    }
}
