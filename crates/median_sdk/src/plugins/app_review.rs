//! In-app review prompt.

use median_bridge::{BridgeResult, CommandDispatcher, TypedReply};

use super::{command, request, CallbackData, NO_PARAMS};

/// Platform review dialog.
pub const PROMPT: &str = "median://appReview/prompt";

/// `median://appReview/*` commands.
#[derive(Debug, Clone, Copy)]
pub struct AppReview<'a> {
    dispatcher: &'a CommandDispatcher,
}

impl<'a> AppReview<'a> {
    pub(crate) fn new(dispatcher: &'a CommandDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Asks the platform to show its review dialog; the platform may decline silently.
    pub fn prompt(&self) -> BridgeResult<()> {
        command(self.dispatcher, PROMPT, NO_PARAMS)
    }

    /// Like [`AppReview::prompt`], but waits for the outcome (reported on Android only).
    pub fn prompt_with_reply(&self) -> TypedReply<CallbackData> {
        request(self.dispatcher, PROMPT, NO_PARAMS)
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::plugins::test_support::{answer, host_and_context};

    #[test]
    fn prompt_is_fire_and_forget() {
        let (host, ctx) = host_and_context();
        AppReview::new(ctx.dispatcher()).prompt().expect("prompt");

        let envelope = host.last_sent().expect("sent");
        assert_eq!(envelope.channel.as_str(), PROMPT);
        assert_eq!(envelope.params, None);
        assert!(ctx.registry().is_empty());
    }

    #[test]
    fn prompt_with_reply_reports_outcome() {
        let (host, ctx) = host_and_context();
        let reply = AppReview::new(ctx.dispatcher()).prompt_with_reply();
        answer(&host, json!({ "success": false, "error": "quota exceeded" }));

        let outcome = block_on(reply).expect("reply");
        assert!(!outcome.is_success());
        assert_eq!(outcome.error.as_deref(), Some("quota exceeded"));
    }
}
