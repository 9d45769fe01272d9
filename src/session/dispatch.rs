//! One user input, one flow call, one assistant turn.
//!
//! [`begin`] records the user turn and hands back a [`PendingDispatch`];
//! the caller runs the flow call however it likes (the window spawns it on
//! the tokio runtime) and [`resolve`] consumes the pending value to record
//! exactly one assistant turn.

use crate::error::{AssistantError, Result};
use crate::session::store::Conversation;
use crate::session::Turn;

pub const APOLOGY: &str = "I apologize, but I couldn't process your request at the moment.";

#[derive(Debug)]
#[must_use = "a pending dispatch must be resolved to answer the user turn"]
pub struct PendingDispatch {
    prompt: String,
}

impl PendingDispatch {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Answered,
    Failed { detail: String },
}

/// Records the user turn as typed. Blank input is ignored and returns `None`.
pub fn begin(conversation: &mut Conversation, input: &str) -> Option<PendingDispatch> {
    if input.trim().is_empty() {
        return None;
    }
    conversation.append(Turn::user(input));
    Some(PendingDispatch {
        prompt: input.to_string(),
    })
}

pub fn resolve(
    conversation: &mut Conversation,
    pending: PendingDispatch,
    outcome: Result<String>,
) -> Resolution {
    match outcome {
        Ok(text) => {
            conversation.append(Turn::assistant(text));
            Resolution::Answered
        }
        Err(err) => {
            if err.is_transport() {
                tracing::warn!(prompt = %pending.prompt, error = %err, "flow request failed");
            } else {
                tracing::error!(prompt = %pending.prompt, error = %err, "flow request could not be made");
            }
            conversation.append(Turn::assistant(APOLOGY));
            Resolution::Failed {
                detail: describe(&err),
            }
        }
    }
}

fn describe(err: &AssistantError) -> String {
    let mut detail = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

#[cfg(test)]
mod tests {
    use super::{begin, resolve, Resolution, APOLOGY};
    use crate::error::{AssistantError, Result};
    use crate::flow::FlowService;
    use crate::session::store::Conversation;
    use crate::session::{Role, Turn};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const LOAN_PROMPT: &str = "Give me an overview of loan growth during FY2024";

    async fn dispatch(
        conversation: &mut Conversation,
        service: &dyn FlowService,
        input: &str,
    ) -> Option<Resolution> {
        let pending = begin(conversation, input)?;
        let outcome = service.send(pending.prompt()).await;
        Some(resolve(conversation, pending, outcome))
    }

    enum Stub {
        Reply(&'static str),
        Fail,
    }

    struct StubFlow {
        behaviour: Stub,
        seen: Mutex<Vec<String>>,
    }

    impl StubFlow {
        fn new(behaviour: Stub) -> Self {
            Self {
                behaviour,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FlowService for StubFlow {
        async fn send(&self, message: &str) -> Result<String> {
            self.seen
                .lock()
                .expect("stub lock should not be poisoned")
                .push(message.to_string());
            match self.behaviour {
                Stub::Reply(text) => Ok(text.to_string()),
                Stub::Fail => Err(AssistantError::Status {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    body: "maintenance".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn transport_failure_appends_apology() {
        let flow = StubFlow::new(Stub::Fail);
        let mut conversation = Conversation::new();

        let resolution = dispatch(&mut conversation, &flow, LOAN_PROMPT)
            .await
            .expect("non-empty input should dispatch");

        assert_eq!(
            conversation.all(),
            &[Turn::user(LOAN_PROMPT), Turn::assistant(APOLOGY)]
        );
        match resolution {
            Resolution::Failed { detail } => assert!(detail.contains("503")),
            Resolution::Answered => panic!("failure should not count as answered"),
        }
    }

    #[tokio::test]
    async fn success_appends_reply_text() {
        let flow = StubFlow::new(Stub::Reply("Loan growth was 12%."));
        let mut conversation = Conversation::new();

        let resolution = dispatch(&mut conversation, &flow, LOAN_PROMPT).await;

        assert_eq!(resolution, Some(Resolution::Answered));
        assert_eq!(conversation.all()[1], Turn::assistant("Loan growth was 12%."));
        assert_eq!(
            flow.seen.lock().expect("stub lock should not be poisoned").as_slice(),
            &[LOAN_PROMPT.to_string()]
        );
    }

    #[tokio::test]
    async fn blank_input_is_a_no_op() {
        let flow = StubFlow::new(Stub::Reply("unused"));
        let mut conversation = Conversation::new();

        assert!(dispatch(&mut conversation, &flow, "   ").await.is_none());
        assert!(conversation.is_empty());
        assert!(flow.seen.lock().expect("stub lock should not be poisoned").is_empty());
    }

    #[tokio::test]
    async fn completed_dispatches_alternate_user_and_assistant() {
        let answering = StubFlow::new(Stub::Reply("ok"));
        let failing = StubFlow::new(Stub::Fail);
        let mut conversation = Conversation::new();

        let dispatches = 7;
        for index in 0..dispatches {
            let prompt = format!("question {index}");
            if index % 3 == 0 {
                dispatch(&mut conversation, &failing, &prompt).await;
            } else {
                dispatch(&mut conversation, &answering, &prompt).await;
            }
        }

        assert_eq!(conversation.len(), 2 * dispatches);
        for (position, turn) in conversation.all().iter().enumerate() {
            let expected = if position % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(turn.role(), expected, "turn {position}");
        }
    }

    #[test]
    fn begin_keeps_input_verbatim_and_resolve_answers_once() {
        let mut conversation = Conversation::new();
        let pending = begin(&mut conversation, "  asset quality?  ").expect("input should dispatch");
        assert_eq!(pending.prompt(), "  asset quality?  ");
        assert_eq!(conversation.all(), &[Turn::user("  asset quality?  ")]);

        let resolution = resolve(&mut conversation, pending, Ok("Stable.".to_string()));
        assert_eq!(resolution, Resolution::Answered);
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn failure_detail_includes_error_chain() {
        let mut conversation = Conversation::new();
        let pending = begin(&mut conversation, "hello").expect("input should dispatch");
        let resolution = resolve(
            &mut conversation,
            pending,
            Err(AssistantError::InvalidReply("expected an object, got null".to_string())),
        );
        assert_eq!(
            resolution,
            Resolution::Failed {
                detail: "flow reply is not a JSON object: expected an object, got null".to_string()
            }
        );
        assert_eq!(conversation.all()[1].content(), APOLOGY);
    }
}
