use crate::error::Result;

#[derive(Debug)]
pub enum AppEvent {
    FlowReply(Result<String>),
}
