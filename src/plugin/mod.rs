//! Host-facing plugin surface: lifecycle, the reply decoration hook, and the
//! speech gate that implements it.

pub mod gate;
pub mod speech_gate;

pub use gate::{LengthBounds, LengthCheck, ProbabilityGate};
pub use speech_gate::{DecorateOutcome, SpeechGate};

use async_trait::async_trait;

use crate::types::MessageResult;

/// Descriptive metadata a host shows for a registered plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMetadata {
    pub name: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    pub version: &'static str,
}

/// Lifecycle hooks called by the host around registration.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn metadata(&self) -> PluginMetadata;

    /// Called once after construction.
    async fn initialize(&self) {}

    /// Called when the plugin is disabled or unloaded.
    async fn terminate(&self) {}
}

/// Handle on one outgoing reply, owned by the host.
pub trait ReplyEvent: Send {
    /// The reply's current result, or `None` if the host has dropped it.
    fn result_mut(&mut self) -> Option<&mut MessageResult>;
}

/// The host's "decorate outgoing result" extension point.
///
/// Fires once per reply before delivery. Implementations must not fail: the
/// host delivers the reply afterwards whatever happened inside.
#[async_trait]
pub trait ResultDecorator: Send + Sync {
    async fn on_decorating_result(&self, event: &mut dyn ReplyEvent);
}

/// Plain reply event for hosts (and the CLI) that hold the result by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutgoingReply {
    pub result: Option<MessageResult>,
}

impl OutgoingReply {
    pub fn new(result: MessageResult) -> Self {
        Self {
            result: Some(result),
        }
    }
}

impl ReplyEvent for OutgoingReply {
    fn result_mut(&mut self) -> Option<&mut MessageResult> {
        self.result.as_mut()
    }
}
