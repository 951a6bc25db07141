pub mod inbound;
pub mod outbound;

pub use inbound::Gossiper;
pub use outbound::{AppSender, ProposerMonitor};
