mod link_state;
mod probe;

pub use link_state::SharedLinkState;
pub use probe::HttpLivenessProbe;
