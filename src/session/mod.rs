//! Rendering sessions: plan once, then render frames or ranges into a sink.

pub(crate) mod render_session;
