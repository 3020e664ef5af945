use super::{Filter, FilterContext};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::request::FilterableRequest;
use crate::response::Response;
use crate::response_spec::ResponseSpec;
use parking_lot::Mutex;

/// Replays the last session id a response handed out.
///
/// A request that already carries the session cookie keeps its own value.
#[derive(Debug)]
pub struct SessionFilter {
    session_id_name: String,
    session_id: Mutex<Option<String>>,
}

impl SessionFilter {
    pub fn new() -> Self {
        Self::from_config(&SessionConfig::default())
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            session_id_name: config.session_id_name.clone(),
            session_id: Mutex::new(None),
        }
    }

    pub fn session_id_name(&self) -> &str {
        &self.session_id_name
    }

    /// The last session id received.
    pub fn session_id(&self) -> Option<String> {
        self.session_id.lock().clone()
    }

    pub fn has_session_id(&self) -> bool {
        self.session_id.lock().is_some()
    }
}

impl Default for SessionFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for SessionFilter {
    fn apply(
        &self,
        request: &mut FilterableRequest,
        response_spec: &ResponseSpec,
        ctx: &mut FilterContext<'_>,
    ) -> Result<Response> {
        if let Some(id) = self.session_id() {
            request.session_id(&self.session_id_name, &id);
        }

        let response = ctx.proceed(request, response_spec)?;
        if let Some(id) = response.session_id(&self.session_id_name) {
            tracing::debug!(name = %self.session_id_name, "Storing session id");
            *self.session_id.lock() = Some(id);
        }
        Ok(response)
    }

    fn name(&self) -> &str {
        "session-filter"
    }
}
