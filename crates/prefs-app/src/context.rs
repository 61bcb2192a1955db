use uuid::Uuid;

/// Per-request identity carried through the service layer and into logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: String,
    route: String,
}

impl RequestContext {
    /// Uses the caller-supplied request id when present, otherwise generates one.
    pub fn new(request_id: Option<String>, route: impl Into<String>) -> Self {
        let request_id = request_id
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            request_id,
            route: route.into(),
        }
    }

    pub fn request_id(&self) -> &str {
        self.request_id.as_str()
    }

    pub fn route(&self) -> &str {
        self.route.as_str()
    }
}
