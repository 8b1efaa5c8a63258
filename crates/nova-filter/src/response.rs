//! Classification results and the substitute response handed back for
//! blocked requests.

/// MIME type of every substitute response
pub const SUBSTITUTE_MIME_TYPE: &str = "text/plain";

/// Character encoding of every substitute response
pub const SUBSTITUTE_ENCODING: &str = "UTF-8";

/// Empty response served in place of a blocked request.
///
/// The engine never performs or cancels the network fetch; the host
/// serves this instead of fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstituteResponse {
    pub mime_type: &'static str,
    pub encoding: &'static str,
    data: &'static [u8],
}

impl SubstituteResponse {
    pub const fn empty() -> Self {
        Self {
            mime_type: SUBSTITUTE_MIME_TYPE,
            encoding: SUBSTITUTE_ENCODING,
            data: &[],
        }
    }

    /// Response body bytes (always empty)
    pub fn data(&self) -> &'static [u8] {
        self.data
    }

    /// Response body as a stream, for hosts that expect a reader
    pub fn body(&self) -> std::io::Empty {
        std::io::empty()
    }

    /// `Content-Type` header value
    pub fn content_type(&self) -> String {
        format!("{}; charset={}", self.mime_type, self.encoding)
    }
}

impl Default for SubstituteResponse {
    fn default() -> Self {
        Self::empty()
    }
}

/// Outcome of classifying one request target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Serve the substitute instead of fetching
    Blocked(SubstituteResponse),
    /// Proceed with default request handling
    Allowed,
}

impl Classification {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// The response to serve, if any
    pub fn into_substitute(self) -> Option<SubstituteResponse> {
        match self {
            Self::Blocked(response) => Some(response),
            Self::Allowed => None,
        }
    }
}
