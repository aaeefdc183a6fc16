use std::fmt;

/// The error taxonomy the core distinguishes (§7), independent of which
/// transport or component raised it. Stored verbatim (via its [`Display`])
/// as the value in the index's `fail` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Timeout, connection reset, HTTP 5xx, unresolved anti-bot challenge.
    TransientNetwork,
    /// HTTP 4xx, DNS failure, SSL failure.
    PermanentRemote,
    /// Zero-byte file, wrong MIME, gzip decode failure, no PDF in archive.
    PayloadInvalid,
    /// A per-worker timeout fired before the transport returned.
    Timeout,
    /// No transport was attempted (e.g. unsupported URL scheme).
    NoUsableUrl,
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::TransientNetwork => ErrorCategory::TransientNetwork,
            ErrorCode::PermanentRemote => ErrorCategory::PermanentRemote,
            ErrorCode::PayloadInvalid => ErrorCategory::PayloadInvalid,
            ErrorCode::Timeout => ErrorCategory::TransientNetwork,
            ErrorCode::NoUsableUrl => ErrorCategory::PermanentRemote,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TransientNetwork => "transient_network",
            ErrorCode::PermanentRemote => "permanent_remote",
            ErrorCode::PayloadInvalid => "payload_invalid",
            ErrorCode::Timeout => "timeout",
            ErrorCode::NoUsableUrl => "no_usable_url",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five broad categories named in §7, used only for reporting; the
/// core's recovery behavior treats transient and permanent remote errors
/// identically (all transports are attempted regardless of category).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    TransientNetwork,
    PermanentRemote,
    PayloadInvalid,
    IndexStorage,
    Config,
}
