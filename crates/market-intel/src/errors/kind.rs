/// Classification of a failed upstream call.
///
/// Every failure is handled the same way at the client boundary (the caller
/// degrades to a placeholder, an omitted section or a neutral default), so
/// the kind only feeds diagnostics and tests.
///
/// | Kind | Typical cause |
/// |------|---------------|
/// | `Transport` | connection refused, DNS failure, timeout |
/// | `UpstreamStatus` | HTTP 4xx / 5xx |
/// | `MalformedPayload` | body is not the expected JSON / feed shape |
/// | `MissingCredential` | provider key not configured |
/// | `NoData` | valid but empty answer |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FailureKind {
    Transport,
    UpstreamStatus,
    MalformedPayload,
    MissingCredential,
    NoData,
}

impl FailureKind {
    /// Short label used in diagnostics strings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::UpstreamStatus => "upstream-status",
            Self::MalformedPayload => "malformed-payload",
            Self::MissingCredential => "missing-credential",
            Self::NoData => "no-data",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
