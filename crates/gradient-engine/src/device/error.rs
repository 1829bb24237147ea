/// What the frame loop should do after a failed surface acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated surface was reconfigured at the current size.
    Reconfigured,
    /// Timeout or unspecified error; this frame is dropped and must be redrawn.
    SkipFrame,
    /// Out of memory. The runtime exits.
    Fatal,
}
