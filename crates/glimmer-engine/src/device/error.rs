use wgpu::SurfaceError;

/// What the frame loop does after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was reconfigured; the next frame may succeed.
    Reconfigured,
    /// Transient; drop this frame.
    SkipFrame,
    /// Unrecoverable (out of memory); exit.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn for_error(err: &SurfaceError) -> Self {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
            SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            SurfaceError::Timeout | SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_and_outdated_reconfigure() {
        assert_eq!(SurfaceErrorAction::for_error(&SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(SurfaceErrorAction::for_error(&SurfaceError::Outdated), SurfaceErrorAction::Reconfigured);
    }

    #[test]
    fn oom_is_fatal_and_timeouts_skip() {
        assert_eq!(SurfaceErrorAction::for_error(&SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
        assert_eq!(SurfaceErrorAction::for_error(&SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(SurfaceErrorAction::for_error(&SurfaceError::Other), SurfaceErrorAction::SkipFrame);
    }
}
