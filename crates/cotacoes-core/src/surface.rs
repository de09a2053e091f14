//! Generational "latest accepted response" slot.
//!
//! Every query surface (quote list, sectors, types, detail) owns one
//! [`Surface`]. A load calls [`Surface::begin`] before suspending and
//! [`Surface::commit`] when its response arrives; the commit is applied only
//! if no newer load began in between. Readers take [`Surface::snapshot`],
//! which is cloned under the lock and therefore never partially updated.

use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use crate::api::ApiError;

/// Query surface owning a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    QuoteList,
    Sectors,
    Types,
    Detail,
}

impl SurfaceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QuoteList => "quote_list",
            Self::Sectors => "sectors",
            Self::Types => "types",
            Self::Detail => "detail",
        }
    }

    const fn subject(self) -> &'static str {
        match self {
            Self::QuoteList => "quote list",
            Self::Sectors => "sectors",
            Self::Types => "types",
            Self::Detail => "detail",
        }
    }
}

impl Display for SurfaceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-visible failure of one surface load.
///
/// Transport, status and shape failures all collapse into this one state;
/// the classified cause is kept for logs and exit codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    surface: SurfaceKind,
    cause: ApiError,
}

impl LoadError {
    pub fn new(surface: SurfaceKind, cause: ApiError) -> Self {
        Self { surface, cause }
    }

    pub const fn surface(&self) -> SurfaceKind {
        self.surface
    }

    pub fn cause(&self) -> &ApiError {
        &self.cause
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to load {}", self.surface.subject())
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Result of one load as seen by its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// The response was the latest one and now backs the surface.
    Applied(T),
    /// The latest load failed; previously accepted data is still visible.
    Failed(LoadError),
    /// A newer load began first. Nothing was changed.
    Superseded,
}

impl<T> LoadOutcome<T> {
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub const fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Failed(_) | Self::Superseded => None,
        }
    }
}

/// Point-in-time view of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSnapshot<T> {
    pub generation: u64,
    /// Last accepted payload; survives later failures.
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<LoadError>,
}

#[derive(Debug)]
struct SurfaceState<T> {
    generation: u64,
    data: Option<T>,
    loading: bool,
    error: Option<LoadError>,
}

/// Single-writer slot guarded by a request generation counter.
#[derive(Debug)]
pub struct Surface<T> {
    kind: SurfaceKind,
    state: Mutex<SurfaceState<T>>,
}

impl<T: Clone> Surface<T> {
    pub fn new(kind: SurfaceKind) -> Self {
        Self {
            kind,
            state: Mutex::new(SurfaceState {
                generation: 0,
                data: None,
                loading: false,
                error: None,
            }),
        }
    }

    pub const fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// Start a load and return its generation. Any load begun earlier is
    /// superseded from this point on.
    pub fn begin(&self) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.loading = true;
        state.error = None;
        state.generation
    }

    /// Whether `generation` is still the latest load.
    pub fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    /// Apply the response of load `generation` if it is still the latest.
    ///
    /// A failure keeps the previously accepted data.
    pub fn commit(&self, generation: u64, result: Result<T, ApiError>) -> LoadOutcome<T> {
        let mut state = self.lock();
        if state.generation != generation {
            debug!(
                "{} generation {generation} superseded by {}, response discarded",
                self.kind, state.generation
            );
            return LoadOutcome::Superseded;
        }

        state.loading = false;
        match result {
            Ok(value) => {
                state.data = Some(value.clone());
                state.error = None;
                LoadOutcome::Applied(value)
            }
            Err(cause) => {
                warn!("{} generation {generation} failed: {cause}", self.kind);
                let error = LoadError::new(self.kind, cause);
                state.error = Some(error.clone());
                LoadOutcome::Failed(error)
            }
        }
    }

    pub fn snapshot(&self) -> SurfaceSnapshot<T> {
        let state = self.lock();
        SurfaceSnapshot {
            generation: state.generation,
            data: state.data.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Last accepted payload, if any.
    pub fn data(&self) -> Option<T> {
        self.lock().data.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_generation_wins_over_late_response() {
        let surface = Surface::new(SurfaceKind::QuoteList);
        let older = surface.begin();
        let newer = surface.begin();

        assert!(surface.commit(newer, Ok(2)).is_applied());
        assert!(surface.commit(older, Ok(1)).is_superseded());

        let snapshot = surface.snapshot();
        assert_eq!(snapshot.data, Some(2));
        assert!(!snapshot.loading);
        assert_eq!(snapshot.error, None);
    }

    #[test]
    fn failure_keeps_previous_data() {
        let surface = Surface::new(SurfaceKind::Detail);
        let first = surface.begin();
        surface.commit(first, Ok("petr4"));

        let second = surface.begin();
        let outcome = surface.commit(second, Err(ApiError::transport("connection refused")));

        let LoadOutcome::Failed(error) = outcome else {
            panic!("expected failure outcome");
        };
        assert_eq!(error.to_string(), "failed to load detail");
        let snapshot = surface.snapshot();
        assert_eq!(snapshot.data, Some("petr4"));
        assert_eq!(snapshot.error, Some(error));
    }

    #[test]
    fn stale_failure_does_not_touch_flags() {
        let surface: Surface<u8> = Surface::new(SurfaceKind::Types);
        let older = surface.begin();
        let _newer = surface.begin();

        surface.commit(older, Err(ApiError::malformed("bad shape")));

        let snapshot = surface.snapshot();
        assert!(snapshot.loading, "newer load is still in flight");
        assert_eq!(snapshot.error, None);
        assert!(!surface.is_current(older));
    }
}
