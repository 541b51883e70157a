//! Process-scoped registry of road networks, one per source identifier.
//!
//! # Guarantees
//!
//! - At most one build runs per identifier at a time.  Callers that request
//!   an identifier while it is being built block until the build finishes and
//!   then receive the same `Arc<RoadNetwork>`, or the same error.
//! - A successful build is stored forever.  Entries are never evicted.
//! - A failed build stores nothing.  The next request retries from scratch,
//!   and an identifier that only ever fails leaves no entry behind.
//! - Builds of different identifiers never wait on each other.  The registry
//!   lock is only held to find or create an identifier's slot.
//!
//! Identifiers are compared as raw strings.  `"a.txt"` and `"./a.txt"` are
//! two entries even when a source resolves them to the same file.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{
    Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::{debug, info, trace, warn};

use rn_network::{RoadNetwork, RoadNetworkBuilder};

use crate::config::LoaderConfig;
use crate::parser::load_map_reader;
use crate::source::{DirectorySource, MapSource};
use crate::LoadResult;

// ── Slot ──────────────────────────────────────────────────────────────────────

/// Build state of one identifier.
#[derive(Default)]
struct Slot {
    state: Mutex<SlotState>,
    done:  Condvar,
}

#[derive(Default)]
struct SlotState {
    phase: Phase,
    /// Bumped every time a build finishes, successfully or not.
    generation: u64,
    /// Outcome of the most recent failed build, handed to its waiters.
    last_error: Option<crate::LoadError>,
}

#[derive(Default)]
enum Phase {
    #[default]
    Vacant,
    Building,
    Ready(Arc<RoadNetwork>),
}

/// Resets a slot to `Vacant` if the build unwinds before reporting.
struct BuildGuard<'a> {
    slot:  &'a Slot,
    armed: bool,
}

impl BuildGuard<'_> {
    fn finish(mut self, outcome: LoadResult<RoadNetwork>) -> LoadResult<Arc<RoadNetwork>> {
        self.armed = false;
        let mut state = lock(&self.slot.state);
        state.generation += 1;
        let result = match outcome {
            Ok(network) => {
                let network = Arc::new(network);
                state.phase = Phase::Ready(Arc::clone(&network));
                state.last_error = None;
                Ok(network)
            }
            Err(err) => {
                state.phase = Phase::Vacant;
                state.last_error = Some(err.clone());
                Err(err)
            }
        };
        self.slot.done.notify_all();
        result
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = lock(&self.slot.state);
            state.phase = Phase::Vacant;
            state.generation += 1;
            state.last_error = None;
            self.slot.done.notify_all();
        }
    }
}

// ── RoadNetworkCache ──────────────────────────────────────────────────────────

/// Maps source identifiers to lazily built, then immutable, road networks.
///
/// Construct one per process and pass it by reference (or `Arc`) to every
/// consumer.
pub struct RoadNetworkCache<S = DirectorySource> {
    source: S,
    slots:  RwLock<FxHashMap<String, Arc<Slot>>>,
    builds: AtomicUsize,
}

impl RoadNetworkCache<DirectorySource> {
    /// Cache over the map files in `config.maps_dir`.
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(DirectorySource::new(&config.maps_dir))
    }
}

impl<S: MapSource> RoadNetworkCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slots: RwLock::new(FxHashMap::default()),
            builds: AtomicUsize::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Identifiers the source can currently serve.
    pub fn available(&self) -> LoadResult<Vec<String>> {
        self.source.list()
    }

    /// Shorthand for [`get_or_build`](Self::get_or_build) without a seed.
    pub fn load(&self, identifier: &str) -> LoadResult<Arc<RoadNetwork>> {
        self.get_or_build(identifier, None)
    }

    /// Return the network for `identifier`, building it on first request.
    ///
    /// `seed` is only used when this call performs the build: the
    /// description is parsed into it instead of an empty builder.  When the
    /// identifier is already cached the seed is dropped unused.
    pub fn get_or_build(
        &self,
        identifier: &str,
        seed: Option<RoadNetworkBuilder>,
    ) -> LoadResult<Arc<RoadNetwork>> {
        let slot = self.slot(identifier);
        let mut state = lock(&slot.state);

        loop {
            if let Phase::Ready(network) = &state.phase {
                trace!(identifier, "road network cache hit");
                return Ok(Arc::clone(network));
            }
            if !matches!(state.phase, Phase::Building) {
                break;
            }

            debug!(identifier, "waiting for road network build in progress");
            let generation = state.generation;
            while matches!(state.phase, Phase::Building) {
                state = slot.done.wait(state).unwrap_or_else(PoisonError::into_inner);
            }
            // The build we waited on failed: report its error rather than
            // starting another one.  A build that unwound leaves no error and
            // the loop falls through to rebuilding.
            if state.generation != generation && matches!(state.phase, Phase::Vacant) {
                if let Some(err) = state.last_error.clone() {
                    drop(state);
                    self.release_failed(identifier, slot);
                    return Err(err);
                }
            }
        }

        state.phase = Phase::Building;
        drop(state);

        let guard = BuildGuard { slot: &slot, armed: true };
        let outcome = self.build(identifier, seed);
        if let Err(err) = &outcome {
            warn!(identifier, error = %err, "road network build failed");
        }
        let result = guard.finish(outcome);
        if result.is_err() {
            self.release_failed(identifier, slot);
        }
        result
    }

    fn build(&self, identifier: &str, seed: Option<RoadNetworkBuilder>) -> LoadResult<RoadNetwork> {
        self.builds.fetch_add(1, Ordering::Relaxed);
        let started = Instant::now();
        debug!(identifier, seeded = seed.is_some(), "building road network");

        let reader = self.source.open(identifier)?;
        let network = load_map_reader(reader, seed)?;

        info!(
            identifier,
            name = network.name(),
            nodes = network.node_count(),
            roads = network.road_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "road network cached"
        );
        Ok(network)
    }

    fn slot(&self, identifier: &str) -> Arc<Slot> {
        if let Some(slot) = read(&self.slots).get(identifier) {
            return Arc::clone(slot);
        }
        let mut slots = write(&self.slots);
        Arc::clone(slots.entry(identifier.to_owned()).or_default())
    }

    /// Give up a caller's handle on a slot whose build failed.  The last
    /// holder removes the slot, and its stored error, from the registry.
    ///
    /// The handle is dropped under the registry lock so that exactly one of
    /// several concurrent holders sees itself as the last.
    fn release_failed(&self, identifier: &str, slot: Arc<Slot>) {
        let mut slots = write(&self.slots);
        // One reference in the registry, one in `slot`.
        let last = Arc::strong_count(&slot) == 2
            && slots.get(identifier).is_some_and(|s| Arc::ptr_eq(s, &slot))
            && matches!(lock(&slot.state).phase, Phase::Vacant);
        drop(slot);
        if last {
            slots.remove(identifier);
            trace!(identifier, "released slot of failed identifier");
        }
    }

    /// Number of identifiers with a registry slot, cached or not.
    pub(crate) fn slot_count(&self) -> usize {
        read(&self.slots).len()
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// The cached network for `identifier`, without building.
    pub fn cached(&self, identifier: &str) -> Option<Arc<RoadNetwork>> {
        let slot = read(&self.slots).get(identifier).cloned()?;
        let state = lock(&slot.state);
        match &state.phase {
            Phase::Ready(network) => Some(Arc::clone(network)),
            _ => None,
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.cached(identifier).is_some()
    }

    /// Identifiers with a cached network, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let slots: Vec<(String, Arc<Slot>)> = read(&self.slots)
            .iter()
            .map(|(id, slot)| (id.clone(), Arc::clone(slot)))
            .collect();
        let mut ready: Vec<String> = slots
            .into_iter()
            .filter(|(_, slot)| matches!(lock(&slot.state).phase, Phase::Ready(_)))
            .map(|(id, _)| id)
            .collect();
        ready.sort();
        ready
    }

    /// Number of cached networks.
    pub fn len(&self) -> usize {
        self.identifiers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of builds started over the cache's lifetime, failed ones
    /// included.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

// ── Lock helpers ──────────────────────────────────────────────────────────────

// A panicking build is handled by `BuildGuard`; the data behind a poisoned
// lock is still consistent.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(l: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    l.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(l: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    l.write().unwrap_or_else(PoisonError::into_inner)
}
