/// Zone Culling - Singleton manager for culling systems
///
/// This module provides global management for named culling systems (one per
/// scene or zone) and for the logger. It uses thread-safe static storage with
/// RwLock for safe concurrent access.

use std::sync::{OnceLock, RwLock, Arc, Mutex, TryLockError};
use std::time::SystemTime;
use rustc_hash::FxHashMap;
use crate::culling::{CullingConfig, CullingSystem};
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Culling systems by name (wrapped in Mutex for thread-safe mutable access)
    culling_systems: RwLock<FxHashMap<String, Arc<Mutex<CullingSystem>>>>,
    /// Destroyed while locked (e.g. from an element callback), disposed once released
    pending_disposal: Mutex<Vec<Arc<Mutex<CullingSystem>>>>,
}

impl EngineState {
    /// Create a new empty engine state
    fn new() -> Self {
        Self {
            culling_systems: RwLock::new(FxHashMap::default()),
            pending_disposal: Mutex::new(Vec::new()),
        }
    }
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// Owns the named culling systems and the logger.
///
/// # Example
///
/// ```no_run
/// use zone_culling::zonecull::Engine;
/// use zone_culling::zonecull::culling::CullingConfig;
///
/// Engine::initialize()?;
/// let system = Engine::create_culling_system("overworld", CullingConfig::default())?;
///
/// // Once per frame
/// Engine::tick_all()?;
///
/// Engine::shutdown();
/// # Ok::<(), zone_culling::zonecull::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("zonecull::Engine", "Initialization failed: {}", msg);
            }
            Error::NotFound(msg) => {
                crate::engine_error!("zonecull::Engine", "Not found: {}", msg);
            }
            _ => {
                crate::engine_error!("zonecull::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))
    }

    fn poisoned() -> Error {
        Self::log_and_return_error(Error::LockPoisoned("Culling system map".to_string()))
    }

    /// Dispose the systems whose destruction was deferred
    fn dispose_pending(state: &EngineState) {
        let pending = match state.pending_disposal.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => return,
        };
        for system in pending {
            if let Ok(mut system) = system.lock() {
                system.dispose();
            }
        }
    }

    /// Initialize the engine
    ///
    /// This must be called once at application startup before creating any culling system.
    ///
    /// # Errors
    ///
    /// Currently always succeeds, but returns Result for future extensibility.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Shutdown the engine: dispose and drop every culling system
    ///
    /// Existing references to culling systems stay valid but disposed.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut systems) = state.culling_systems.write() {
                for (_, system) in systems.drain() {
                    if let Ok(mut system) = system.lock() {
                        system.dispose();
                    }
                }
            }
            Self::dispose_pending(state);
        }
    }

    // ===== CULLING SYSTEM API =====

    /// Create and register a named culling system
    ///
    /// The system starts inactive: call `activate` with an oracle on the
    /// returned handle.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - A culling system with this name already exists
    /// - The configuration is invalid
    pub fn create_culling_system(name: &str, config: CullingConfig) -> Result<Arc<Mutex<CullingSystem>>> {
        let state = Self::state()?;

        let mut systems = state.culling_systems.write()
            .map_err(|_| Self::poisoned())?;

        if systems.contains_key(name) {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed(format!("Culling system '{}' already exists", name))
            ));
        }

        let system = Arc::new(Mutex::new(CullingSystem::new(config)?));
        systems.insert(name.to_string(), Arc::clone(&system));

        crate::engine_info!("zonecull::Engine", "Culling system '{}' created", name);

        Ok(system)
    }

    /// Get a culling system by name
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized or no system has this name.
    pub fn culling_system(name: &str) -> Result<Arc<Mutex<CullingSystem>>> {
        let state = Self::state()?;

        let systems = state.culling_systems.read()
            .map_err(|_| Self::poisoned())?;

        systems.get(name).cloned()
            .ok_or_else(|| Self::log_and_return_error(
                Error::NotFound(format!("Culling system '{}'", name))
            ))
    }

    /// Dispose and remove a culling system
    ///
    /// The name is released immediately. If the system is locked, for
    /// example because an element callback destroys the system being
    /// ticked, disposal is deferred until `tick_all` releases it.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized or no system has this name.
    pub fn destroy_culling_system(name: &str) -> Result<()> {
        let state = Self::state()?;

        let removed = state.culling_systems.write()
            .map_err(|_| Self::poisoned())?
            .remove(name);

        let system = removed.ok_or_else(|| Self::log_and_return_error(
            Error::NotFound(format!("Culling system '{}'", name))
        ))?;

        match system.try_lock() {
            Ok(mut guard) => guard.dispose(),
            Err(TryLockError::WouldBlock) => {
                crate::engine_debug!("zonecull::Engine", "Culling system '{}' is locked, disposal deferred", name);
                state.pending_disposal.lock()
                    .map_err(|_| Self::log_and_return_error(Error::LockPoisoned("Pending disposal list".to_string())))?
                    .push(Arc::clone(&system));
            }
            Err(TryLockError::Poisoned(_)) => {}
        }

        crate::engine_info!("zonecull::Engine", "Culling system '{}' destroyed", name);

        Ok(())
    }

    /// Number of registered culling systems (0 if not initialized)
    pub fn culling_system_count() -> usize {
        ENGINE_STATE.get()
            .and_then(|state| state.culling_systems.read().ok().map(|systems| systems.len()))
            .unwrap_or(0)
    }

    /// Names of the registered culling systems, sorted
    pub fn culling_system_names() -> Vec<String> {
        let mut names: Vec<String> = ENGINE_STATE.get()
            .and_then(|state| state.culling_systems.read().ok()
                .map(|systems| systems.keys().cloned().collect()))
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Tick every culling system once, in name order
    ///
    /// Every system is ticked even if one fails; the first error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized, or the first
    /// error raised by a culling system.
    pub fn tick_all() -> Result<()> {
        let state = Self::state()?;

        // Snapshot, so element callbacks may create or destroy systems.
        // Destroying the system being ticked defers its disposal.
        let mut systems: Vec<(String, Arc<Mutex<CullingSystem>>)> = state.culling_systems.read()
            .map_err(|_| Self::poisoned())?
            .iter()
            .map(|(name, system)| (name.clone(), Arc::clone(system)))
            .collect();
        systems.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut first_error = None;
        for (name, system) in systems {
            let result = match system.lock() {
                Ok(mut system) => system.tick(),
                Err(_) => Err(Error::LockPoisoned(format!("Culling system '{}'", name))),
            };
            if let Err(error) = result {
                crate::engine_error!("zonecull::Engine", "Tick of culling system '{}' failed: {}", name, error);
                first_error.get_or_insert(error);
            }
            Self::dispose_pending(state);
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut systems) = state.culling_systems.write() {
                systems.clear();
            }
            if let Ok(mut pending) = state.pending_disposal.lock() {
                pending.clear();
            }
        }
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (file logger, network logger, etc.)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use zone_culling::zonecull::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error!, engine_err! and engine_fatal! to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
