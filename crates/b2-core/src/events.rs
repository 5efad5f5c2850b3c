use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

/// System-wide event bus for manifest lifecycle notifications
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Manifest lifecycle events
pub mod events {
    use super::Event;

    /// A manifest finished uploading and the session was replaced
    #[derive(Debug, Clone)]
    pub struct ManifestLoaded {
        pub source_name: String,
        pub row_count: usize,
        pub column_count: usize,
    }

    /// The upload service rejected a manifest or could not be reached
    #[derive(Debug, Clone)]
    pub struct ManifestLoadFailed {
        pub source_name: String,
        pub error: String,
    }

    /// The option service failed at startup; choice fields run degraded
    #[derive(Debug, Clone)]
    pub struct OptionsUnavailable {
        pub error: String,
    }

    /// The save service returned the exported file
    #[derive(Debug, Clone)]
    pub struct ManifestExported {
        pub filename: String,
        pub row_count: usize,
    }

    /// The save service rejected the export or could not be reached
    #[derive(Debug, Clone)]
    pub struct ExportFailed {
        pub error: String,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        ManifestLoaded,
        ManifestLoadFailed,
        OptionsUnavailable,
        ManifestExported,
        ExportFailed
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_default().push(handler);
    }

    /// Publish an event to all handlers registered for its type
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
