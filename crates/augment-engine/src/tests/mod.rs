//! Shared test doubles and crate-level BDD tests.

use std::io;
use std::sync::{Arc, Mutex};

use augment_config::{EngineSettings, LogFormat};
use mockall::mock;
use serde_json::Value;

use crate::augmentor::{Augmentor, AugmentorHandle};
use crate::context::{QueryContext, QueryMode, UpdateContext};
use crate::engine::AugmentationEngine;
use crate::error::AugmentorFailure;
use crate::metadata::{EntityMetadata, MethodMetadata};
use crate::telemetry::engine_subscriber;


// ---------------------------------------------------------------------------
// Contexts
// ---------------------------------------------------------------------------

/// Query context recording which augmentors touched it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct FindContext {
    pub(crate) tags: Vec<String>,
}

impl QueryContext for FindContext {
    fn mode(&self) -> QueryMode {
        QueryMode::Find
    }
}

/// Query context no augmentor declares.
#[derive(Debug, Default)]
pub(crate) struct CountContext;

impl QueryContext for CountContext {
    fn mode(&self) -> QueryMode {
        QueryMode::Count
    }
}

/// Update context recording which augmentors touched it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct SaveContext {
    pub(crate) tags: Vec<String>,
}

impl UpdateContext for SaveContext {
    fn mode(&self) -> QueryMode {
        QueryMode::Save
    }
}

/// Context usable on both paths.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EchoContext {
    pub(crate) hops: usize,
}

impl QueryContext for EchoContext {
    fn mode(&self) -> QueryMode {
        QueryMode::Find
    }
}

impl UpdateContext for EchoContext {
    fn mode(&self) -> QueryMode {
        QueryMode::Save
    }
}

// ---------------------------------------------------------------------------
// Augmentors
// ---------------------------------------------------------------------------

/// Call log shared between augmentors under test.
pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().expect("journal lock").clone()
}

fn record(journal: &Journal, entry: String) {
    journal.lock().expect("journal lock").push(entry);
}

pub(crate) fn method() -> MethodMetadata {
    MethodMetadata::new("OrderRepository", "find_all").with_annotation("Tenant")
}

pub(crate) fn entity() -> EntityMetadata {
    EntityMetadata::new("Order").with_collection("orders")
}

/// Appends its tag to every context it sees and journals each call.
pub(crate) struct TaggingAugmentor {
    tag: String,
    priority: Option<i32>,
    journal: Journal,
    supported: bool,
    vetoes_updates: bool,
}

impl TaggingAugmentor {
    pub(crate) fn new(tag: &str, journal: Journal) -> Self {
        Self {
            tag: tag.to_owned(),
            priority: None,
            journal,
            supported: true,
            vetoes_updates: false,
        }
    }

    pub(crate) fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub(crate) fn unsupported(mut self) -> Self {
        self.supported = false;
        self
    }

    pub(crate) fn vetoing(mut self) -> Self {
        self.vetoes_updates = true;
        self
    }
}

impl Augmentor for TaggingAugmentor {
    type Query = FindContext;
    type Update = SaveContext;

    fn name(&self) -> &str {
        &self.tag
    }

    fn priority(&self) -> Option<i32> {
        self.priority
    }

    fn supports(
        &self,
        _method: &MethodMetadata,
        _mode: QueryMode,
        _entity: &EntityMetadata,
    ) -> Result<bool, AugmentorFailure> {
        record(&self.journal, format!("{}:supports", self.tag));
        Ok(self.supported)
    }

    fn augment_query(
        &self,
        mut context: FindContext,
        _method: &MethodMetadata,
    ) -> Result<FindContext, AugmentorFailure> {
        record(&self.journal, format!("{}:query", self.tag));
        context.tags.push(self.tag.clone());
        Ok(context)
    }

    fn augment_update(
        &self,
        mut context: SaveContext,
        _method: &MethodMetadata,
    ) -> Result<Option<SaveContext>, AugmentorFailure> {
        record(&self.journal, format!("{}:update", self.tag));
        if self.vetoes_updates {
            return Ok(None);
        }
        context.tags.push(self.tag.clone());
        Ok(Some(context))
    }
}

/// Fails on every call.
pub(crate) struct FailingAugmentor {
    pub(crate) priority: Option<i32>,
}

impl FailingAugmentor {
    fn failure(&self, operation: &str) -> AugmentorFailure {
        AugmentorFailure::new(self.name(), format!("{operation} refused"))
    }
}

impl Augmentor for FailingAugmentor {
    type Query = FindContext;
    type Update = SaveContext;

    fn name(&self) -> &str {
        "failing"
    }

    fn priority(&self) -> Option<i32> {
        self.priority
    }

    fn supports(
        &self,
        _method: &MethodMetadata,
        _mode: QueryMode,
        _entity: &EntityMetadata,
    ) -> Result<bool, AugmentorFailure> {
        Err(self.failure("supports"))
    }

    fn augment_query(
        &self,
        _context: FindContext,
        _method: &MethodMetadata,
    ) -> Result<FindContext, AugmentorFailure> {
        Err(self.failure("query"))
    }

    fn augment_update(
        &self,
        _context: SaveContext,
        _method: &MethodMetadata,
    ) -> Result<Option<SaveContext>, AugmentorFailure> {
        Err(self.failure("update"))
    }
}

/// Declares the same context type on both sides.
pub(crate) struct EchoAugmentor;

impl Augmentor for EchoAugmentor {
    type Query = EchoContext;
    type Update = EchoContext;

    fn supports(
        &self,
        _method: &MethodMetadata,
        _mode: QueryMode,
        _entity: &EntityMetadata,
    ) -> Result<bool, AugmentorFailure> {
        Ok(true)
    }

    fn augment_query(
        &self,
        context: EchoContext,
        _method: &MethodMetadata,
    ) -> Result<EchoContext, AugmentorFailure> {
        Ok(EchoContext {
            hops: context.hops.saturating_add(1),
        })
    }

    fn augment_update(
        &self,
        context: EchoContext,
        _method: &MethodMetadata,
    ) -> Result<Option<EchoContext>, AugmentorFailure> {
        Ok(Some(EchoContext {
            hops: context.hops.saturating_add(10),
        }))
    }
}

/// Implements `supports` only and relies on the passthrough transforms.
pub(crate) struct PassiveAugmentor;

impl Augmentor for PassiveAugmentor {
    type Query = FindContext;
    type Update = SaveContext;

    fn supports(
        &self,
        _method: &MethodMetadata,
        mode: QueryMode,
        _entity: &EntityMetadata,
    ) -> Result<bool, AugmentorFailure> {
        Ok(!mode.is_write())
    }
}

mock! {
    pub(crate) Probe {}
    impl Augmentor for Probe {
        type Query = FindContext;
        type Update = SaveContext;

        fn supports(
            &self,
            method: &MethodMetadata,
            mode: QueryMode,
            entity: &EntityMetadata,
        ) -> Result<bool, AugmentorFailure>;

        fn augment_query(
            &self,
            context: FindContext,
            method: &MethodMetadata,
        ) -> Result<FindContext, AugmentorFailure>;

        fn augment_update(
            &self,
            context: SaveContext,
            method: &MethodMetadata,
        ) -> Result<Option<SaveContext>, AugmentorFailure>;
    }
}

// ---------------------------------------------------------------------------
// Event capture
// ---------------------------------------------------------------------------

/// In-memory sink for formatted tracing output.
#[derive(Clone, Default)]
pub(crate) struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub(crate) fn text(&self) -> String {
        let bytes = self.0.lock().expect("capture lock").clone();
        String::from_utf8(bytes).expect("utf-8 output")
    }

    /// Parses one JSON object per captured line.
    pub(crate) fn events(&self) -> Vec<Value> {
        self.text()
            .lines()
            .map(|line| serde_json::from_str(line).expect("json event"))
            .collect()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("capture lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `body` with every engine event captured as JSON.
pub(crate) fn capture_engine_events<R>(body: impl FnOnce() -> R) -> (R, Vec<Value>) {
    let capture = Capture::default();
    let sink = capture.clone();
    let settings = EngineSettings::default()
        .with_log_filter("augment_engine=trace")
        .with_log_format(LogFormat::Json);
    let subscriber = engine_subscriber(&settings, move || sink.clone()).expect("valid filter");
    let result = tracing::subscriber::with_default(subscriber, body);
    (result, capture.events())
}

/// Field values of the events carrying `message`, in emission order.
pub(crate) fn field_of(events: &[Value], message: &str, field: &str) -> Vec<String> {
    events
        .iter()
        .filter(|event| event["message"] == message)
        .map(|event| event[field].as_str().unwrap_or_default().to_owned())
        .collect()
}

// ---------------------------------------------------------------------------
// Crate-level tests
// ---------------------------------------------------------------------------

#[test]
fn tags_are_appended_in_priority_order() {
    let shared = journal();
    let engine = AugmentationEngine::new(
        [
            AugmentorHandle::new(TaggingAugmentor::new("B", shared.clone()).with_priority(20)),
            AugmentorHandle::new(TaggingAugmentor::new("A", shared).with_priority(10)),
        ],
        method(),
    );

    let context = engine
        .invoke_for_query(FindContext::default())
        .expect("query dispatch");
    assert_eq!(context.tags, vec![String::from("A"), String::from("B")]);
}
