//! Handler declaration forms accepted by `#[command_handlers]` and by hand.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use command_adapter::{
    command_handlers, AnnotationCommandHandlerAdapter, CommandContext, CommandHandlers,
    CommandMessage, CommandType, HandlerRegistry, HandlerRegistryBuilder, InvalidHandlerDefinition,
};

use crate::support::RecordingBus;

#[derive(Debug, PartialEq)]
pub struct Receipt {
    pub number: u64,
}

#[derive(Debug)]
pub struct Closed;

impl fmt::Display for Closed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("register closed")
    }
}

impl std::error::Error for Closed {}

pub struct Sale(pub u64);
pub struct Refund(pub u64);
pub struct WhoAmI;
pub struct Close;

#[derive(Default)]
pub struct Till {
    total: AtomicU64,
    closed: Mutex<bool>,
    last_receipt: Mutex<Option<Arc<Receipt>>>,
}

#[command_handlers]
impl Till {
    /// Shared results keep their identity.
    #[command_handler]
    fn sell(&self, sale: Sale) -> Result<Arc<Receipt>, Closed> {
        if *self.closed.lock().unwrap() {
            return Err(Closed);
        }
        let number = self.total.fetch_add(sale.0, Ordering::SeqCst) + sale.0;
        let receipt = Arc::new(Receipt { number });
        *self.last_receipt.lock().unwrap() = Some(receipt.clone());
        Ok(receipt)
    }

    #[command_handler]
    fn refund(&self, refund: Refund, ctx: &CommandContext) -> Result<(), Closed> {
        if ctx.has("dry-run") {
            return Ok(());
        }
        self.total.fetch_sub(refund.0, Ordering::SeqCst);
        Ok(())
    }

    #[command_adapter::command_handler]
    fn who_am_i(&self, _command: WhoAmI, ctx: &command_adapter::CommandContext) -> Option<String> {
        ctx.correlation_id().map(str::to_string)
    }

    #[command_handler]
    fn close(&self, _command: Close) -> () {
        *self.closed.lock().unwrap() = true;
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }
}

fn till() -> (Arc<Till>, Arc<AnnotationCommandHandlerAdapter<Till>>) {
    let till = Arc::new(Till::default());
    let adapter = AnnotationCommandHandlerAdapter::new(till.clone(), RecordingBus::new()).unwrap();
    (till, adapter)
}

#[test]
fn reference_results_keep_identity() {
    let (till, adapter) = till();

    let receipt = adapter
        .dispatch_command(Sale(5), &CommandContext::new())
        .unwrap()
        .downcast::<Arc<Receipt>>()
        .unwrap();

    assert_eq!(*receipt, Receipt { number: 5 });
    let stored = till.last_receipt.lock().unwrap().clone().unwrap();
    assert!(Arc::ptr_eq(&receipt, &stored));
}

#[test]
fn context_reaches_handlers_that_declare_it() {
    let (till, adapter) = till();
    adapter
        .dispatch_command(Sale(10), &CommandContext::new())
        .unwrap();

    let dry_run = CommandContext::new().with("dry-run", true);
    let outcome = adapter.dispatch_command(Refund(3), &dry_run).unwrap();
    assert!(outcome.is_void());
    assert_eq!(till.total(), 10);

    adapter
        .dispatch_command(Refund(3), &CommandContext::new())
        .unwrap();
    assert_eq!(till.total(), 7);

    let ctx = CommandContext::new().with("correlation-id", "req-7");
    let outcome = adapter.dispatch_command(WhoAmI, &ctx).unwrap();
    assert_eq!(
        outcome.downcast::<Option<String>>().unwrap(),
        Some("req-7".to_string())
    );
}

#[test]
fn absent_value_is_not_void() {
    let (_, adapter) = till();
    let outcome = adapter
        .dispatch_command(WhoAmI, &CommandContext::new())
        .unwrap();
    assert!(!outcome.is_void());
    assert_eq!(outcome.downcast::<Option<String>>().unwrap(), None);
}

#[test]
fn explicit_unit_return_is_void() {
    let (_, adapter) = till();
    let binding = adapter.find_handler_for(&Close).unwrap();
    assert!(!binding.has_return_value());

    assert!(adapter
        .dispatch_command(Close, &CommandContext::new())
        .unwrap()
        .is_void());

    let err = adapter
        .dispatch_command(Sale(1), &CommandContext::new())
        .unwrap_err();
    assert!(err.handler_error::<Closed>().is_some());
    assert_eq!(err.to_string(), "register closed");
}

#[test]
fn methods_stay_callable_directly() {
    let till = Till::default();
    till.refund(Refund(0), &CommandContext::new()).unwrap();
    assert_eq!(till.sell(Sale(2)).unwrap().number, 2);
    assert_eq!(till.total(), 2);
}

// =============================================================================
// Result aliases
// =============================================================================

pub type LedgerResult<T> = Result<T, Closed>;

pub struct Post(pub u64);
pub struct Audit;

#[derive(Default)]
pub struct Ledger {
    posted: AtomicU64,
}

#[command_handlers]
impl Ledger {
    #[command_handler]
    fn post(&self, post: Post) -> LedgerResult<u64> {
        if post.0 == 0 {
            return Err(Closed);
        }
        Ok(self.posted.fetch_add(post.0, Ordering::SeqCst) + post.0)
    }

    #[command_handler]
    fn audit(&self, _command: Audit) -> fmt::Result {
        Err(fmt::Error)
    }
}

fn ledger() -> Arc<AnnotationCommandHandlerAdapter<Ledger>> {
    AnnotationCommandHandlerAdapter::new(Arc::new(Ledger::default()), RecordingBus::new()).unwrap()
}

#[test]
fn aliased_result_failures_propagate() {
    let adapter = ledger();

    let err = adapter
        .dispatch_command(Post(0), &CommandContext::new())
        .unwrap_err();
    assert!(err.handler_error::<Closed>().is_some());

    let outcome = adapter
        .dispatch_command(Post(4), &CommandContext::new())
        .unwrap();
    assert_eq!(outcome.downcast::<u64>().unwrap(), 4);
}

#[test]
fn bare_result_alias_is_fallible_void() {
    let adapter = ledger();
    assert!(!adapter.find_handler_for(&Audit).unwrap().has_return_value());

    let err = adapter
        .dispatch_command(Audit, &CommandContext::new())
        .unwrap_err();
    assert!(err.handler_error::<fmt::Error>().is_some());
}

// =============================================================================
// Generic targets
// =============================================================================

pub struct Echo<M> {
    _marker: PhantomData<fn() -> M>,
}

#[command_handlers]
impl<M: Send + 'static> Echo<M> {
    #[command_handler]
    fn echo(&self, message: M) -> M {
        message
    }
}

#[test]
fn generic_impl_blocks() {
    let echo = Arc::new(Echo::<u32> {
        _marker: PhantomData,
    });
    let adapter = AnnotationCommandHandlerAdapter::new(echo, RecordingBus::new()).unwrap();

    assert_eq!(
        adapter.accepted_types().into_iter().collect::<Vec<_>>(),
        vec![CommandType::of::<u32>()]
    );
    let outcome = adapter
        .dispatch(CommandMessage::new(9_u32), &CommandContext::new())
        .unwrap();
    assert_eq!(outcome.downcast::<u32>().unwrap(), 9);
}

// =============================================================================
// Invalid declarations
// =============================================================================

pub struct Ambiguous;

#[command_handlers]
impl Ambiguous {
    #[command_handler]
    fn first(&self, _command: String) {}

    #[command_handler]
    fn second(&self, _command: String) -> usize {
        0
    }
}

#[test]
fn duplicate_command_types_fail_construction() {
    let err = AnnotationCommandHandlerAdapter::new(Arc::new(Ambiguous), RecordingBus::new())
        .unwrap_err();
    assert_eq!(
        err,
        InvalidHandlerDefinition::DuplicateCommandType {
            command_type: CommandType::of::<String>(),
            first: "first",
            second: "second",
        }
    );
}

// =============================================================================
// Hand-written declarations
// =============================================================================

#[derive(Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    fn add(&self, amount: u64) -> Result<u64, std::convert::Infallible> {
        Ok(self.value.fetch_add(amount, Ordering::SeqCst) + amount)
    }
}

impl CommandHandlers for Counter {
    fn register_handlers(handlers: HandlerRegistryBuilder<Self>) -> HandlerRegistryBuilder<Self> {
        handlers.command("add", Counter::add)
    }
}

#[test]
fn hand_written_handler_table() {
    let counter = Arc::new(Counter::default());
    let registry = HandlerRegistry::build(counter.clone()).unwrap();
    assert_eq!(registry.len(), 1);

    let adapter = AnnotationCommandHandlerAdapter::from_registry(registry, RecordingBus::new());
    adapter
        .dispatch_command(4_u64, &CommandContext::new())
        .unwrap();
    let outcome = adapter
        .dispatch_command(6_u64, &CommandContext::new())
        .unwrap();
    assert_eq!(outcome.downcast::<u64>().unwrap(), 10);
    assert_eq!(counter.value.load(Ordering::SeqCst), 10);
}
