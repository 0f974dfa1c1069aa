//! Dispatch semantics: resolution, result normalization, failure propagation.

use std::collections::{HashSet, LinkedList};
use std::sync::Arc;
use std::thread;

use command_adapter::{
    AnnotationCommandHandlerAdapter, CommandContext, CommandMessage, CommandType, DispatchError,
};

use crate::support::{MyCommandHandler, RecordingBus, Rejected};

fn setup() -> (
    Arc<MyCommandHandler>,
    Arc<AnnotationCommandHandlerAdapter<MyCommandHandler>>,
) {
    let target = Arc::new(MyCommandHandler::default());
    let adapter = AnnotationCommandHandlerAdapter::new(target.clone(), RecordingBus::new()).unwrap();
    (target, adapter)
}

#[test]
fn void_return_type_yields_void_marker() {
    let (target, adapter) = setup();

    let outcome = adapter
        .dispatch_command(String::new(), &CommandContext::new())
        .unwrap();

    assert!(outcome.is_void());
    assert_eq!(target.void_count(), 1);
    assert_eq!(target.returning_count(), 0);
}

#[test]
fn value_return_type_yields_value() {
    let (target, adapter) = setup();

    let outcome = adapter
        .dispatch(CommandMessage::new(1_i64), &CommandContext::new())
        .unwrap();

    assert_eq!(outcome.downcast::<i64>().unwrap(), 1);
    assert_eq!(target.void_count(), 0);
    assert_eq!(target.returning_count(), 1);
}

#[test]
fn handler_failures_propagate_unwrapped() {
    let (target, adapter) = setup();

    let err = adapter
        .dispatch_command(HashSet::<String>::new(), &CommandContext::new())
        .unwrap_err();
    assert_eq!(
        err.handler_error::<Rejected>(),
        Some(&Rejected("Some exception".into()))
    );
    assert!(err.handler_error::<std::io::Error>().is_none());

    let err = adapter
        .dispatch_command(Vec::<String>::new(), &CommandContext::new())
        .unwrap_err();
    let original = err.into_handler_error().unwrap();
    let io_error = original.downcast_ref::<std::io::Error>().unwrap();
    assert_eq!(io_error.kind(), std::io::ErrorKind::Other);
    assert_eq!(io_error.to_string(), "Some exception");

    assert_eq!(target.void_count(), 0);
    assert_eq!(target.returning_count(), 0);
}

#[test]
fn no_handler_for_command() {
    let (target, adapter) = setup();

    let err = adapter
        .dispatch_command(LinkedList::<String>::new(), &CommandContext::new())
        .unwrap_err();

    assert!(matches!(
        err,
        DispatchError::NoHandlerForCommand(command_type)
            if command_type == CommandType::of::<LinkedList<String>>()
    ));
    assert!(err.to_string().contains("LinkedList"));
    assert_eq!(target.void_count(), 0);
    assert_eq!(target.returning_count(), 0);
}

#[test]
fn unmarked_methods_are_not_dispatched_to() {
    let (target, adapter) = setup();

    let err = adapter
        .dispatch_command(7_u8, &CommandContext::new())
        .unwrap_err();
    assert!(err.is_no_handler());
    assert_eq!(target.void_count(), 0);
}

#[test]
fn resolution_uses_exact_type() {
    let (_, adapter) = setup();

    // i32 converts to i64 but is a different type.
    assert!(adapter
        .dispatch_command(1_i32, &CommandContext::new())
        .unwrap_err()
        .is_no_handler());
    // &str is not String.
    assert!(adapter
        .dispatch_command("", &CommandContext::new())
        .unwrap_err()
        .is_no_handler());
}

#[test]
fn find_handler_method() {
    let (_, adapter) = setup();

    let binding = adapter.find_handler_for(&String::new()).unwrap();
    assert_eq!(binding.method_name(), "my_void_handler");

    let binding = adapter.find_handler_for(&5_i64).unwrap();
    assert_eq!(binding.method_name(), "my_returning_handler");
    assert!(binding.accepts_context());
    assert!(binding.has_return_value());

    assert!(adapter.find_handler_for(&LinkedList::<String>::new()).is_none());
}

#[test]
fn adapter_keeps_the_target() {
    let (target, adapter) = setup();
    assert!(Arc::ptr_eq(adapter.target(), &target));
}

#[test]
fn concurrent_dispatch_reaches_the_same_target() {
    let (target, adapter) = setup();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let adapter = adapter.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    adapter
                        .dispatch_command(format!("cmd-{}", i), &CommandContext::new())
                        .unwrap();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(target.void_count(), 100);
}
