//! Matter State Machine
//!
//! This example walks water through its phases and shows the synchronous
//! hook pipeline.
//!
//! Key concepts:
//! - Declaring transitions with the `transitions!` macro
//! - Gating hooks that cancel a transition
//! - Listeners attached after construction
//! - Recording and stepping back through history
//!
//! Run with: cargo run --example matter

use lifecycle_fsm::builder::Lifecycles;
use lifecycle_fsm::lifecycle::{Hook, HookError, HookOutput, LifecycleEvent, ListenerFamily};
use lifecycle_fsm::{transitions, FsmError, History, StateMachine, StateMachineBuilder};
use std::sync::Arc;

fn main() {
    println!("=== Matter State Machine ===\n");

    let history = History::new();
    let fsm: StateMachine = StateMachineBuilder::new()
        .init("solid")
        .transitions(transitions![
            melt: "solid" => "liquid",
            freeze: "liquid" => "solid",
            vaporize: "liquid" => "gas",
            condense: "gas" => "liquid",
        ])
        .lifecycles(
            Lifecycles::new()
                .observe(Hook::on_transition("melt"), |_| println!("  I melted"))
                .observe(Hook::enter("gas"), |_| println!("  I'm a cloud now"))
                .on(Hook::before("freeze"), |_| {
                    println!("  Refusing to freeze");
                    Ok(HookOutput::cancel())
                }),
        )
        .plugin(history.clone())
        .build()
        .unwrap();

    fsm.add_event_listener(
        ListenerFamily::AfterTransition,
        Arc::new(|event: &LifecycleEvent| -> Result<(), HookError> {
            println!("  [listener] {} -> {}", event.transition, event.to);
            Ok(())
        }),
    );

    println!("Initial state: {}", fsm.state());
    println!("All states: {:?}", fsm.all_states());
    println!("All transitions: {:?}\n", fsm.all_transitions());

    println!("Melting:");
    fsm.fire("melt").unwrap();
    println!("State: {}\n", fsm.state());

    println!("Freezing:");
    match fsm.fire("freeze") {
        Err(FsmError::Cancelled { .. }) => println!("State stays: {}\n", fsm.state()),
        other => println!("Unexpected: {other:?}\n"),
    }

    println!("Vaporizing:");
    fsm.fire("vaporize").unwrap();
    println!("State: {}\n", fsm.state());

    println!("Melting a gas:");
    if let Err(err) = fsm.fire("melt") {
        println!("  {err}\n");
    }

    println!("History path: {:?}", history.path());
    println!("Stepping back:");
    history.back(&fsm).unwrap();
    println!("State: {}", fsm.state());
    println!("History path: {:?}", history.path());

    println!("\n=== Example Complete ===");
}
