//! Deferred Hooks
//!
//! This example shows hooks that return futures. The pipeline suspends at
//! the deferred hook and resumes when it settles; meanwhile the machine is
//! pending and rejects other transitions.
//!
//! Key concepts:
//! - Deferred gating hooks (approve or veto later)
//! - Awaiting a `Fire` result
//! - Pending rejection and the `onPendingTransition` hook
//! - Deferred initial transitions and `ready()`
//!
//! Run with: cargo run --example async_hooks

use lifecycle_fsm::builder::Lifecycles;
use lifecycle_fsm::lifecycle::{Hook, HookOutput};
use lifecycle_fsm::{transitions, FsmError, StateMachine, StateMachineBuilder};
use std::time::Duration;

fn approve_after(millis: u64, approve: bool) -> HookOutput {
    HookOutput::deferred(async move {
        tokio::time::sleep(Duration::from_millis(millis)).await;
        Ok(approve)
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Deferred Hooks ===\n");

    let fsm: StateMachine = StateMachineBuilder::new()
        .init("draft")
        .transitions(transitions![
            submit: "draft" => "review",
            publish: "review" => "published",
            reject: "review" => "draft",
        ])
        .lifecycles(
            Lifecycles::new()
                .on(Hook::Init, |_| {
                    println!("  Loading document...");
                    Ok(approve_after(20, true))
                })
                .on(Hook::before("submit"), |_| {
                    println!("  Running spell check...");
                    Ok(approve_after(50, true))
                })
                .on(Hook::before("publish"), |_| {
                    println!("  Waiting for editor sign-off...");
                    Ok(approve_after(50, false))
                })
                .observe(Hook::PendingTransition, |event| {
                    println!("  Busy, ignoring '{}'", event.transition)
                }),
        )
        .build()?;

    println!("Pending after build: {}", fsm.is_pending());
    fsm.ready().await?;
    println!("Ready in state: {}\n", fsm.state());

    println!("Submitting:");
    let submit = fsm.fire("submit")?;
    println!("  Deferred: {}", submit.is_deferred());

    // Rejected while the spell check runs; the hook swallows the error.
    fsm.fire("submit")?.await?;

    let outcome = submit.await?;
    println!("  Outcome: {outcome:?}");
    println!("State: {}\n", fsm.state());

    println!("Publishing:");
    match fsm.fire("publish")?.await {
        Err(FsmError::Cancelled { .. }) => println!("  Editor vetoed"),
        other => println!("  Unexpected: {other:?}"),
    }
    println!("State: {}", fsm.state());

    println!("\n=== Example Complete ===");
    Ok(())
}
