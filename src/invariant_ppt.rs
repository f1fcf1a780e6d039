//! Runtime invariants with contract-test support.
//!
//! Geometry and session code state their invariants with
//! [`assert_invariant!`](crate::assert_invariant). Every check is recorded in a
//! thread-local log so tests can prove the invariant was exercised, not just
//! that nothing panicked.
//!
//! ```rust,ignore
//! use printbooth::assert_invariant;
//!
//! assert_invariant!(
//!     display_width <= max_width,
//!     "Canvas display width fits the screen budget",
//!     "sizing"
//! );
//!
//! // in a test, after driving the code:
//! printbooth::invariant_ppt::contract_test("sizing", &[
//!     "Canvas display width fits the screen budget",
//! ]);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::thread_local;

thread_local! {
    static CHECKED: RefCell<HashMap<String, u64>> = RefCell::new(HashMap::new());
}

/// Assert an invariant and record that it was checked.
///
/// # Panics
/// Panics when the condition is false.
#[macro_export]
macro_rules! assert_invariant {
    ($condition:expr, $message:expr) => {
        $crate::invariant_ppt::__check_invariant($condition, $message, None)
    };
    ($condition:expr, $message:expr, $context:expr) => {
        $crate::invariant_ppt::__check_invariant($condition, $message, Some($context))
    };
}

#[doc(hidden)]
pub fn __check_invariant(condition: bool, message: &str, context: Option<&str>) {
    CHECKED.with(|log| {
        *log.borrow_mut().entry(message.to_string()).or_insert(0) += 1;
    });

    if !condition {
        panic!(
            "INVARIANT VIOLATION [{}]: {}",
            context.unwrap_or("unknown"),
            message
        );
    }
}

/// How many times `message` was checked on this thread.
pub fn times_checked(message: &str) -> u64 {
    CHECKED.with(|log| log.borrow().get(message).copied().unwrap_or(0))
}

/// Panic unless every listed invariant was checked on this thread.
pub fn contract_test(test_name: &str, required_invariants: &[&str]) {
    let missing: Vec<&str> = required_invariants
        .iter()
        .copied()
        .filter(|inv| times_checked(inv) == 0)
        .collect();

    if !missing.is_empty() {
        panic!(
            "CONTRACT FAILURE [{}]: invariants never checked:\n  - {}",
            test_name,
            missing.join("\n  - ")
        );
    }
}

pub fn clear_invariant_log() {
    CHECKED.with(|log| log.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks_are_counted() {
        clear_invariant_log();
        crate::assert_invariant!(true, "counted twice");
        crate::assert_invariant!(true, "counted twice", "test");
        assert_eq!(times_checked("counted twice"), 2);
        contract_test("counting", &["counted twice"]);
    }

    #[test]
    #[should_panic(expected = "CONTRACT FAILURE")]
    fn test_missing_invariant_fails_contract() {
        clear_invariant_log();
        contract_test("missing", &["never checked"]);
    }

    #[test]
    #[should_panic(expected = "INVARIANT VIOLATION [layout]")]
    fn test_violation_panics_with_context() {
        crate::assert_invariant!(1 > 2, "impossible", "layout");
    }
}
