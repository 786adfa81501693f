//! Reentrant build detection.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};

// Kept low enough that a chain of nested factories fails cleanly before a
// default 2 MiB thread stack overflows in unoptimized builds.
const MAX_DEPTH: usize = 256;

// Ids whose build is in progress on this thread, outermost first. Builds
// are keyed by the container address so two containers sharing a thread
// never see each other's ids.
thread_local! {
    static BUILD_STACK: RefCell<Vec<(usize, String)>> = const { RefCell::new(Vec::new()) };
}

/// Marks one id as being built on the current thread until dropped.
pub(crate) struct BuildGuard {
    owner: usize,
}

impl BuildGuard {
    /// Pushes `id` onto the build stack.
    ///
    /// Fails with `Circular` if the same container is already building `id`
    /// further up this thread's stack, and with `DepthExceeded` past
    /// `MAX_DEPTH` nested builds.
    pub(crate) fn enter(owner: usize, id: &str) -> DiResult<Self> {
        BUILD_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            if let Some(start) = stack.iter().position(|(o, n)| *o == owner && n == id) {
                let mut path: Vec<String> = stack[start..]
                    .iter()
                    .filter(|(o, _)| *o == owner)
                    .map(|(_, n)| n.clone())
                    .collect();
                path.push(id.to_string());
                return Err(DiError::Circular(path));
            }

            if stack.len() >= MAX_DEPTH {
                return Err(DiError::DepthExceeded(stack.len()));
            }

            stack.push((owner, id.to_string()));
            Ok(BuildGuard { owner })
        })
    }
}

impl Drop for BuildGuard {
    fn drop(&mut self) {
        BUILD_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            let popped = stack.pop();
            debug_assert!(matches!(popped, Some((o, _)) if o == self.owner));
        });
    }
}
