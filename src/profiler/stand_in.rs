use crate::clock::Clock;
use crate::profiler::{Operation, ProfilingState};
use std::sync::Arc;
use std::time::Instant;

/// A stand-in that forwards calls to a delegate and times profiled ones
///
/// `Profiled<T>` implements the same capability traits as `T` (see the
/// `impl PageSource for Profiled<T>` and `impl WebCrawler for Profiled<T>`
/// blocks). Each forwarding method goes through [`Profiled::invoke`] with
/// the signature its capability declared.
pub struct Profiled<T> {
    delegate: T,
    type_name: &'static str,
    operations: &'static [Operation],
    clock: Arc<dyn Clock>,
    state: Arc<ProfilingState>,
}

impl<T> Profiled<T> {
    pub(crate) fn new(
        delegate: T,
        operations: &'static [Operation],
        clock: Arc<dyn Clock>,
        state: Arc<ProfilingState>,
    ) -> Self {
        Self {
            delegate,
            type_name: std::any::type_name::<T>(),
            operations,
            clock,
            state,
        }
    }

    /// Forwards one call to the delegate
    ///
    /// When `signature` names a profiled operation the elapsed time is
    /// recorded once the call finishes, whatever it returns. A panic inside
    /// the delegate is recorded too, while unwinding. The delegate's return
    /// value comes back untouched.
    pub fn invoke<R>(&self, signature: &'static str, call: impl FnOnce(&T) -> R) -> R {
        if !self.is_profiled(signature) {
            return call(&self.delegate);
        }

        let _timer = CallTimer {
            start: self.clock.now(),
            type_name: self.type_name,
            signature,
            clock: self.clock.as_ref(),
            state: &self.state,
        };
        call(&self.delegate)
    }

    /// Returns true if `signature` is a declared, profiled operation
    pub fn is_profiled(&self, signature: &str) -> bool {
        self.operations
            .iter()
            .any(|op| op.profiled && op.signature == signature)
    }

    pub fn delegate(&self) -> &T {
        &self.delegate
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Profiled<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profiled")
            .field("delegate", &self.delegate)
            .field("operations", &self.operations)
            .finish()
    }
}

/// Records the time since `start` when dropped
struct CallTimer<'a> {
    start: Instant,
    type_name: &'static str,
    signature: &'static str,
    clock: &'a dyn Clock,
    state: &'a ProfilingState,
}

impl Drop for CallTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.clock.now().saturating_duration_since(self.start);
        self.state.record(self.type_name, self.signature, elapsed);
    }
}
