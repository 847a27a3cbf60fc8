//! SAPI5 - Microsoft Speech API 5 backend
//!
//! Voice enumeration goes through the voice token category and synthesis
//! through `ISpVoice`, optionally bound to a file-backed `ISpStream`.

pub mod guids;

#[cfg(windows)]
mod synthesizer;

#[cfg(windows)]
pub use synthesizer::*;

/// Run `close` whether or not `result` failed; the first error wins
pub fn close_after<E, F>(result: Result<(), E>, close: F) -> Result<(), E>
where
    F: FnOnce() -> Result<(), E>,
{
    let closed = close();
    result.and(closed)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_close_after_runs_on_failure() {
        let closed = Cell::new(false);
        let result: Result<(), &str> = close_after(Err("speak failed"), || {
            closed.set(true);
            Ok(())
        });
        assert!(closed.get());
        assert_eq!(result, Err("speak failed"));
    }

    #[test]
    fn test_close_after_keeps_first_error() {
        let result: Result<(), &str> = close_after(Err("speak failed"), || Err("close failed"));
        assert_eq!(result, Err("speak failed"));
    }

    #[test]
    fn test_close_after_reports_close_error() {
        let closed = Cell::new(false);
        let result: Result<(), &str> = close_after(Ok(()), || {
            closed.set(true);
            Err("close failed")
        });
        assert!(closed.get());
        assert_eq!(result, Err("close failed"));
    }
}
