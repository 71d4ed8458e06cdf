//! Progress reporting
//!
//! Long-running operations report progress through an injected sink rather
//! than printing anything themselves; the CLI plugs a terminal bar in here.

/// Receives position updates from read, erase and program loops.
///
/// `done` is the position *before* the next unit of work starts; `total`
/// is the full length of the operation in bytes.
pub trait Progress {
    /// Report the current position.
    fn report(&mut self, done: u32, total: u32);
}

/// A sink that discards all updates.
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _done: u32, _total: u32) {}
}

impl<P: Progress + ?Sized> Progress for &mut P {
    fn report(&mut self, done: u32, total: u32) {
        (**self).report(done, total)
    }
}
