//! Named-interval frame timing.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::time::{Duration, Instant};

/// Accumulates elapsed wall time per named interval.
///
/// Timing a section of code is scope based:
/// ```
/// # use softpipe_core::render::stats::Profiler;
/// let mut prof = Profiler::new();
/// {
///     let _guard = prof.scope("raster");
///     // ...work...
/// } // elapsed time added to "raster" here
/// println!("{prof}");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Profiler {
    totals: BTreeMap<&'static str, (Duration, u64)>,
}

/// Guard that adds its lifetime's elapsed time to an interval on drop.
pub struct Scope<'a> {
    prof: &'a mut Profiler,
    name: &'static str,
    start: Instant,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts timing the interval `name`.
    pub fn scope(&mut self, name: &'static str) -> Scope<'_> {
        Scope { prof: self, name, start: Instant::now() }
    }

    /// Adds one call of duration `dur` to the interval `name`.
    pub fn add(&mut self, name: &'static str, dur: Duration) {
        let (total, calls) = self.totals.entry(name).or_default();
        *total += dur;
        *calls += 1;
    }

    /// Returns the accumulated total of the interval `name`, if any.
    pub fn total(&self, name: &str) -> Option<Duration> {
        self.totals.get(name).map(|&(total, _)| total)
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        let dur = self.start.elapsed();
        self.prof.add(self.name, dur);
    }
}

impl Display for Profiler {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            " {:<16}{:>12}{:>8}{:>12}",
            "interval", "total ms", "calls", "avg ms"
        )?;
        for (name, &(total, calls)) in &self.totals {
            let total_ms = total.as_secs_f32() * 1000.0;
            writeln!(
                f,
                " {:<16}{:>12.2}{:>8}{:>12.3}",
                name,
                total_ms,
                calls,
                total_ms / calls as f32
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn add_accumulates_per_interval() {
        let mut prof = Profiler::new();
        prof.add("a", Duration::from_millis(2));
        prof.add("a", Duration::from_millis(3));
        prof.add("b", Duration::from_millis(1));

        assert_eq!(prof.total("a"), Some(Duration::from_millis(5)));
        assert_eq!(prof.total("b"), Some(Duration::from_millis(1)));
        assert_eq!(prof.total("c"), None);
    }

    #[test]
    fn scope_records_on_drop() {
        let mut prof = Profiler::new();
        assert_eq!(prof.total("work"), None);
        {
            let _guard = prof.scope("work");
        }
        assert!(prof.total("work").is_some());
    }

    #[test]
    fn display_lists_intervals() {
        let mut prof = Profiler::new();
        prof.add("raster", Duration::from_millis(4));
        let out = prof.to_string();
        assert!(out.contains("raster"));
        assert!(out.contains("4.00"));
    }
}
