//! Rendering statistics.

use alloc::{format, string::String};
use core::fmt::{self, Display, Formatter};
use core::ops::AddAssign;
use core::time::Duration;
#[cfg(feature = "std")]
use std::time::Instant;

//
// Types
//

/// Collects and accumulates rendering statistics and performance data.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    /// Time spent rendering.
    pub time: Duration,
    /// Number of render calls issued.
    pub calls: u32,
    /// Number of frames rendered.
    pub frames: u32,

    /// Triangles submitted, and triangles that reached the rasterizer.
    pub prims: Throughput,
    /// Vertices submitted to and output by the vertex shader.
    pub verts: Throughput,
    /// Fragments generated, and fragments written to the target.
    pub frags: Throughput,

    /// Triangles discarded by the trivial frustum reject.
    pub rejected: usize,
    /// Triangles that straddled the frustum and had to be clipped.
    pub clipped: usize,
    /// Triangles discarded by face culling.
    pub culled: usize,
    /// Triangles discarded as degenerate (zero area or non-finite).
    pub degenerate: usize,

    #[cfg(feature = "std")]
    start: Option<Instant>,
}

/// Counts of items input to and output from a rendering stage.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Throughput {
    /// Count of items submitted.
    pub i: usize,
    /// Count of items output.
    pub o: usize,
}

//
// Impls
//

impl Stats {
    /// Creates a new zeroed `Stats` instance.
    pub fn new() -> Self {
        Self::default()
    }
    /// Creates a `Stats` instance that records the time of its creation.
    ///
    /// Call [`finish`][Self::finish] to write the elapsed time to `self.time`.
    /// Useful for timing frames, rendering calls, etc.
    ///
    /// Equivalent to [`Stats::new`] if the `std` feature is not enabled.
    pub fn start() -> Self {
        Self {
            #[cfg(feature = "std")]
            start: Some(Instant::now()),
            ..Self::default()
        }
    }

    /// Stops the timer and records the elapsed time to `self.time`.
    ///
    /// No-op if the timer was not running. This method is also no-op unless
    /// the `std` feature is enabled.
    #[must_use]
    pub fn finish(self) -> Self {
        Self {
            #[cfg(feature = "std")]
            time: self.start.map(|st| st.elapsed()).unwrap_or(self.time),
            #[cfg(feature = "std")]
            start: None,
            ..self
        }
    }

    /// Returns the average number of fragments written per second,
    /// or zero if no time has been recorded.
    pub fn frags_per_sec(&self) -> f32 {
        if self.time.is_zero() {
            0.0
        } else {
            self.frags.o as f32 / self.time.as_secs_f32()
        }
    }
}

impl Throughput {
    /// Returns the ratio of output to input items, or 1.0 if no items
    /// were input.
    pub fn ratio(&self) -> f32 {
        if self.i == 0 {
            1.0
        } else {
            self.o as f32 / self.i as f32
        }
    }
}

impl Display for Stats {
    #[inline(never)]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let w = f.width().unwrap_or(12);
        writeln!(f, " time       {:>w$}", human_time(self.time))?;
        writeln!(f, " calls      {:>w$}", self.calls)?;
        writeln!(f, " frames     {:>w$}", self.frames)?;
        for (lbl, tp) in [
            ("prims", self.prims),
            ("verts", self.verts),
            ("frags", self.frags),
        ] {
            if f.alternate() {
                writeln!(f, " {lbl:10} {tp:#w$}")?;
            } else {
                writeln!(f, " {lbl:10} {tp:w$}")?;
            }
        }
        writeln!(f, " rejected   {:>w$}", self.rejected)?;
        writeln!(f, " clipped    {:>w$}", self.clipped)?;
        writeln!(f, " culled     {:>w$}", self.culled)?;
        writeln!(f, " degenerate {:>w$}", self.degenerate)
    }
}

impl Display for Throughput {
    #[inline(never)]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let &Self { i, o } = self;
        let w = f.width().unwrap_or(10);
        if f.alternate() {
            if i == 0 {
                write!(f, "{:>w$}", "--")
            } else {
                let pct = 100.0 * self.ratio();
                write!(f, "{pct:>w$.1}%", w = w.saturating_sub(1))
            }
        } else {
            let io = format!("{} / {}", human_num(i), human_num(o));
            write!(f, "{io:>w$}")
        }
    }
}

impl AddAssign for Stats {
    /// Appends the stats of `other` to `self`.
    fn add_assign(&mut self, other: Self) {
        self.time += other.time;
        self.calls += other.calls;
        self.frames += other.frames;
        self.prims += other.prims;
        self.verts += other.verts;
        self.frags += other.frags;
        self.rejected += other.rejected;
        self.clipped += other.clipped;
        self.culled += other.culled;
        self.degenerate += other.degenerate;
    }
}

impl AddAssign for Throughput {
    fn add_assign(&mut self, rhs: Self) {
        self.i += rhs.i;
        self.o += rhs.o;
    }
}

#[inline(never)]
fn human_num(n: usize) -> String {
    if n < 1_000 {
        format!("{n}")
    } else if n < 1_000_000 {
        format!("{:.1}k", n as f32 / 1_000.)
    } else if n < 1_000_000_000 {
        format!("{:.1}M", n as f32 / 1_000_000.)
    } else {
        format!("{:.1}G", n as f32 / 1_000_000_000.)
    }
}

#[inline(never)]
fn human_time(d: Duration) -> String {
    let secs = d.as_secs_f32();
    if secs < 1e-3 {
        format!("{:.1}μs", secs * 1_000_000.)
    } else if secs < 1.0 {
        format!("{:.1}ms", secs * 1_000.)
    } else {
        format!("{secs:.1}s")
    }
}
