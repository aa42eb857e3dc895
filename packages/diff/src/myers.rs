//! Shortest edit script search over arbitrary comparable units.
//!
//! Classic greedy forward search: for each edit distance `d` keep the
//! furthest x reached on every diagonal `k = x - y`, extend along matching
//! elements, and once `(n, m)` is reached walk the saved frontiers back to
//! recover the path.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunKind {
    Equal,
    Delete,
    Insert,
}

/// A maximal run of one kind, in unit indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub kind: RunKind,
    pub old: Range<usize>,
    pub new: Range<usize>,
}

impl Run {
    pub fn len(&self) -> usize {
        match self.kind {
            RunKind::Insert => self.new.len(),
            _ => self.old.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute a minimal edit script from `old` to `new`
///
/// Common prefix and suffix are matched up front, so the quadratic search
/// only covers the region that actually changed.
pub fn diff<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Run> {
    diff_within(old, new, usize::MAX).unwrap_or_default()
}

/// Like [`diff`], but gives up once more than `max_distance` units would
/// have to be inserted or deleted
///
/// The search stops at that distance, so a hopeless comparison costs
/// `O(max_distance²)` memory instead of running to completion.
pub fn diff_within<T: PartialEq>(old: &[T], new: &[T], max_distance: usize) -> Option<Vec<Run>> {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut runs = Vec::new();
    if prefix > 0 {
        runs.push(Run {
            kind: RunKind::Equal,
            old: 0..prefix,
            new: 0..prefix,
        });
    }

    for run in shortest_edit(old_mid, new_mid, max_distance)? {
        runs.push(Run {
            kind: run.kind,
            old: run.old.start + prefix..run.old.end + prefix,
            new: run.new.start + prefix..run.new.end + prefix,
        });
    }

    if suffix > 0 {
        runs.push(Run {
            kind: RunKind::Equal,
            old: old.len() - suffix..old.len(),
            new: new.len() - suffix..new.len(),
        });
    }

    Some(merge_runs(runs))
}

/// Single unit step recovered from the trace
#[derive(Clone, Copy)]
struct Step {
    kind: RunKind,
    old: usize,
    new: usize,
}

fn shortest_edit<T: PartialEq>(old: &[T], new: &[T], max_distance: usize) -> Option<Vec<Run>> {
    let n = old.len();
    let m = new.len();

    if n == 0 && m == 0 {
        return Some(Vec::new());
    }
    if n == 0 || m == 0 {
        if n + m > max_distance {
            return None;
        }
        let kind = if n == 0 { RunKind::Insert } else { RunKind::Delete };
        return Some(vec![Run {
            kind,
            old: 0..n,
            new: 0..m,
        }]);
    }

    let trace = search(old, new, max_distance)?;
    let steps = backtrack(&trace, n, m);
    Some(steps_to_runs(&steps))
}

/// Slot of diagonal `k` in the row for distance `d`
///
/// Only diagonals `-d, -d + 2, ..., d` are reachable in round `d`, so each
/// row holds `d + 1` entries.
fn slot(k: isize, d: isize) -> usize {
    ((k + d) / 2) as usize
}

/// Forward pass; row `d` holds the furthest x reached on each diagonal
/// after round `d`
fn search<T: PartialEq>(old: &[T], new: &[T], max_distance: usize) -> Option<Vec<Vec<isize>>> {
    let n = old.len() as isize;
    let m = new.len() as isize;
    let max = (n + m).min(max_distance.min(isize::MAX as usize) as isize);
    let mut trace: Vec<Vec<isize>> = Vec::new();

    for d in 0..=max {
        let mut row = vec![0isize; d as usize + 1];

        let mut k = -d;
        while k <= d {
            let mut x = match trace.last() {
                None => 0,
                Some(prev) => {
                    if k == -d || (k != d && prev[slot(k - 1, d - 1)] < prev[slot(k + 1, d - 1)]) {
                        prev[slot(k + 1, d - 1)]
                    } else {
                        prev[slot(k - 1, d - 1)] + 1
                    }
                }
            };
            let mut y = x - k;

            while x < n && y < m && old[x as usize] == new[y as usize] {
                x += 1;
                y += 1;
            }

            row[slot(k, d)] = x;

            if x >= n && y >= m {
                trace.push(row);
                return Some(trace);
            }
            k += 2;
        }

        trace.push(row);
    }

    None
}

fn backtrack(trace: &[Vec<isize>], n: usize, m: usize) -> Vec<Step> {
    let mut x = n as isize;
    let mut y = m as isize;
    let mut steps = Vec::new();

    for d in (0..trace.len()).rev() {
        let d = d as isize;
        let k = x - y;

        let (prev_x, prev_y) = if d == 0 {
            (0, 0)
        } else {
            let prev = &trace[d as usize - 1];
            let prev_k = if k == -d || (k != d && prev[slot(k - 1, d - 1)] < prev[slot(k + 1, d - 1)]) {
                k + 1
            } else {
                k - 1
            };
            let prev_x = prev[slot(prev_k, d - 1)];
            (prev_x, prev_x - prev_k)
        };

        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            steps.push(Step {
                kind: RunKind::Equal,
                old: x as usize,
                new: y as usize,
            });
        }

        if d > 0 {
            if x == prev_x {
                steps.push(Step {
                    kind: RunKind::Insert,
                    old: x as usize,
                    new: prev_y as usize,
                });
            } else {
                steps.push(Step {
                    kind: RunKind::Delete,
                    old: prev_x as usize,
                    new: y as usize,
                });
            }
        }

        x = prev_x;
        y = prev_y;
    }

    steps.reverse();
    steps
}

fn steps_to_runs(steps: &[Step]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();

    for step in steps {
        let (old, new) = match step.kind {
            RunKind::Equal => (step.old..step.old + 1, step.new..step.new + 1),
            RunKind::Delete => (step.old..step.old + 1, step.new..step.new),
            RunKind::Insert => (step.old..step.old, step.new..step.new + 1),
        };

        match runs.last_mut() {
            Some(last) if last.kind == step.kind => {
                last.old.end = old.end;
                last.new.end = new.end;
            }
            _ => runs.push(Run {
                kind: step.kind,
                old,
                new,
            }),
        }
    }

    runs
}

/// Merge neighbouring runs of the same kind and drop empty ones
fn merge_runs(runs: Vec<Run>) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());

    for run in runs.into_iter().filter(|r| !r.is_empty()) {
        match merged.last_mut() {
            Some(last) if last.kind == run.kind => {
                last.old.end = run.old.end;
                last.new.end = run.new.end;
            }
            _ => merged.push(run),
        }
    }

    merged
}
