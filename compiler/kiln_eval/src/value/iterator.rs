//! The iterator protocol shared by ranges and `for` loops.

use super::Value;

/// One step of an iterator.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Done,
    Yield(Value),
}

/// Anything a `for` loop can drive.
pub trait ValueIterator {
    fn next_step(&mut self) -> Step;
}

/// Numeric range stepping by +1 or -1 toward `end`.
///
/// Ascends when `start <= end`, descends otherwise. An exclusive range
/// stops before reaching `end`; an inclusive one yields `end` last.
#[derive(Clone, Debug)]
pub struct RangeIter {
    next: f64,
    end: f64,
    step: f64,
    inclusive: bool,
    done: bool,
}

impl RangeIter {
    pub fn new(start: f64, end: f64, inclusive: bool) -> Self {
        RangeIter {
            next: start,
            end,
            step: if start <= end { 1.0 } else { -1.0 },
            inclusive,
            done: start.is_nan() || end.is_nan(),
        }
    }

    pub fn exclusive(start: f64, end: f64) -> Self {
        Self::new(start, end, false)
    }

    pub fn inclusive(start: f64, end: f64) -> Self {
        Self::new(start, end, true)
    }

    fn past_end(&self, value: f64) -> bool {
        match (self.step > 0.0, self.inclusive) {
            (true, true) => value > self.end,
            (true, false) => value >= self.end,
            (false, true) => value < self.end,
            (false, false) => value <= self.end,
        }
    }
}

impl ValueIterator for RangeIter {
    fn next_step(&mut self) -> Step {
        if self.done || self.past_end(self.next) {
            self.done = true;
            return Step::Done;
        }
        let current = self.next;
        self.next += self.step;
        Step::Yield(Value::Number(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drain(mut iter: RangeIter) -> Vec<f64> {
        let mut out = Vec::new();
        while let Step::Yield(value) = iter.next_step() {
            out.extend(value.as_number());
        }
        out
    }

    #[test]
    fn exclusive_ascending() {
        assert_eq!(drain(RangeIter::exclusive(1.0, 4.0)), vec![1.0, 2.0, 3.0]);
        assert_eq!(drain(RangeIter::exclusive(3.0, 3.0)), Vec::<f64>::new());
    }

    #[test]
    fn inclusive_ascending() {
        assert_eq!(
            drain(RangeIter::inclusive(1.0, 4.0)),
            vec![1.0, 2.0, 3.0, 4.0]
        );
        assert_eq!(drain(RangeIter::inclusive(3.0, 3.0)), vec![3.0]);
    }

    #[test]
    fn descending() {
        assert_eq!(drain(RangeIter::exclusive(3.0, 0.0)), vec![3.0, 2.0, 1.0]);
        assert_eq!(
            drain(RangeIter::inclusive(3.0, 0.0)),
            vec![3.0, 2.0, 1.0, 0.0]
        );
    }

    #[test]
    fn stays_done() {
        let mut iter = RangeIter::exclusive(0.0, 1.0);
        assert_eq!(iter.next_step(), Step::Yield(Value::Number(0.0)));
        assert_eq!(iter.next_step(), Step::Done);
        assert_eq!(iter.next_step(), Step::Done);
    }

    #[test]
    fn nan_bounds_are_empty() {
        assert_eq!(drain(RangeIter::exclusive(f64::NAN, 3.0)), Vec::<f64>::new());
    }
}
