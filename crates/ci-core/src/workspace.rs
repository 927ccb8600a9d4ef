//! Reusable buffers for resampling paired data
//!
//! A bootstrap iteration gathers labels, predictions and (optionally)
//! weights at the same drawn indices; a jackknife iteration copies everything
//! except one position. Both reuse per-thread buffers instead of allocating
//! three vectors per iteration.

use crate::PairedSample;
use std::cell::RefCell;

/// Owned buffers mirroring the columns of a [`PairedSample`]
#[derive(Debug, Default)]
pub struct ResampleWorkspace {
    y_true: Vec<f64>,
    y_pred: Vec<f64>,
    sample_weight: Vec<f64>,
    weighted: bool,
}

impl ResampleWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear(&mut self, capacity: usize, weighted: bool) {
        self.y_true.clear();
        self.y_pred.clear();
        self.sample_weight.clear();
        self.y_true.reserve(capacity);
        self.y_pred.reserve(capacity);
        if weighted {
            self.sample_weight.reserve(capacity);
        }
        self.weighted = weighted;
    }

    /// Gather every column of `source` at `indices`
    ///
    /// The same index is applied to all columns, so label/prediction/weight
    /// rows are never split apart.
    pub fn gather(&mut self, source: &PairedSample<'_>, indices: &[usize]) {
        self.clear(indices.len(), source.sample_weight.is_some());
        for &idx in indices {
            debug_assert!(idx < source.len(), "Index {idx} out of bounds");
            self.y_true.push(source.y_true[idx]);
            self.y_pred.push(source.y_pred[idx]);
        }
        if let Some(w) = source.sample_weight {
            self.sample_weight.extend(indices.iter().map(|&idx| w[idx]));
        }
    }

    /// Copy every row of `source` except row `skip`
    pub fn leave_one_out(&mut self, source: &PairedSample<'_>, skip: usize) {
        let n = source.len();
        self.clear(n.saturating_sub(1), source.sample_weight.is_some());
        let keep = |i: &usize| *i != skip;
        self.y_true
            .extend((0..n).filter(keep).map(|i| source.y_true[i]));
        self.y_pred
            .extend((0..n).filter(keep).map(|i| source.y_pred[i]));
        if let Some(w) = source.sample_weight {
            self.sample_weight.extend((0..n).filter(keep).map(|i| w[i]));
        }
    }

    /// Borrow the current contents as a paired sample
    pub fn view(&self) -> PairedSample<'_> {
        let weights = self.weighted.then_some(self.sample_weight.as_slice());
        PairedSample::from_parts(&self.y_true, &self.y_pred, weights)
    }
}

thread_local! {
    static WORKSPACE: RefCell<ResampleWorkspace> = RefCell::new(ResampleWorkspace::new());
}

/// Run `f` with this thread's resample workspace
///
/// The buffers are moved out of the thread-local slot while `f` runs and
/// returned afterwards, so a metric may itself resample (or run Rayon work
/// that lands on this thread) without contending for the same buffers.
/// A nested call starts from empty buffers.
pub fn with_resample_workspace<F, R>(f: F) -> R
where
    F: FnOnce(&mut ResampleWorkspace) -> R,
{
    let mut ws = WORKSPACE.with(RefCell::take);
    let result = f(&mut ws);
    WORKSPACE.with(|slot| *slot.borrow_mut() = ws);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_preserves_pairing() {
        let y_true = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y_pred = [10.0, 11.0, 12.0, 13.0, 14.0];
        let weights = [0.5, 1.5, 2.5, 3.5, 4.5];
        let sample = PairedSample::new(&y_true, &y_pred)
            .unwrap()
            .with_weights(Some(&weights[..]))
            .unwrap();

        let mut ws = ResampleWorkspace::new();
        ws.gather(&sample, &[4, 2, 2, 0, 1]);
        let view = ws.view();

        assert_eq!(view.y_true, &[4.0, 2.0, 2.0, 0.0, 1.0]);
        assert_eq!(view.y_pred, &[14.0, 12.0, 12.0, 10.0, 11.0]);
        assert_eq!(view.sample_weight, Some(&[4.5, 2.5, 2.5, 0.5, 1.5][..]));
    }

    #[test]
    fn test_leave_one_out() {
        let sample = PairedSample::new(&[0.0, 1.0, 2.0], &[5.0, 6.0, 7.0]).unwrap();
        let mut ws = ResampleWorkspace::new();

        ws.leave_one_out(&sample, 1);
        let view = ws.view();
        assert_eq!(view.y_true, &[0.0, 2.0]);
        assert_eq!(view.y_pred, &[5.0, 7.0]);
        assert!(view.sample_weight.is_none());
    }

    #[test]
    fn test_nested_use_does_not_clobber_outer_buffers() {
        let outer = PairedSample::new(&[0.0, 1.0, 2.0], &[3.0, 4.0, 5.0]).unwrap();
        let inner = PairedSample::new(&[9.0], &[8.0]).unwrap();

        with_resample_workspace(|ws| {
            ws.gather(&outer, &[2, 0]);
            let nested = with_resample_workspace(|inner_ws| {
                inner_ws.gather(&inner, &[0, 0]);
                inner_ws.view().y_true.to_vec()
            });
            assert_eq!(nested, vec![9.0, 9.0]);
            assert_eq!(ws.view().y_true, &[2.0, 0.0]);
            assert_eq!(ws.view().y_pred, &[5.0, 3.0]);
        });
    }

    #[test]
    fn test_weights_do_not_leak_between_uses() {
        let weighted = PairedSample::new(&[0.0, 1.0], &[0.0, 1.0])
            .unwrap()
            .with_weights(Some(&[1.0, 1.0][..]))
            .unwrap();
        let plain = PairedSample::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();

        with_resample_workspace(|ws| {
            ws.gather(&weighted, &[0, 1]);
            assert!(ws.view().sample_weight.is_some());
            ws.gather(&plain, &[1, 1]);
            assert!(ws.view().sample_weight.is_none());
        });
    }
}
