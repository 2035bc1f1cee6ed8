use ndarray::{Array, ArrayViewMut, Axis, Dimension};

/// Rescales `values` to zero mean and unit (population) variance, in place.
///
/// A window whose values are all equal has no spread to divide out; it is only centered.
/// Returns `false` in that case.
pub fn standardize<D: Dimension>(values: &mut Array<f64, D>) -> bool {
    let Some(mean) = values.mean() else {
        return false;
    };
    let std = values.std(0.0);
    if std > f64::EPSILON {
        values.mapv_inplace(|v| (v - mean) / std);
        true
    } else {
        values.mapv_inplace(|v| v - mean);
        false
    }
}

/// Softmax along axis 0 (the channel depth) independently at every spatial position.
pub fn softmax_depth<D: Dimension>(mut values: ArrayViewMut<'_, f64, D>) {
    for mut lane in values.lanes_mut(Axis(0)) {
        let max = lane.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        lane.mapv_inplace(|v| (v - max).exp());
        let total = lane.sum();
        lane.mapv_inplace(|v| v / total);
    }
}
