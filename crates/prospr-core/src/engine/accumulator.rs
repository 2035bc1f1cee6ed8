use super::config::WindowNormalization;
use super::error::EngineError;
use crate::core::assembly::mask::WeightMask;
use crate::core::assembly::trim::WindowTrim;
use crate::core::models::channel::Channel;
use crate::core::models::prediction::{CropPrediction, PredictionMaps};
use crate::core::models::window::{Window, WindowAxis};
use crate::core::utils::numeric::standardize;
use ndarray::{Array, ArrayD, ArrayViewD, AxisDescription, Dimension, IxDyn, Slice, Zip};
use tracing::trace;

/// Weighted running sum for one channel, with the matching weight totals.
///
/// Both arrays share the channel's full `depth x L [x L]` shape; spatial weights are
/// broadcast over depth when merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelBuffer {
    sum: ArrayD<f64>,
    weight_total: ArrayD<f64>,
}

impl ChannelBuffer {
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            sum: ArrayD::zeros(IxDyn(shape)),
            weight_total: ArrayD::zeros(IxDyn(shape)),
        }
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.sum.shape()
    }

    #[inline]
    pub fn sum(&self) -> ArrayViewD<'_, f64> {
        self.sum.view()
    }

    #[inline]
    pub fn weight_total(&self) -> ArrayViewD<'_, f64> {
        self.weight_total.view()
    }

    /// Adds `values * weight` into the region starting at `place_at` and `weight` into
    /// the weight totals.
    ///
    /// `values` is `depth x extent...`; `weight` carries only the spatial extent and
    /// `place_at` one start per spatial axis.
    pub fn add(
        &mut self,
        values: ArrayViewD<'_, f64>,
        weight: ArrayViewD<'_, f64>,
        place_at: &[usize],
    ) -> Result<(), EngineError> {
        if values.ndim() != self.sum.ndim() || values.shape()[0] != self.sum.shape()[0] {
            return Err(EngineError::Internal(format!(
                "cannot merge values of shape {:?} into a buffer of shape {:?}",
                values.shape(),
                self.sum.shape()
            )));
        }
        if weight.shape() != &values.shape()[1..] {
            return Err(EngineError::Internal(format!(
                "weight shape {:?} does not match the spatial shape of values {:?}",
                weight.shape(),
                values.shape()
            )));
        }
        self.add_weight(weight.view(), place_at)?;

        let broadcast_weight = weight.broadcast(values.raw_dim()).ok_or_else(|| {
            EngineError::Internal(format!(
                "weight of shape {:?} cannot broadcast to {:?}",
                weight.shape(),
                values.shape()
            ))
        })?;
        let extent = &values.shape()[1..];
        let region = self
            .sum
            .slice_each_axis_mut(|ax| placement(ax, place_at, extent));
        Zip::from(region)
            .and(&values)
            .and(&broadcast_weight)
            .for_each(|s, &v, &w| *s += v * w);
        Ok(())
    }

    /// Adds `weight` into the weight totals only.
    pub fn add_weight(
        &mut self,
        weight: ArrayViewD<'_, f64>,
        place_at: &[usize],
    ) -> Result<(), EngineError> {
        let spatial = &self.weight_total.shape()[1..];
        let fits = weight.ndim() == spatial.len()
            && place_at.len() == spatial.len()
            && place_at
                .iter()
                .zip(weight.shape())
                .zip(spatial)
                .all(|((&start, &len), &bound)| start + len <= bound);
        if !fits {
            return Err(EngineError::Internal(format!(
                "weight of shape {:?} placed at {:?} does not fit a buffer of shape {:?}",
                weight.shape(),
                place_at,
                self.weight_total.shape()
            )));
        }

        let broadcast_shape: Vec<usize> = std::iter::once(self.weight_total.shape()[0])
            .chain(weight.shape().iter().copied())
            .collect();
        let broadcast_weight = weight.broadcast(IxDyn(&broadcast_shape)).ok_or_else(|| {
            EngineError::Internal(format!(
                "weight of shape {:?} cannot broadcast over depth",
                weight.shape()
            ))
        })?;
        let extent = weight.shape();
        let region = self
            .weight_total
            .slice_each_axis_mut(|ax| placement(ax, place_at, extent));
        Zip::from(region)
            .and(&broadcast_weight)
            .for_each(|t, &w| *t += w);
        Ok(())
    }

    /// Number of entries whose weight total is still zero.
    pub fn uncovered(&self) -> usize {
        self.weight_total.iter().filter(|&&w| w <= 0.0).count()
    }

    /// Divides the weighted sum by the weight totals.
    pub fn finalize(self, channel: Channel) -> Result<ArrayD<f64>, EngineError> {
        let count = self.uncovered();
        if count > 0 {
            return Err(EngineError::UncoveredPositions { channel, count });
        }
        let Self { sum, weight_total } = self;
        Ok(sum / &weight_total)
    }
}

fn placement(ax: AxisDescription, place_at: &[usize], extent: &[usize]) -> Slice {
    match ax.axis.index() {
        0 => Slice::from(..),
        k => Slice::from(place_at[k - 1]..place_at[k - 1] + extent[k - 1]),
    }
}

/// Whole-domain accumulation buffers for every channel of one assembly pass.
#[derive(Debug, Clone)]
pub struct Accumulator {
    length: usize,
    normalization: WindowNormalization,
    distance: ChannelBuffer,
    secondary_structure: ChannelBuffer,
    phi: ChannelBuffer,
    psi: ChannelBuffer,
    solvent_accessibility: ChannelBuffer,
    merged_windows: usize,
}

impl Accumulator {
    pub fn new(length: usize, normalization: WindowNormalization) -> Self {
        let buffer = |channel: Channel| ChannelBuffer::zeros(&channel.shape(length));
        Self {
            length,
            normalization,
            distance: buffer(Channel::Distance),
            secondary_structure: buffer(Channel::SecondaryStructure),
            phi: buffer(Channel::Phi),
            psi: buffer(Channel::Psi),
            solvent_accessibility: buffer(Channel::SolventAccessibility),
            merged_windows: 0,
        }
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn merged_windows(&self) -> usize {
        self.merged_windows
    }

    pub fn buffer(&self, channel: Channel) -> &ChannelBuffer {
        match channel {
            Channel::Distance => &self.distance,
            Channel::SecondaryStructure => &self.secondary_structure,
            Channel::Phi => &self.phi,
            Channel::Psi => &self.psi,
            Channel::SolventAccessibility => &self.solvent_accessibility,
        }
    }

    fn buffer_mut(&mut self, channel: Channel) -> &mut ChannelBuffer {
        match channel {
            Channel::Distance => &mut self.distance,
            Channel::SecondaryStructure => &mut self.secondary_structure,
            Channel::Phi => &mut self.phi,
            Channel::Psi => &mut self.psi,
            Channel::SolventAccessibility => &mut self.solvent_accessibility,
        }
    }

    /// Merges one already-trimmed window region of `channel`.
    ///
    /// With [`WindowNormalization::Standardize`] the region is standardized before it is
    /// weighted.
    pub fn merge(
        &mut self,
        channel: Channel,
        prediction: ArrayViewD<'_, f64>,
        weight: ArrayViewD<'_, f64>,
        place_at: &[usize],
    ) -> Result<(), EngineError> {
        match self.normalization {
            WindowNormalization::Standardize => {
                let mut values = prediction.to_owned();
                if !standardize(&mut values) {
                    trace!(%channel, "Window region has no spread; centered only.");
                }
                self.buffer_mut(channel).add(values.view(), weight, place_at)
            }
            WindowNormalization::Disabled => {
                self.buffer_mut(channel).add(prediction, weight, place_at)
            }
        }
    }

    /// Trims every channel of `prediction` to the domain and merges it with the matching
    /// cut of `mask`.
    pub fn merge_window(
        &mut self,
        window: &Window,
        prediction: &CropPrediction,
        mask: &WeightMask,
    ) -> Result<(), EngineError> {
        prediction.check_shapes(window.size)?;
        if mask.full().dim() != (window.size, window.size) {
            return Err(EngineError::Internal(format!(
                "mask of shape {:?} cannot weight a window of size {}",
                mask.full().shape(),
                window.size
            )));
        }

        let trim = WindowTrim::for_window(window, self.length);
        self.merge(
            Channel::Distance,
            trim.pairwise(prediction.distance.view()).into_dyn(),
            trim.mask(mask.full()).into_dyn(),
            &[trim.row.place_at, trim.col.place_at],
        )?;

        for (axis, residues) in [
            (WindowAxis::Row, &prediction.row),
            (WindowAxis::Column, &prediction.col),
        ] {
            let weight = trim.profile(axis, mask.profile(axis)).into_dyn();
            let place_at = [trim.axis(axis).place_at];
            for (channel, values) in residues.iter() {
                self.merge(
                    channel,
                    trim.residue(axis, values.view()).into_dyn(),
                    weight.clone(),
                    &place_at,
                )?;
            }
        }

        self.merged_windows += 1;
        Ok(())
    }

    /// Divides every channel's sum by its weight totals.
    ///
    /// Fails with [`EngineError::UncoveredPositions`] if any position never received
    /// weight.
    pub fn finalize(self) -> Result<PredictionMaps, EngineError> {
        Ok(PredictionMaps {
            distance: fixed(Channel::Distance, self.distance.finalize(Channel::Distance)?)?,
            secondary_structure: fixed(
                Channel::SecondaryStructure,
                self.secondary_structure
                    .finalize(Channel::SecondaryStructure)?,
            )?,
            phi: fixed(Channel::Phi, self.phi.finalize(Channel::Phi)?)?,
            psi: fixed(Channel::Psi, self.psi.finalize(Channel::Psi)?)?,
            solvent_accessibility: fixed(
                Channel::SolventAccessibility,
                self.solvent_accessibility
                    .finalize(Channel::SolventAccessibility)?,
            )?,
        })
    }
}

fn fixed<D: Dimension>(channel: Channel, array: ArrayD<f64>) -> Result<Array<f64, D>, EngineError> {
    array.into_dimensionality::<D>().map_err(|e| {
        EngineError::Internal(format!("buffer for channel '{channel}' has the wrong rank: {e}"))
    })
}
