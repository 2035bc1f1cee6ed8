use super::channel::Channel;
use ndarray::{Array2, Array3, ArrayViewD, ArrayViewMutD};
use std::ops::{AddAssign, MulAssign};

/// A model output whose shape disagrees with the channel contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub channel: Channel,
    pub expected: Vec<usize>,
    pub found: Vec<usize>,
}

/// Per-residue channels along a single residue axis, each `depth x n`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueMaps {
    pub secondary_structure: Array2<f64>,
    pub phi: Array2<f64>,
    pub psi: Array2<f64>,
    pub solvent_accessibility: Array2<f64>,
}

/// The model's output for a single window.
///
/// `row` is the per-residue view along the window's i axis, `col` along its j axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CropPrediction {
    pub distance: Array3<f64>,
    pub row: ResidueMaps,
    pub col: ResidueMaps,
}

/// Whole-domain arrays, one field per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionMaps {
    pub distance: Array3<f64>,
    pub secondary_structure: Array2<f64>,
    pub phi: Array2<f64>,
    pub psi: Array2<f64>,
    pub solvent_accessibility: Array2<f64>,
}

impl ResidueMaps {
    pub fn from_elem(extent: usize, value: f64) -> Self {
        let make = |channel: Channel| Array2::from_elem((channel.depth(), extent), value);
        Self {
            secondary_structure: make(Channel::SecondaryStructure),
            phi: make(Channel::Phi),
            psi: make(Channel::Psi),
            solvent_accessibility: make(Channel::SolventAccessibility),
        }
    }

    pub fn zeros(extent: usize) -> Self {
        Self::from_elem(extent, 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &Array2<f64>)> {
        [
            (Channel::SecondaryStructure, &self.secondary_structure),
            (Channel::Phi, &self.phi),
            (Channel::Psi, &self.psi),
            (Channel::SolventAccessibility, &self.solvent_accessibility),
        ]
        .into_iter()
    }

    fn check_shapes(&self, extent: usize) -> Result<(), ShapeMismatch> {
        for (channel, array) in self.iter() {
            check_shape(channel, array.shape(), &channel.shape(extent))?;
        }
        Ok(())
    }
}

impl CropPrediction {
    /// A prediction holding `value` in every bin of every channel.
    pub fn from_elem(window_size: usize, value: f64) -> Self {
        Self {
            distance: Array3::from_elem(
                (Channel::Distance.depth(), window_size, window_size),
                value,
            ),
            row: ResidueMaps::from_elem(window_size, value),
            col: ResidueMaps::from_elem(window_size, value),
        }
    }

    /// Verifies every channel has its declared depth and the full window extent.
    pub fn check_shapes(&self, window_size: usize) -> Result<(), ShapeMismatch> {
        check_shape(
            Channel::Distance,
            self.distance.shape(),
            &Channel::Distance.shape(window_size),
        )?;
        self.row.check_shapes(window_size)?;
        self.col.check_shapes(window_size)
    }
}

impl PredictionMaps {
    pub fn zeros(length: usize) -> Self {
        let residues = ResidueMaps::zeros(length);
        Self {
            distance: Array3::zeros((Channel::Distance.depth(), length, length)),
            secondary_structure: residues.secondary_structure,
            phi: residues.phi,
            psi: residues.psi,
            solvent_accessibility: residues.solvent_accessibility,
        }
    }

    /// Number of residues the maps span.
    pub fn length(&self) -> usize {
        self.distance.shape()[1]
    }

    pub fn view(&self, channel: Channel) -> ArrayViewD<'_, f64> {
        match channel {
            Channel::Distance => self.distance.view().into_dyn(),
            Channel::SecondaryStructure => self.secondary_structure.view().into_dyn(),
            Channel::Phi => self.phi.view().into_dyn(),
            Channel::Psi => self.psi.view().into_dyn(),
            Channel::SolventAccessibility => self.solvent_accessibility.view().into_dyn(),
        }
    }

    pub fn view_mut(&mut self, channel: Channel) -> ArrayViewMutD<'_, f64> {
        match channel {
            Channel::Distance => self.distance.view_mut().into_dyn(),
            Channel::SecondaryStructure => self.secondary_structure.view_mut().into_dyn(),
            Channel::Phi => self.phi.view_mut().into_dyn(),
            Channel::Psi => self.psi.view_mut().into_dyn(),
            Channel::SolventAccessibility => self.solvent_accessibility.view_mut().into_dyn(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, ArrayViewD<'_, f64>)> {
        Channel::ALL
            .into_iter()
            .map(move |channel| (channel, self.view(channel)))
    }
}

impl AddAssign<&PredictionMaps> for PredictionMaps {
    fn add_assign(&mut self, rhs: &PredictionMaps) {
        self.distance += &rhs.distance;
        self.secondary_structure += &rhs.secondary_structure;
        self.phi += &rhs.phi;
        self.psi += &rhs.psi;
        self.solvent_accessibility += &rhs.solvent_accessibility;
    }
}

impl MulAssign<f64> for PredictionMaps {
    fn mul_assign(&mut self, rhs: f64) {
        self.distance *= rhs;
        self.secondary_structure *= rhs;
        self.phi *= rhs;
        self.psi *= rhs;
        self.solvent_accessibility *= rhs;
    }
}

fn check_shape(channel: Channel, found: &[usize], expected: &[usize]) -> Result<(), ShapeMismatch> {
    if found == expected {
        Ok(())
    } else {
        Err(ShapeMismatch {
            channel,
            expected: expected.to_vec(),
            found: found.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::channel::{ANGLE_BINS, DIST_BINS};

    #[test]
    fn crop_prediction_from_elem_satisfies_contract() {
        let prediction = CropPrediction::from_elem(16, 1.5);
        assert!(prediction.check_shapes(16).is_ok());
        assert_eq!(prediction.distance.shape(), &[DIST_BINS, 16, 16]);
        assert!(prediction.col.phi.iter().all(|&v| v == 1.5));
    }

    #[test]
    fn check_shapes_reports_first_mismatching_channel() {
        let mut prediction = CropPrediction::from_elem(16, 0.0);
        prediction.col.psi = Array2::zeros((ANGLE_BINS - 1, 16));

        let mismatch = prediction.check_shapes(16).unwrap_err();
        assert_eq!(mismatch.channel, Channel::Psi);
        assert_eq!(mismatch.expected, vec![ANGLE_BINS, 16]);
        assert_eq!(mismatch.found, vec![ANGLE_BINS - 1, 16]);
    }

    #[test]
    fn check_shapes_rejects_wrong_window_extent() {
        let prediction = CropPrediction::from_elem(16, 0.0);
        let mismatch = prediction.check_shapes(32).unwrap_err();
        assert_eq!(mismatch.channel, Channel::Distance);
    }

    #[test]
    fn residue_maps_iterate_residue_channels_in_model_order() {
        let maps = ResidueMaps::zeros(4);
        let channels: Vec<Channel> = maps.iter().map(|(c, _)| c).collect();
        assert_eq!(channels, Channel::RESIDUE.to_vec());
        for (channel, array) in maps.iter() {
            assert_eq!(array.shape(), channel.shape(4).as_slice());
        }
    }

    #[test]
    fn prediction_maps_views_have_channel_shapes() {
        let maps = PredictionMaps::zeros(7);
        assert_eq!(maps.length(), 7);
        for (channel, view) in maps.iter() {
            assert_eq!(view.shape(), channel.shape(7).as_slice());
        }
    }

    #[test]
    fn add_assign_and_mul_assign_act_on_every_channel() {
        let mut total = PredictionMaps::zeros(3);
        let mut other = PredictionMaps::zeros(3);
        for channel in Channel::ALL {
            other.view_mut(channel).fill(2.0);
        }

        total += &other;
        total += &other;
        total *= 0.25;

        for (_, view) in total.iter() {
            assert!(view.iter().all(|&v| (v - 1.0).abs() < 1e-12));
        }
    }
}
