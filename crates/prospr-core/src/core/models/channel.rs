use std::fmt;

/// Edge length of the square crop the network was trained on.
pub const CROP_SIZE: usize = 64;

pub const DIST_BINS: usize = 10;
pub const ANGLE_BINS: usize = 37;
pub const SS_BINS: usize = 9;
pub const ASA_BINS: usize = 4;

/// Lower bin boundaries of the distance channel, in Ångström.
pub const DIST_BIN_MAP: [f64; DIST_BINS] = [
    0.0, 4.001, 6.001, 8.001, 10.001, 12.001, 14.001, 16.001, 18.001, 20.001,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Pairwise,     // depth x L x L
    ResidueAngle, // depth x L, binned torsion angle
    ResidueClass, // depth x L, categorical per-residue class
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Distance,
    SecondaryStructure,
    Phi,
    Psi,
    SolventAccessibility,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Distance,
        Channel::SecondaryStructure,
        Channel::Phi,
        Channel::Psi,
        Channel::SolventAccessibility,
    ];

    /// Channels with a single residue axis, in the order the model emits them.
    pub const RESIDUE: [Channel; 4] = [
        Channel::SecondaryStructure,
        Channel::Phi,
        Channel::Psi,
        Channel::SolventAccessibility,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Channel::Distance => "dist",
            Channel::SecondaryStructure => "ss",
            Channel::Phi => "phi",
            Channel::Psi => "psi",
            Channel::SolventAccessibility => "asa",
        }
    }

    pub const fn depth(self) -> usize {
        match self {
            Channel::Distance => DIST_BINS,
            Channel::SecondaryStructure => SS_BINS,
            Channel::Phi | Channel::Psi => ANGLE_BINS,
            Channel::SolventAccessibility => ASA_BINS,
        }
    }

    pub const fn shape_kind(self) -> ShapeKind {
        match self {
            Channel::Distance => ShapeKind::Pairwise,
            Channel::Phi | Channel::Psi => ShapeKind::ResidueAngle,
            Channel::SecondaryStructure | Channel::SolventAccessibility => {
                ShapeKind::ResidueClass
            }
        }
    }

    #[inline]
    pub const fn is_pairwise(self) -> bool {
        matches!(self.shape_kind(), ShapeKind::Pairwise)
    }

    /// Full array shape of this channel over a spatial extent of `extent` residues.
    pub fn shape(self, extent: usize) -> Vec<usize> {
        if self.is_pairwise() {
            vec![self.depth(), extent, extent]
        } else {
            vec![self.depth(), extent]
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
