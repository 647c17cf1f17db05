//! Registry of uniform Dirichlet values on the sides of a box-shaped domain.
use log::debug;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// One of the two sides of the domain along an axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    /// The side at the lower end of the axis (`X_axis = 0`).
    Lower,
    /// The side at the upper end of the axis (`X_axis = L_axis`).
    Upper,
}

impl Side {
    pub fn index(&self) -> usize {
        match self {
            Side::Lower => 0,
            Side::Upper => 1,
        }
    }
}

impl TryFrom<usize> for Side {
    type Error = BoundaryConditionError;

    fn try_from(side: usize) -> Result<Self, Self::Error> {
        match side {
            0 => Ok(Side::Lower),
            1 => Ok(Side::Upper),
            _ => Err(BoundaryConditionError::InvalidSide(side)),
        }
    }
}

/// Identifies a constrained degree of freedom on one side of the domain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirichletKey {
    pub axis: usize,
    pub side: Side,
    pub dof: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryConditionError {
    /// The axis is not smaller than the spatial dimension.
    InvalidAxis { axis: usize, dim: usize },
    /// Only sides 0 and 1 exist.
    InvalidSide(usize),
    /// The degree of freedom is not smaller than the number of degrees of freedom per node.
    InvalidDof { dof: usize, dofs_per_node: usize },
}

impl Display for BoundaryConditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            &BoundaryConditionError::InvalidAxis { axis, dim } => {
                write!(f, "Invalid axis {} for a {}-dimensional domain.", axis, dim)
            }
            &BoundaryConditionError::InvalidSide(side) => {
                write!(f, "Invalid side {}, must be 0 or 1.", side)
            }
            &BoundaryConditionError::InvalidDof { dof, dofs_per_node } => {
                write!(f, "Invalid dof {}, there are {} dofs per node.", dof, dofs_per_node)
            }
        }
    }
}

impl Error for BoundaryConditionError {}

/// Uniform Dirichlet values per (axis, side, dof).
///
/// Setting a value for a key that is already constrained overwrites it, so re-applying the same
/// conditions yields the same registry.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryConditions {
    dim: usize,
    dofs_per_node: usize,
    values: BTreeMap<DirichletKey, f64>,
}

impl BoundaryConditions {
    pub fn new(dim: usize, dofs_per_node: usize) -> Self {
        Self {
            dim,
            dofs_per_node,
            values: BTreeMap::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn dofs_per_node(&self) -> usize {
        self.dofs_per_node
    }

    fn key(&self, axis: usize, side: usize, dof: usize) -> Result<DirichletKey, BoundaryConditionError> {
        if axis >= self.dim {
            return Err(BoundaryConditionError::InvalidAxis { axis, dim: self.dim });
        }
        let side = Side::try_from(side)?;
        if dof >= self.dofs_per_node {
            return Err(BoundaryConditionError::InvalidDof {
                dof,
                dofs_per_node: self.dofs_per_node,
            });
        }
        Ok(DirichletKey { axis, side, dof })
    }

    /// Prescribes `value` for `dof` on every node of the given side.
    pub fn set_boundary_value(
        &mut self,
        axis: usize,
        side: usize,
        dof: usize,
        value: f64,
    ) -> Result<(), BoundaryConditionError> {
        let key = self.key(axis, side, dof)?;
        debug!("Dirichlet value {} on axis {}, side {:?}, dof {}", value, axis, key.side, dof);
        self.values.insert(key, value);
        Ok(())
    }

    /// The prescribed value, if the dof is constrained on that side.
    pub fn boundary_value(&self, axis: usize, side: usize, dof: usize) -> Result<Option<f64>, BoundaryConditionError> {
        let key = self.key(axis, side, dof)?;
        Ok(self.values.get(&key).copied())
    }

    /// Iterates over all constraints, ordered by axis, side and dof.
    pub fn iter(&self) -> impl Iterator<Item = (DirichletKey, f64)> + '_ {
        self.values.iter().map(|(&key, &value)| (key, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
