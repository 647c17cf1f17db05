//! Problem settings, material parameters and the immutable evaluation context.
use eyre::{eyre, WrapErr};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Named scalar material parameters (mobility, moduli, gradient-energy coefficients, ...).
///
/// Populated once during problem setup and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialParameters {
    values: BTreeMap<String, f64>,
}

impl MaterialParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> eyre::Result<f64> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| eyre!("material parameter \"{}\" is not defined", name))
    }

    /// Returns the parameter, or `default` if it was never set.
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        match self.values.get(name) {
            Some(&value) => value,
            None => {
                warn!("Material parameter \"{}\" not defined, using {}", name, default);
                default
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Overwrites parameters with those in `other`.
    pub fn extend_from(&mut self, other: &MaterialParameters) {
        for (name, &value) in &other.values {
            self.values.insert(name.clone(), value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, &value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Discretization, time stepping and field declarations of a problem.
///
/// Lengths of the per-axis vectors (`num_elements`, `lengths`, `periodic`) must equal `dim`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemSettings {
    pub dim: usize,
    /// Number of elements along each axis.
    pub num_elements: Vec<usize>,
    /// Domain extent along each axis.
    pub lengths: Vec<f64>,
    pub periodic: Vec<bool>,
    /// Polynomial degree of the spline basis.
    pub poly_order: usize,
    /// Global continuity of the spline basis, must be below `poly_order`.
    pub global_continuity: usize,
    /// Initial time (or load) step.
    pub dt: f64,
    pub total_time: f64,
    pub restart_iteration: usize,
    pub restart_time: f64,
    /// Write output every `skip_output` steps.
    pub skip_output: usize,
    /// Magnitude of the prescribed Dirichlet displacement.
    pub u_dirichlet: f64,
    pub scalar_solution_fields: Vec<String>,
    pub vector_solution_fields: Vec<String>,
    pub scalar_projection_fields: Vec<String>,
    pub vector_projection_fields: Vec<String>,
    pub material: MaterialParameters,
}

impl Default for ProblemSettings {
    fn default() -> Self {
        Self {
            dim: 2,
            num_elements: vec![10, 10],
            lengths: vec![1.0, 1.0],
            periodic: vec![false, false],
            poly_order: 1,
            global_continuity: 0,
            dt: 1.0,
            total_time: 1.0,
            restart_iteration: 0,
            restart_time: 0.0,
            skip_output: 1,
            u_dirichlet: 0.0,
            scalar_solution_fields: Vec::new(),
            vector_solution_fields: Vec::new(),
            scalar_projection_fields: Vec::new(),
            vector_projection_fields: Vec::new(),
            material: MaterialParameters::default(),
        }
    }
}

impl ProblemSettings {
    /// Parses settings from a JSON document. Missing keys take their default values.
    pub fn from_json_str(json: &str) -> eyre::Result<Self> {
        let settings: Self = serde_json::from_str(json).wrap_err("failed to parse problem settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read problem settings from {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Applies the entries of a JSON document on top of these settings.
    ///
    /// Only keys present in `json` are replaced. Material parameters are merged name by name,
    /// so a document may override a single modulus and keep all other defaults of the problem.
    pub fn with_json_overrides(&self, json: &str) -> eyre::Result<Self> {
        let overrides: serde_json::Value = serde_json::from_str(json).wrap_err("failed to parse settings overrides")?;
        let mut merged = serde_json::to_value(self).wrap_err("failed to serialize problem settings")?;
        merge_json(&mut merged, overrides);
        let settings: Self = serde_json::from_value(merged).wrap_err("invalid settings overrides")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> eyre::Result<()> {
        if !(1..=3).contains(&self.dim) {
            return Err(eyre!("spatial dimension must be 1, 2 or 3, got {}", self.dim));
        }
        for (name, len) in [
            ("num_elements", self.num_elements.len()),
            ("lengths", self.lengths.len()),
            ("periodic", self.periodic.len()),
        ] {
            if len != self.dim {
                return Err(eyre!("{} has {} entries but the dimension is {}", name, len, self.dim));
            }
        }
        if self.global_continuity >= self.poly_order {
            return Err(eyre!(
                "global continuity ({}) must be less than the polynomial order ({})",
                self.global_continuity,
                self.poly_order
            ));
        }
        if !(self.dt > 0.0) {
            return Err(eyre!("time step must be positive, got {}", self.dt));
        }
        if self.lengths.iter().any(|&l| !(l > 0.0)) {
            return Err(eyre!("domain lengths must be positive, got {:?}", self.lengths));
        }
        Ok(())
    }

    /// Number of degrees of freedom per spline basis function.
    pub fn dofs_per_node(&self) -> usize {
        self.scalar_solution_fields.len() + self.dim * self.vector_solution_fields.len()
    }
}

fn merge_json(target: &mut serde_json::Value, overrides: serde_json::Value) {
    match (target, overrides) {
        (serde_json::Value::Object(target), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                match target.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, overrides) => *target = overrides,
    }
}

/// The read-only state passed into every kernel and problem callback.
///
/// Replaces a global mutable application context: the driver creates a new context for every
/// time step through [`ProblemContext::at_step`] instead of mutating a shared one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemContext {
    pub settings: ProblemSettings,
    /// Current simulation time (or load parameter).
    pub time: f64,
    /// Current time step.
    pub dt: f64,
    pub step: usize,
}

impl ProblemContext {
    pub fn new(settings: ProblemSettings) -> Self {
        let dt = settings.dt;
        let time = settings.restart_time;
        let step = settings.restart_iteration;
        Self {
            settings,
            time,
            dt,
            step,
        }
    }

    /// A context for a later step. The settings are shared unchanged.
    pub fn at_step(&self, step: usize, time: f64, dt: f64) -> Self {
        Self {
            settings: self.settings.clone(),
            time,
            dt,
            step,
        }
    }

    pub fn material(&self) -> &MaterialParameters {
        &self.settings.material
    }

    pub fn dim(&self) -> usize {
        self.settings.dim
    }
}
