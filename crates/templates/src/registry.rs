use crate::error::TemplateError;
use crate::grids;
use crate::spec::{all_specs, TemplateSpec};
use core_types::TemplateId;
use serde_json::Value;
use std::collections::BTreeMap;

/// The template universe: metadata and parameter grids for every template.
///
/// Constructed once at application start and passed by reference into the
/// components that need it. There is no module-global registry; anything
/// that answers template queries holds one of these explicitly.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    specs: Vec<TemplateSpec>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self { specs: all_specs() }
    }

    /// Every template spec, in stable declaration order.
    pub fn all(&self) -> &[TemplateSpec] {
        &self.specs
    }

    /// Every template id, in stable declaration order.
    pub fn ids(&self) -> impl Iterator<Item = TemplateId> + '_ {
        self.specs.iter().map(|s| s.id)
    }

    /// Metadata for one template. Total over `TemplateId` by construction.
    pub fn spec(&self, id: TemplateId) -> &TemplateSpec {
        self.specs
            .iter()
            .find(|s| s.id == id)
            .expect("registry contains every TemplateId variant")
    }

    /// The default parameter grid for a template.
    ///
    /// Fails if the grid table declares an empty candidate list, which would
    /// leave a parameter without a representative default.
    pub fn parameter_grid(
        &self,
        id: TemplateId,
    ) -> Result<BTreeMap<String, Vec<f64>>, TemplateError> {
        let grid = grids::parameter_grid(id);
        for (name, values) in &grid {
            if values.is_empty() {
                return Err(TemplateError::EmptyGrid {
                    template: id.to_string(),
                    parameter: name.clone(),
                });
            }
        }
        Ok(grid)
    }

    /// The representative default for each parameter: the midpoint element of
    /// its candidate list. Integer-valued defaults are emitted as JSON
    /// integers so rendered parameter lists stay clean.
    pub fn default_parameters(
        &self,
        id: TemplateId,
    ) -> Result<BTreeMap<String, Value>, TemplateError> {
        let grid = self.parameter_grid(id)?;
        Ok(grid
            .into_iter()
            .map(|(name, values)| {
                let mid = values[values.len() / 2];
                (name, number_value(mid))
            })
            .collect())
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts an f64 into the cleanest JSON number representation.
pub fn number_value(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        Value::from(v as i64)
    } else {
        Value::from(v)
    }
}
