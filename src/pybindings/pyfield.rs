use std::sync::Arc;

use numpy::{ndarray::Array2, PyArray1, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyAny;
use pyo3::Bound;

use super::pylogger::PyTrialLogger;

use crate::field::animation::Motion;
use crate::field::StarField;
use crate::geometry::{Color, PrimitiveKind};
use crate::logging::TrialLogger;
use crate::{StarFieldParams, Vector3};

#[pyclass(name = "StarField")]
pub struct PyStarField {
    field: StarField,
}

impl PyStarField {
    fn extract_positions(value: &Bound<'_, PyAny>) -> PyResult<Vec<Vector3>> {
        if let Ok(arr) = value.extract::<PyReadonlyArray2<f64>>() {
            let view = arr.as_array();
            if view.ncols() != 3 {
                return Err(PyValueError::new_err("positions must have shape (n, 3)"));
            }
            return Ok(view
                .rows()
                .into_iter()
                .map(|r| Vector3::new(r[0], r[1], r[2]))
                .collect());
        }

        let rows: Vec<[f64; 3]> = value.extract().map_err(|_| {
            PyValueError::new_err(
                "positions must be an (n, 3) array or a sequence of 3-element sequences",
            )
        })?;
        Ok(rows
            .into_iter()
            .map(|[x, y, z]| Vector3::new(x, y, z))
            .collect())
    }

    fn extract_colors<'py>(value: &Bound<'py, PyAny>) -> PyResult<Vec<Color>> {
        let items: Vec<Bound<'py, PyAny>> = value.extract()?;
        items
            .iter()
            .map(|value| {
                if let Ok(hex) = value.extract::<u32>() {
                    return Ok(Color::from_hex(hex));
                }
                let text: String = value.extract().map_err(|_| {
                    PyValueError::new_err("colors must be 0xRRGGBB integers or '#rrggbb' strings")
                })?;
                Color::parse(&text).map_err(|e| PyValueError::new_err(e.to_string()))
            })
            .collect()
    }

    fn extract_primitive(name: &str) -> PyResult<PrimitiveKind> {
        match name {
            "sphere" => Ok(PrimitiveKind::Sphere),
            "disc" => Ok(PrimitiveKind::Disc),
            _ => Err(PyValueError::new_err(format!(
                "Unknown primitive '{}'; expected 'sphere' or 'disc'.",
                name
            ))),
        }
    }

    fn params_from_args(
        star_count: usize,
        angular_radius_deg: Vec<f64>,
        shell_radius: f64,
        color: &Bound<'_, PyAny>,
        seed: Option<u64>,
        primitive: &str,
    ) -> PyResult<StarFieldParams> {
        Ok(StarFieldParams {
            star_count,
            angular_radius_deg,
            shell_radius,
            color: Self::extract_colors(color)?,
            seed,
            primitive: Self::extract_primitive(primitive)?,
        })
    }

    fn vectors_to_array<'py>(py: Python<'py>, vectors: &[Vector3]) -> Bound<'py, PyArray2<f64>> {
        let arr = Array2::from_shape_fn((vectors.len(), 3), |(i, j)| vectors[i][j]);
        PyArray2::from_owned_array(py, arr)
    }
}

#[pymethods]
impl PyStarField {
    #[new]
    #[pyo3(signature = (star_count, angular_radius_deg, shell_radius, color, positions, seed=None, primitive="sphere"))]
    pub fn new(
        star_count: usize,
        angular_radius_deg: Vec<f64>,
        shell_radius: f64,
        color: &Bound<'_, PyAny>,
        positions: &Bound<'_, PyAny>,
        seed: Option<u64>,
        primitive: &str,
    ) -> PyResult<Self> {
        let params = Self::params_from_args(
            star_count,
            angular_radius_deg,
            shell_radius,
            color,
            seed,
            primitive,
        )?;
        let positions = Self::extract_positions(positions)?;
        Ok(Self {
            field: StarField::new(params, positions),
        })
    }

    #[pyo3(signature = (star_count, angular_radius_deg, shell_radius, color, positions, seed=None, primitive="sphere"))]
    pub fn change_spheres(
        &mut self,
        star_count: usize,
        angular_radius_deg: Vec<f64>,
        shell_radius: f64,
        color: &Bound<'_, PyAny>,
        positions: &Bound<'_, PyAny>,
        seed: Option<u64>,
        primitive: &str,
    ) -> PyResult<()> {
        let params = Self::params_from_args(
            star_count,
            angular_radius_deg,
            shell_radius,
            color,
            seed,
            primitive,
        )?;
        let positions = Self::extract_positions(positions)?;
        self.field.change_spheres(params, positions);
        Ok(())
    }

    pub fn clear_spheres(&mut self) {
        self.field.clear_spheres();
    }

    #[pyo3(signature = (rad_hz=None, deg_hz=None))]
    pub fn set_rotate_rate(&mut self, rad_hz: Option<f64>, deg_hz: Option<f64>) -> PyResult<()> {
        match (rad_hz, deg_hz) {
            (Some(rad_hz), None) => self.field.set_rotate_rate_rad_hz(rad_hz),
            (None, Some(deg_hz)) => self.field.set_rotate_rate_deg_hz(deg_hz),
            _ => {
                return Err(PyValueError::new_err(
                    "Exactly one of rad_hz or deg_hz must be given.",
                ))
            }
        }
        Ok(())
    }

    pub fn set_oscillation(&mut self, rate_hz: f64, max_angle_deg: f64) {
        self.field.set_oscillation(rate_hz, max_angle_deg);
    }

    pub fn set_rotation_absolute(&mut self, angle_rad: f64) {
        self.field.set_rotation_absolute(angle_rad);
    }

    pub fn tick(&mut self, delta_seconds: f64) -> f64 {
        self.field.tick(delta_seconds)
    }

    pub fn set_trial_id(&mut self, trial_id: u64) {
        self.field.set_trial_id(trial_id);
    }

    /// Attach an object with a `log(trial_id, key, value)` method, or `None` to detach
    #[pyo3(signature = (logger=None))]
    pub fn set_logger(&mut self, logger: Option<PyObject>) {
        self.field.set_logger(
            logger.map(|target| Arc::new(PyTrialLogger::new(target)) as Arc<dyn TrialLogger>),
        );
    }

    #[getter]
    pub fn rotation(&self) -> f64 {
        self.field.rotation()
    }

    #[getter]
    pub fn motion(&self) -> &'static str {
        match self.field.motion() {
            Motion::Idle => "idle",
            Motion::Rotating => "rotating",
            Motion::Oscillating => "oscillating",
        }
    }

    #[getter]
    pub fn trial_id(&self) -> u64 {
        self.field.trial_id()
    }

    #[getter]
    pub fn star_count(&self) -> usize {
        self.field.stars().len()
    }

    pub fn radii<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        let radii: Vec<f64> = self.field.stars().iter().map(|s| s.radius).collect();
        PyArray1::from_vec(py, radii)
    }

    pub fn colors(&self) -> Vec<u32> {
        self.field.stars().iter().map(|s| s.color.to_hex()).collect()
    }

    pub fn positions<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        let positions: Vec<Vector3> = self.field.stars().iter().map(|s| s.position).collect();
        Self::vectors_to_array(py, &positions)
    }

    pub fn world_positions<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        Self::vectors_to_array(py, &self.field.world_positions())
    }

    /// Group orientation as (w, x, y, z)
    pub fn orientation(&self) -> (f64, f64, f64, f64) {
        let q = self.field.orientation();
        (q.w, q.i, q.j, q.k)
    }

    pub fn __len__(&self) -> usize {
        self.field.stars().len()
    }
}

#[pyfunction]
pub fn angular_to_linear_radius(shell_radius: f64, angular_radius_deg: f64) -> f64 {
    crate::geometry::angular_to_linear_radius(shell_radius, angular_radius_deg)
}
